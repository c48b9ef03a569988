//! Page parameter coercion and in-memory pagination.
//!
//! Out-of-range parameters never error: a missing or zero page becomes
//! page 1, a missing limit becomes the default page size, and a page past
//! the end yields an empty slice under a truthful envelope.

use crate::constants::DEFAULT_PAGE_LIMIT;
use crate::models::Pagination;

/// Coerced (page, limit) pair for a paged query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: usize,
    pub limit: usize,
}

impl PageParams {
    /// Coerce raw query parameters: page and limit are floored to 1, and a
    /// missing limit falls back to the default page size
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1),
        }
    }

    /// Number of items before this page
    pub fn skip(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// Slice one page out of a full item list
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.skip().min(items.len());
        let end = (start + self.limit).min(items.len());
        &items[start..end]
    }

    /// Pagination envelope for a total item count under these parameters
    pub fn envelope(&self, total: u64) -> Pagination {
        Pagination::new(total, self.page, self.limit)
    }
}

/// Paginate a fully-materialized item list
pub fn paginate<T: Clone>(items: &[T], params: PageParams) -> (Vec<T>, Pagination) {
    let page = params.slice(items).to_vec();
    (page, params.envelope(items.len() as u64))
}
