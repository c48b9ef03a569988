//! Query service over the cache tiers and the on-demand scan path.
//!
//! Category queries resolve through the tiers in order:
//!
//! 1. memory (signature-keyed, TTL-bounded, fully-formed responses)
//! 2. per-location disk blob, when a state is requested without a
//!    category filter
//! 3. per-country disk blob, when no location is requested, guarded by
//!    the current CSV file count and rebuilt inline on a miss
//! 4. on-demand parallel scan of the candidate files
//!
//! Every resolved response is written back to the memory tier under its
//! query signature before being returned.

pub mod pagination;
mod records;
mod stats;

pub use pagination::{PageParams, paginate};
pub use records::RecordsQuery;

use crate::cache::{Clock, DiskCache, MemoryCache, signature};
use crate::catalog::{Catalog, CategoryFile, format_category_name, format_file_size};
use crate::config::Config;
use crate::constants::TARGET_STATES;
use crate::models::{
    CacheBlob, CategoriesResponse, CategorySummary, CountryInfo, StatsResponse,
};
use crate::precompute::{MergedPrecompute, PrecomputeStats, UnmergedPrecompute};
use crate::scanner::{LocationFilter, StreamScanner};
use crate::{Error, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Parameters of one category statistics query
#[derive(Debug, Clone, Default)]
pub struct CategoriesQuery {
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Substring filter against category name or display name
    pub category: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl CategoriesQuery {
    /// Query for a country's full category listing
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }
}

/// Read-side service resolving statistics queries through the cache tiers
pub struct QueryService {
    config: Config,
    catalog: Catalog,
    disk: DiskCache,
    scanner: StreamScanner,
    memory: MemoryCache<CategoriesResponse>,
    stats_memory: MemoryCache<StatsResponse>,
    scans: AtomicU64,
}

impl QueryService {
    /// Create a service from a validated configuration
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::new(&config.data_root);
        let disk = DiskCache::new(&config.cache_dir);
        let scanner = StreamScanner::new(config.scan_chunk_size);
        let memory = MemoryCache::new(config.memory_ttl);
        let stats_memory = MemoryCache::new(config.memory_ttl);
        Self {
            config,
            catalog,
            disk,
            scanner,
            memory,
            stats_memory,
            scans: AtomicU64::new(0),
        }
    }

    /// Create a service whose memory tiers use an injected clock
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let mut service = Self::new(config);
        service.memory = MemoryCache::with_clock(service.config.memory_ttl, clock.clone());
        service.stats_memory = MemoryCache::with_clock(service.config.memory_ttl, clock);
        service
    }

    /// Total number of files scanned on demand since startup. Cache hits
    /// do not move this counter.
    pub fn files_scanned(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    pub(crate) fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// List the countries that have merged data on disk
    pub async fn list_countries(&self) -> Result<Vec<CountryInfo>> {
        self.catalog.list_countries().await
    }

    /// Resolve a category statistics query through the cache tiers
    pub async fn list_categories(&self, query: &CategoriesQuery) -> Result<CategoriesResponse> {
        let country = query.country.trim();
        if country.is_empty() {
            return Err(Error::validation("country is required"));
        }
        let state = trimmed(&query.state);
        let city = trimmed(&query.city);
        let category = trimmed(&query.category);
        let params = PageParams::new(query.page, query.limit);

        let sig = signature(&[
            country,
            state.unwrap_or(""),
            city.unwrap_or(""),
            category.unwrap_or(""),
            &params.page.to_string(),
            &params.limit.to_string(),
        ]);

        if let Some(hit) = self.memory.get(&sig) {
            debug!("Memory hit for {}", sig);
            return Ok(hit);
        }

        // Location blobs hold the unfiltered category list for their scope,
        // so a category filter bypasses them.
        if category.is_none() {
            if let Some(state) = state {
                if let Some(blob) = self.disk.read_location_blob(country, state, city).await {
                    debug!("Location blob hit for {}", sig);
                    let (categories, env) = paginate(&blob.categories, params);
                    let response = CategoriesResponse {
                        country: blob.country,
                        state: blob.state,
                        city: blob.city,
                        total_categories: env.total,
                        categories,
                        pagination: env,
                    };
                    self.memory.insert(sig, response.clone());
                    return Ok(response);
                }
            }
        }

        if state.is_none() && city.is_none() {
            let (listing, _) = self.country_listing(country).await?;
            let filtered = match category {
                Some(needle) => filter_by_name(listing, needle),
                None => listing,
            };
            let (categories, env) = paginate(&filtered, params);
            let response = CategoriesResponse {
                country: country.to_uppercase(),
                state: String::new(),
                city: String::new(),
                total_categories: env.total,
                categories,
                pagination: env,
            };
            self.memory.insert(sig, response.clone());
            return Ok(response);
        }

        let response = self
            .scan_on_demand(country, state, city, category, params)
            .await?;
        self.memory.insert(sig, response.clone());
        Ok(response)
    }

    /// Cross-country roll-up; implemented in [`stats`]
    pub async fn stats(&self) -> Result<StatsResponse> {
        self.stats_inner().await
    }

    /// Build the per-state disk blobs for a country against the static
    /// state list (or a caller-supplied target list), then drop the memory
    /// tier so fresh blobs take effect immediately
    pub async fn build_merged_cache(
        &self,
        country: &str,
        targets: Option<&[&str]>,
        show_progress: bool,
    ) -> Result<PrecomputeStats> {
        let mut worker = MergedPrecompute::new(
            self.catalog.clone(),
            self.disk.clone(),
            self.config.scan_chunk_size,
        );
        if !show_progress {
            worker = worker.without_progress();
        }
        let stats = worker.build(country, targets.unwrap_or(TARGET_STATES)).await?;
        self.memory.clear();
        Ok(stats)
    }

    /// Build per-state and per-city disk blobs by walking a country's
    /// unmerged source tree, then drop the memory tier
    pub async fn build_unmerged_cache(&self, country: &str) -> Result<PrecomputeStats> {
        let worker = UnmergedPrecompute::new(
            self.catalog.clone(),
            self.disk.clone(),
            self.config.scan_chunk_size,
        );
        let stats = worker.build(country).await?;
        self.memory.clear();
        Ok(stats)
    }

    /// Full unfiltered category listing for a country, from the per-country
    /// blob when its file count still matches, otherwise rebuilt inline and
    /// persisted. Returns the listing and the current file count.
    pub(crate) async fn country_listing(
        &self,
        country: &str,
    ) -> Result<(Vec<CategorySummary>, usize)> {
        let file_count = self.catalog.count_category_files(country).await?;
        if let Some(blob) = self.disk.read_country_blob(country, file_count).await {
            debug!("Country blob hit for {}", country);
            return Ok((blob.categories, file_count));
        }

        info!(
            "Rebuilding country listing for {} over {} files",
            country, file_count
        );
        let files = self.catalog.list_category_files(country).await?;
        let scanner = self.scanner;
        let mut categories: Vec<CategorySummary> = stream::iter(files.iter().map(|file| async move {
            let summary = scanner.scan(&file.path, None).await;
            CategorySummary {
                name: file.name.clone(),
                display_name: format_category_name(&file.name),
                records: summary.total,
                flags: summary.flags,
                file_name: Some(format!("{}.csv", file.name)),
                file_size: Some(file.size),
                file_size_formatted: Some(format_file_size(file.size)),
            }
        }))
        .buffer_unordered(self.config.scan_batch_size)
        .collect()
        .await;
        self.scans.fetch_add(files.len() as u64, Ordering::Relaxed);
        categories.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        let blob = CacheBlob {
            country: country.to_uppercase(),
            state: String::new(),
            city: String::new(),
            total_categories: categories.len(),
            categories: categories.clone(),
            file_count: Some(file_count),
            built_at: Some(Utc::now()),
        };
        self.disk.write_country_blob(&blob).await?;
        Ok((categories, file_count))
    }

    /// On-demand path: paginate the candidate file list first, then scan
    /// only the requested page's files in parallel batches
    async fn scan_on_demand(
        &self,
        country: &str,
        state: Option<&str>,
        city: Option<&str>,
        category: Option<&str>,
        params: PageParams,
    ) -> Result<CategoriesResponse> {
        let files = self.catalog.list_category_files(country).await?;
        let candidates: Vec<CategoryFile> = match category {
            Some(needle) => {
                let needle = needle.to_lowercase();
                files
                    .into_iter()
                    .filter(|f| {
                        f.name.to_lowercase().contains(&needle)
                            || format_category_name(&f.name).to_lowercase().contains(&needle)
                    })
                    .collect()
            }
            None => files,
        };

        let total = candidates.len() as u64;
        let page_files = params.slice(&candidates);
        let filter = LocationFilter::new(state, city);
        debug!(
            "On-demand scan for {}: {} candidates, scanning {}",
            country,
            total,
            page_files.len()
        );

        let scanner = self.scanner;
        let filter_ref = filter.as_ref();
        let mut categories: Vec<CategorySummary> =
            stream::iter(page_files.iter().map(|file| async move {
                let summary = scanner.scan(&file.path, filter_ref).await;
                CategorySummary {
                    name: file.name.clone(),
                    display_name: format_category_name(&file.name),
                    records: summary.total,
                    flags: summary.flags,
                    file_name: None,
                    file_size: None,
                    file_size_formatted: None,
                }
            }))
            .buffer_unordered(self.config.scan_batch_size)
            .collect()
            .await;
        self.scans.fetch_add(page_files.len() as u64, Ordering::Relaxed);
        categories.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        Ok(CategoriesResponse {
            country: country.to_uppercase(),
            state: state.unwrap_or("").to_string(),
            city: city.unwrap_or("").to_string(),
            total_categories: total,
            categories,
            pagination: params.envelope(total),
        })
    }
}

/// Trim an optional query parameter, mapping blank strings to `None`
fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Keep summaries whose raw or display name contains the needle
fn filter_by_name(categories: Vec<CategorySummary>, needle: &str) -> Vec<CategorySummary> {
    let needle = needle.to_lowercase();
    categories
        .into_iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.display_name.to_lowercase().contains(&needle)
        })
        .collect()
}
