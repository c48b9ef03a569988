//! Full-row record retrieval for one category file.
//!
//! Unlike the statistics scanners, this path needs real field values, so it
//! uses a structural CSV parse (quoted fields, embedded commas) rather than
//! newline counting. Parsing runs on the blocking pool; files are bounded by
//! what one category holds, and the page is cut after filtering.

use crate::models::{CsvRecord, RecordsResponse};
use crate::service::pagination::{PageParams, paginate};
use crate::service::QueryService;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Parameters of one record retrieval query
#[derive(Debug, Clone, Default)]
pub struct RecordsQuery {
    pub country: String,
    /// Raw category name, matching the file stem
    pub category: String,
    pub state: Option<String>,
    pub city: Option<String>,
    /// Free-text substring filter across all fields of a row
    pub search: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl RecordsQuery {
    pub fn new(country: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            category: category.into(),
            ..Default::default()
        }
    }
}

impl QueryService {
    /// Fetch one page of full records from a category file, after applying
    /// the search and location filters
    pub async fn get_data(&self, query: &RecordsQuery) -> Result<RecordsResponse> {
        let country = query.country.trim();
        let category = query.category.trim();
        if country.is_empty() {
            return Err(Error::validation("country is required"));
        }
        if category.is_empty() {
            return Err(Error::validation("category is required"));
        }
        let params = PageParams::new(query.page, query.limit);

        let path = self.catalog().category_file_path(country, category);
        if tokio::fs::metadata(&path).await.is_err() {
            return Err(Error::not_found(format!(
                "category '{category}' for country {country}"
            )));
        }

        let tokens = filter_tokens(query);
        let rows = read_rows(path, tokens).await?;
        debug!(
            "Loaded {} matching rows for {}/{}",
            rows.len(),
            country,
            category
        );

        let (data, pagination) = paginate(&rows, params);
        Ok(RecordsResponse {
            country: country.to_uppercase(),
            category: category.to_string(),
            data,
            pagination,
        })
    }
}

/// Lower-cased substrings every matching row must contain
fn filter_tokens(query: &RecordsQuery) -> Vec<String> {
    [&query.search, &query.state, &query.city]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Parse the file and keep the rows containing every filter token
async fn read_rows(path: PathBuf, tokens: Vec<String>) -> Result<Vec<CsvRecord>> {
    let file_name = path.display().to_string();
    tokio::task::spawn_blocking(move || -> Result<Vec<CsvRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| Error::csv_parsing(&file_name, "Failed to open file", Some(e)))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::csv_parsing(&file_name, "Failed to read header", Some(e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| Error::csv_parsing(&file_name, "Failed to read row", Some(e)))?;

            if !tokens.is_empty() {
                let row_text = record.iter().collect::<Vec<_>>().join(" ").to_lowercase();
                if !tokens.iter().all(|t| row_text.contains(t)) {
                    continue;
                }
            }

            let row: CsvRecord = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    })
    .await
    .map_err(|e| Error::processing_interrupted(format!("record parsing task failed: {e}")))?
}
