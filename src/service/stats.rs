//! Cross-country statistics roll-up.
//!
//! Aggregates every country's full listing into one summary. The listing
//! comes through the per-country blob path, so a warm cache makes this
//! cheap; the assembled response is also held in its own memory slot for
//! the standard TTL.

use crate::catalog::format_file_size;
use crate::models::{CountryStats, StatsResponse};
use crate::service::QueryService;
use crate::Result;
use tracing::debug;

/// Number of highest-record categories reported per country
const TOP_CATEGORIES: usize = 10;

impl QueryService {
    pub(crate) async fn stats_inner(&self) -> Result<StatsResponse> {
        if let Some(hit) = self.stats_memory.get("stats") {
            debug!("Memory hit for stats roll-up");
            return Ok(hit);
        }

        let countries = self.list_countries().await?;
        let mut per_country = Vec::with_capacity(countries.len());
        let mut total_categories = 0;
        let mut total_records = 0u64;

        for info in &countries {
            let (listing, _) = self.country_listing(&info.code).await?;
            let records: u64 = listing.iter().map(|c| c.records).sum();
            let size: u64 = listing.iter().filter_map(|c| c.file_size).sum();

            let mut top = listing.clone();
            top.sort_by(|a, b| b.records.cmp(&a.records));
            top.truncate(TOP_CATEGORIES);

            total_categories += listing.len();
            total_records += records;
            per_country.push(CountryStats {
                code: info.code.clone(),
                name: info.name.clone(),
                total_records: records,
                total_categories: listing.len(),
                total_size: format_file_size(size),
                top_categories: top,
            });
        }

        let response = StatsResponse {
            total_countries: countries.len(),
            total_categories,
            total_records,
            countries: per_country,
        };
        self.stats_memory.insert("stats", response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn service_with_data(temp: &TempDir) -> QueryService {
        let root = temp.path();
        let us = root.join("US_Merged");
        std_fs::create_dir_all(&us).unwrap();
        std_fs::write(us.join("restaurants.csv"), "Name,Phone\nJoe's,555\nMaria's,556\n").unwrap();
        std_fs::write(us.join("gyms.csv"), "Name,Email\nIron Gym,i@x.com\n").unwrap();
        let uk = root.join("UK_Merged");
        std_fs::create_dir_all(&uk).unwrap();
        std_fs::write(uk.join("pubs.csv"), "Name\nThe Crown\nThe Swan\nThe Bell\n").unwrap();
        QueryService::new(Config::new(root))
    }

    #[tokio::test]
    async fn test_roll_up_across_countries() {
        let temp = TempDir::new().unwrap();
        let service = service_with_data(&temp);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_countries, 2);
        assert_eq!(stats.total_categories, 3);
        assert_eq!(stats.total_records, 6);

        let us = stats.countries.iter().find(|c| c.code == "US").unwrap();
        assert_eq!(us.total_records, 3);
        assert_eq!(us.total_categories, 2);
        // Top categories sorted by record count, descending
        assert_eq!(us.top_categories[0].name, "restaurants");
        assert_eq!(us.top_categories[1].name, "gyms");

        let uk = stats.countries.iter().find(|c| c.code == "UK").unwrap();
        assert_eq!(uk.name, "United Kingdom");
        assert_eq!(uk.total_records, 3);
    }

    #[tokio::test]
    async fn test_second_call_uses_memory() {
        let temp = TempDir::new().unwrap();
        let service = service_with_data(&temp);

        service.stats().await.unwrap();
        let scanned = service.files_scanned();
        assert_eq!(scanned, 3);

        service.stats().await.unwrap();
        assert_eq!(service.files_scanned(), scanned);
    }
}
