//! Directory-derived precomputation over an unmerged source tree.
//!
//! The unmerged tree is `{root}/{CC}/{State}/{City}/{category}.csv`, where
//! the state directory may be a two-letter abbreviation. Each category file
//! is scanned without a location filter (its directory placement *is* its
//! location), and summaries are accumulated into per-city buckets plus a
//! per-state roll-up across that state's cities. One blob is written per
//! non-empty bucket at both levels.

use crate::cache::DiskCache;
use crate::catalog::{Catalog, format_category_name, is_csv_file};
use crate::constants::resolve_state_name;
use crate::models::{CacheBlob, CategorySummary};
use crate::precompute::PrecomputeStats;
use crate::scanner::StreamScanner;
use crate::{Error, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Worker that builds per-state and per-city blobs from an unmerged tree
pub struct UnmergedPrecompute {
    catalog: Catalog,
    disk: DiskCache,
    scanner: StreamScanner,
}

impl UnmergedPrecompute {
    /// Create a worker over the given catalog and disk cache
    pub fn new(catalog: Catalog, disk: DiskCache, chunk_size: usize) -> Self {
        Self {
            catalog,
            disk,
            scanner: StreamScanner::new(chunk_size),
        }
    }

    /// Build blobs for every (state, city) pair discovered in the
    /// country's unmerged tree
    pub async fn build(&self, country: &str) -> Result<PrecomputeStats> {
        let started = Instant::now();
        let root = self.catalog.unmerged_dir(country);
        if !root.exists() {
            return Err(Error::not_found(format!(
                "unmerged data for {country} at {}",
                root.display()
            )));
        }

        let city_dirs = discover_city_dirs(&root)?;
        info!(
            "Discovered {} city directories under {}",
            city_dirs.len(),
            root.display()
        );

        let mut stats = PrecomputeStats::default();
        // state_lower -> display name
        let mut state_names: HashMap<String, String> = HashMap::new();
        // state_lower -> category -> summary
        let mut state_buckets: HashMap<String, HashMap<String, CategorySummary>> = HashMap::new();
        // (state_lower, city_lower) -> category -> summary
        let mut city_buckets: HashMap<(String, String), HashMap<String, CategorySummary>> =
            HashMap::new();

        for city_dir in &city_dirs {
            let state_name = resolve_state_name(&city_dir.state_dir);
            let state_key = state_name.to_lowercase();
            let city_key = city_dir.city_dir.to_lowercase();
            state_names.entry(state_key.clone()).or_insert(state_name);

            let mut entries = fs::read_dir(&city_dir.path).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if !is_csv_file(&path) {
                    continue;
                }
                let category = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();

                if let Err(e) = fs::metadata(&path).await {
                    warn!("Skipping unreadable file {}: {}", path.display(), e);
                    stats.files_failed += 1;
                    continue;
                }

                let summary = self.scanner.scan(&path, None).await;
                stats.files_scanned += 1;
                if summary.total == 0 {
                    continue;
                }

                accumulate(
                    city_buckets
                        .entry((state_key.clone(), city_key.clone()))
                        .or_default(),
                    &category,
                    summary.total,
                    summary.flags,
                );
                accumulate(
                    state_buckets.entry(state_key.clone()).or_default(),
                    &category,
                    summary.total,
                    summary.flags,
                );
            }
        }

        // State-level blobs
        for (state_key, bucket) in &state_buckets {
            let state_name = state_names[state_key].clone();
            let blob = make_blob(country, &state_name, "", bucket);
            if blob.total_categories > 0 {
                self.disk.write_location_blob(&blob).await?;
                stats.blobs_written += 1;
                debug!("Wrote state blob for {}", state_name);
            }
        }

        // City-level blobs
        for ((state_key, city_key), bucket) in &city_buckets {
            let state_name = state_names[state_key].clone();
            let city_name = format_category_name(city_key);
            let blob = make_blob(country, &state_name, &city_name, bucket);
            if blob.total_categories > 0 {
                self.disk.write_location_blob(&blob).await?;
                stats.blobs_written += 1;
            }
        }

        stats.elapsed = started.elapsed();
        info!(
            "Unmerged precompute for {} done: {} files scanned, {} failed, {} blobs in {:.1}s",
            country,
            stats.files_scanned,
            stats.files_failed,
            stats.blobs_written,
            stats.elapsed.as_secs_f64()
        );
        Ok(stats)
    }
}

/// One discovered `{State}/{City}` directory
#[derive(Debug)]
struct CityDir {
    state_dir: String,
    city_dir: String,
    path: PathBuf,
}

/// Enumerate the state/city directory pairs two levels below the root
fn discover_city_dirs(root: &Path) -> Result<Vec<CityDir>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .follow_links(false)
    {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path().to_path_buf();
        let city_dir = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let state_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dirs.push(CityDir {
            state_dir,
            city_dir,
            path,
        });
    }
    Ok(dirs)
}

/// Fold one file's scan result into a category bucket
fn accumulate(
    bucket: &mut HashMap<String, CategorySummary>,
    category: &str,
    total: u64,
    flags: crate::models::FieldFlags,
) {
    let entry = bucket
        .entry(category.to_string())
        .or_insert_with(|| CategorySummary {
            name: category.to_string(),
            display_name: format_category_name(category),
            records: 0,
            flags,
            file_name: None,
            file_size: None,
            file_size_formatted: None,
        });
    entry.records += total;
    entry.flags.merge(flags);
}

/// Assemble a sorted blob from a category bucket
fn make_blob(
    country: &str,
    state: &str,
    city: &str,
    bucket: &HashMap<String, CategorySummary>,
) -> CacheBlob {
    let mut categories: Vec<CategorySummary> = bucket.values().cloned().collect();
    categories.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    CacheBlob {
        country: country.to_uppercase(),
        state: state.to_string(),
        city: city.to_string(),
        total_categories: categories.len(),
        categories,
        file_count: None,
        built_at: Some(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SCAN_CHUNK_SIZE;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> (Catalog, DiskCache) {
        let root = temp.path();
        // CA (abbreviation) with two cities
        let la = root.join("US/CA/los_angeles");
        std_fs::create_dir_all(&la).unwrap();
        std_fs::write(
            la.join("restaurants.csv"),
            "Name,Email\nJoe's,j@x.com\nMaria's,m@x.com\n",
        )
        .unwrap();
        let sf = root.join("US/CA/san_francisco");
        std_fs::create_dir_all(&sf).unwrap();
        std_fs::write(sf.join("restaurants.csv"), "Name,Phone\nLou's,555\n").unwrap();
        std_fs::write(sf.join("gyms.csv"), "Name\nIron Gym\n").unwrap();

        // Full state name directory with an empty category file
        let austin = root.join("US/Texas/austin");
        std_fs::create_dir_all(&austin).unwrap();
        std_fs::write(austin.join("schools.csv"), "Name,Website\n").unwrap();

        (
            Catalog::new(root),
            DiskCache::new(root.join("US_Merged").join(".cache")),
        )
    }

    #[tokio::test]
    async fn test_state_and_city_blobs() {
        let temp = TempDir::new().unwrap();
        let (catalog, disk) = setup(&temp);

        let worker = UnmergedPrecompute::new(catalog, disk.clone(), DEFAULT_SCAN_CHUNK_SIZE);
        let stats = worker.build("US").await.unwrap();

        assert_eq!(stats.files_scanned, 4);
        assert_eq!(stats.files_failed, 0);
        // California state + two city blobs; Texas has only an empty file
        assert_eq!(stats.blobs_written, 3);

        // Abbreviation resolved to display name
        let ca = disk
            .read_location_blob("US", "California", None)
            .await
            .unwrap();
        assert_eq!(ca.total_categories, 2);
        let restaurants = ca
            .categories
            .iter()
            .find(|c| c.name == "restaurants")
            .unwrap();
        // Aggregated across both cities
        assert_eq!(restaurants.records, 3);
        // Flags merged across files
        assert!(restaurants.flags.has_email);
        assert!(restaurants.flags.has_phone);

        let la = disk
            .read_location_blob("US", "California", Some("Los Angeles"))
            .await
            .unwrap();
        assert_eq!(la.total_categories, 1);
        assert_eq!(la.categories[0].records, 2);
        assert_eq!(la.city, "Los Angeles");

        // Empty categories produce no blob
        assert!(disk.read_location_blob("US", "Texas", None).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_tree_errors() {
        let temp = TempDir::new().unwrap();
        let (catalog, disk) = setup(&temp);
        let worker = UnmergedPrecompute::new(catalog, disk, DEFAULT_SCAN_CHUNK_SIZE);
        assert!(matches!(
            worker.build("FR").await,
            Err(Error::NotFound { .. })
        ));
    }
}
