//! Static-list precomputation over a country's merged directory.
//!
//! For every category file, the multi-location scanner produces per-state
//! tallies in a single pass; non-empty state buckets become per-state disk
//! blobs. Files are processed sequentially: the single-pass scanner makes
//! each file cheap, and sequential processing keeps memory flat during
//! runs over tens of thousands of files.

use crate::catalog::{Catalog, format_category_name};
use crate::cache::DiskCache;
use crate::models::{CacheBlob, CategorySummary};
use crate::precompute::PrecomputeStats;
use crate::scanner::MultiLocationScanner;
use crate::Result;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Instant;
use tokio::fs;
use tracing::{info, warn};

/// Worker that builds per-state cache blobs from a merged directory
pub struct MergedPrecompute {
    catalog: Catalog,
    disk: DiskCache,
    chunk_size: usize,
    show_progress: bool,
}

impl MergedPrecompute {
    /// Create a worker over the given catalog and disk cache
    pub fn new(catalog: Catalog, disk: DiskCache, chunk_size: usize) -> Self {
        Self {
            catalog,
            disk,
            chunk_size,
            show_progress: true,
        }
    }

    /// Disable the progress bar (quiet mode and tests)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Build per-state blobs for a country against a fixed target list
    pub async fn build(&self, country: &str, targets: &[&str]) -> Result<PrecomputeStats> {
        let started = Instant::now();
        let files = self.catalog.list_category_files(country).await?;
        info!(
            "Precomputing {} target locations over {} category files for {}",
            targets.len(),
            files.len(),
            country
        );

        let scanner = MultiLocationScanner::with_chunk_size(targets, self.chunk_size);
        let pb = if self.show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb.set_message("Scanning category files");
            Some(pb)
        } else {
            None
        };

        let mut stats = PrecomputeStats::default();
        let mut buckets: HashMap<String, Vec<CategorySummary>> = HashMap::new();

        for file in &files {
            if let Some(pb) = &pb {
                pb.set_message(format!("Scanning: {}", file.name));
            }

            if let Err(e) = fs::metadata(&file.path).await {
                warn!("Skipping unreadable file {}: {}", file.path.display(), e);
                stats.files_failed += 1;
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                continue;
            }

            let tallies = scanner.scan(&file.path).await;
            for (token, tally) in tallies {
                if tally.total == 0 {
                    continue;
                }
                buckets.entry(token).or_default().push(CategorySummary {
                    name: file.name.clone(),
                    display_name: format_category_name(&file.name),
                    records: tally.total,
                    flags: tally.flags,
                    file_name: None,
                    file_size: None,
                    file_size_formatted: None,
                });
            }

            stats.files_scanned += 1;
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = &pb {
            pb.finish_with_message("Writing cache blobs");
        }

        for (token, mut categories) in buckets {
            categories.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            let state = scanner
                .display_name(&token)
                .unwrap_or(token.as_str())
                .to_string();
            let blob = CacheBlob {
                country: country.to_uppercase(),
                state,
                city: String::new(),
                total_categories: categories.len(),
                categories,
                file_count: None,
                built_at: Some(Utc::now()),
            };
            self.disk.write_location_blob(&blob).await?;
            stats.blobs_written += 1;
        }

        stats.elapsed = started.elapsed();
        info!(
            "Precompute for {} done: {} files scanned, {} failed, {} blobs in {:.1}s",
            country,
            stats.files_scanned,
            stats.files_failed,
            stats.blobs_written,
            stats.elapsed.as_secs_f64()
        );
        Ok(stats)
    }
}
