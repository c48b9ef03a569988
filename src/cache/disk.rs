//! Disk cache blobs.
//!
//! One JSON document per location scope, named deterministically from the
//! normalized location tuple so the read path can probe for existence
//! without an index:
//!
//! - `{cc}_state_{state}.json`: per-state blob
//! - `{cc}_state_{state}_city_{city}.json`: per-city blob
//! - `{cc}_categories.json`: per-country unfiltered blob, guarded by the
//!   CSV file count stored at build time
//!
//! Writes are whole-file overwrites in a single write call; blobs that fail
//! to parse are treated as misses and logged, never surfaced to callers.

use crate::models::CacheBlob;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Disk-backed cache of category-list blobs
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a disk cache rooted at the given directory
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// The cache directory
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Create the cache directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| Error::io("Failed to create cache directory", e))
    }

    /// Blob path for a (country, state[, city]) tuple
    pub fn location_blob_path(&self, country: &str, state: &str, city: Option<&str>) -> PathBuf {
        let mut name = format!("{}_state_{}", normalize(country), normalize(state));
        if let Some(city) = city.filter(|c| !c.trim().is_empty()) {
            name.push_str(&format!("_city_{}", normalize(city)));
        }
        name.push_str(".json");
        self.cache_dir.join(name)
    }

    /// Blob path for a country's unfiltered category list
    pub fn country_blob_path(&self, country: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}_categories.json", normalize(country)))
    }

    /// Read a per-location blob. Missing or unparsable files are misses.
    pub async fn read_location_blob(
        &self,
        country: &str,
        state: &str,
        city: Option<&str>,
    ) -> Option<CacheBlob> {
        self.read_blob(&self.location_blob_path(country, state, city))
            .await
    }

    /// Write a per-location blob; the file name is derived from the blob's
    /// own location fields
    pub async fn write_location_blob(&self, blob: &CacheBlob) -> Result<()> {
        let city = if blob.city.trim().is_empty() {
            None
        } else {
            Some(blob.city.as_str())
        };
        let path = self.location_blob_path(&blob.country, &blob.state, city);
        self.write_blob(&path, blob).await
    }

    /// Read the per-country blob, honoring the file-count freshness guard:
    /// a blob whose stored `fileCount` differs from `current_file_count`
    /// is stale and reported as a miss.
    ///
    /// The guard accepts false negatives (a file edited in place without
    /// changing the count) in exchange for never hashing file contents.
    pub async fn read_country_blob(
        &self,
        country: &str,
        current_file_count: usize,
    ) -> Option<CacheBlob> {
        let blob = self.read_blob(&self.country_blob_path(country)).await?;
        match blob.file_count {
            Some(count) if count == current_file_count => Some(blob),
            Some(count) => {
                debug!(
                    "Country blob for {} is stale: built with {} files, directory now has {}",
                    country, count, current_file_count
                );
                None
            }
            None => {
                warn!("Country blob for {} has no fileCount; discarding", country);
                None
            }
        }
    }

    /// Write the per-country blob
    pub async fn write_country_blob(&self, blob: &CacheBlob) -> Result<()> {
        let path = self.country_blob_path(&blob.country);
        self.write_blob(&path, blob).await
    }

    async fn read_blob(&self, path: &Path) -> Option<CacheBlob> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read cache blob {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice::<CacheBlob>(&bytes) {
            Ok(blob) => Some(blob),
            Err(e) => {
                // Corrupt blob: treat as a miss and let the caller recompute
                warn!("Discarding corrupt cache blob {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn write_blob(&self, path: &Path, blob: &CacheBlob) -> Result<()> {
        self.ensure_dir().await?;
        let bytes = serde_json::to_vec(blob)?;
        fs::write(path, bytes)
            .await
            .map_err(|e| Error::io(format!("Failed to write cache blob {}", path.display()), e))?;
        debug!("Wrote cache blob {}", path.display());
        Ok(())
    }
}

/// Lower-case and replace whitespace runs with underscores
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
