//! Configuration management and validation.
//!
//! Provides the global configuration for the statistics service: where the
//! data lives, where the disk cache goes, and the tuning knobs for the
//! memory tier and the parallel scan path.

use crate::constants::{
    CACHE_DIR_NAME, DEFAULT_SCAN_BATCH_SIZE, DEFAULT_SCAN_CHUNK_SIZE, MEMORY_TTL_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration for the lead statistics service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the per-country merged directories
    /// (US_Merged, UK_Merged, ...) and the unmerged country trees
    pub data_root: PathBuf,

    /// Directory for disk cache blobs (defaults to `{data_root}/.cache`)
    pub cache_dir: PathBuf,

    /// Memory-tier entry lifetime
    #[serde(with = "duration_secs")]
    pub memory_ttl: Duration,

    /// Number of files scanned concurrently during on-demand scans
    pub scan_batch_size: usize,

    /// Chunk size in bytes for streaming file scans
    pub scan_chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        let data_root = default_data_root();
        let cache_dir = data_root.join(CACHE_DIR_NAME);
        Self {
            data_root,
            cache_dir,
            memory_ttl: Duration::from_secs(MEMORY_TTL_SECS),
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
            scan_chunk_size: DEFAULT_SCAN_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Create a configuration rooted at the given data directory, with the
    /// cache directory at its default location inside it
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        let data_root = data_root.into();
        let cache_dir = data_root.join(CACHE_DIR_NAME);
        Self {
            data_root,
            cache_dir,
            ..Default::default()
        }
    }

    /// Override the cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Override the memory-tier TTL
    pub fn with_memory_ttl(mut self, ttl: Duration) -> Self {
        self.memory_ttl = ttl;
        self
    }

    /// Override the parallel scan batch size
    pub fn with_scan_batch_size(mut self, batch_size: usize) -> Self {
        self.scan_batch_size = batch_size.max(1);
        self
    }

    /// Override the streaming chunk size
    pub fn with_scan_chunk_size(mut self, chunk_size: usize) -> Self {
        self.scan_chunk_size = chunk_size.max(1);
        self
    }

    /// Validate the configuration before use
    pub fn validate(&self) -> crate::Result<()> {
        if !self.data_root.exists() {
            return Err(crate::Error::configuration(format!(
                "Data root does not exist: {}",
                self.data_root.display()
            )));
        }
        if !self.data_root.is_dir() {
            return Err(crate::Error::configuration(format!(
                "Data root is not a directory: {}",
                self.data_root.display()
            )));
        }
        if self.scan_batch_size == 0 {
            return Err(crate::Error::configuration(
                "Scan batch size must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Default data root: `~/scraped_data` when a home directory is known,
/// otherwise `./scraped_data`
fn default_data_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("scraped_data"))
        .unwrap_or_else(|| PathBuf::from("scraped_data"))
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_methods() {
        let config = Config::new("/tmp/data")
            .with_cache_dir("/tmp/cache")
            .with_scan_batch_size(10)
            .with_memory_ttl(Duration::from_secs(60));

        assert_eq!(config.data_root, PathBuf::from("/tmp/data"));
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.scan_batch_size, 10);
        assert_eq!(config.memory_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_cache_dir_defaults_inside_data_root() {
        let config = Config::new("/srv/leads");
        assert_eq!(config.cache_dir, PathBuf::from("/srv/leads/.cache"));
    }

    #[test]
    fn test_batch_size_floor() {
        let config = Config::new("/tmp/data").with_scan_batch_size(0);
        assert_eq!(config.scan_batch_size, 1);
    }

    #[test]
    fn test_validate_missing_root() {
        let config = Config::new("/nonexistent/leadstats/root");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_existing_root() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        assert!(config.validate().is_ok());
    }
}
