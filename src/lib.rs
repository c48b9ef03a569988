//! Leadstats Library
//!
//! A Rust library for serving aggregate statistics and paginated records
//! from large directories of per-category business-lead CSV files.
//!
//! This library provides tools for:
//! - Streaming record counts and field-availability flags from CSV files
//!   without full structural parsing
//! - Filtering rows by state/city location tokens
//! - A three-tier cache (in-memory TTL, per-location disk blobs, per-country
//!   disk blobs with a file-count freshness guard)
//! - Offline precomputation workers that build the disk cache for a fixed
//!   universe of locations
//! - A query service with bounded-parallelism on-demand scanning

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod models;
pub mod precompute;
pub mod scanner;
pub mod service;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use cache::{DiskCache, MemoryCache};
pub use catalog::Catalog;
pub use config::Config;
pub use models::{CacheBlob, CategorySummary, FieldFlags, Pagination};
pub use scanner::{LocationFilter, ScanSummary, StreamScanner};
pub use service::QueryService;

/// Result type alias for leadstats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lead-data statistics operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A required request parameter was missing or malformed
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Requested country or category does not exist on disk
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// CSV row parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Cache blob serialization/deserialization error
    #[error("Cache blob error: {message}")]
    CacheBlob {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a request validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::CacheBlob {
            message: "Cache blob serialization failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
