//! Offline cache precomputation workers.
//!
//! These batch jobs populate the per-location disk tier ahead of request
//! time, for a fixed universe of locations. Two modes exist:
//!
//! - [`merged`]: target locations come from the static state list; every
//!   category file in the country's flat merged directory is scanned once
//!   against the whole set.
//! - [`unmerged`]: target locations are discovered by walking the unmerged
//!   source tree whose directory names are state and city identifiers.
//!
//! Both run standalone (not inline with request handling) and may take
//! minutes for tens of thousands of files. A single unreadable file is
//! skipped and logged, never aborting the run.

pub mod merged;
pub mod unmerged;

pub use merged::MergedPrecompute;
pub use unmerged::UnmergedPrecompute;

use std::time::Duration;

/// Outcome of one precomputation run
#[derive(Debug, Clone, Default)]
pub struct PrecomputeStats {
    /// Files scanned successfully
    pub files_scanned: usize,
    /// Files skipped because they could not be read
    pub files_failed: usize,
    /// Disk blobs written (one per non-empty location bucket)
    pub blobs_written: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}
