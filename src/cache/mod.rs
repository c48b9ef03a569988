//! Cache tiers for query results.
//!
//! Three independent tiers back the query service:
//! - a process-local TTL map keyed by query signature ([`MemoryCache`])
//! - per-location JSON blobs on disk, written only by the precompute
//!   workers ([`DiskCache`])
//! - a per-country JSON blob guarded by the directory's CSV file count
//!
//! The tiers share no state and are each safe to lose: every entry can be
//! recomputed from the source files.

pub mod disk;
pub mod memory;

pub use disk::DiskCache;
pub use memory::{Clock, MemoryCache, SystemClock, signature};
