//! Streaming CSV scanners.
//!
//! These scanners compute record counts and header-derived field flags in a
//! single chunked pass over a file, without invoking a general CSV parser.
//! They are deliberately approximate: field flags come from substring checks
//! on the header line, and location filtering is whole-row substring
//! containment (see [`LocationFilter`] for the false-positive trade-off).

pub mod filter;
pub mod multi;
pub mod stream;

pub use filter::LocationFilter;
pub use multi::{LocationTally, MultiLocationScanner};
pub use stream::{ScanSummary, StreamScanner};
