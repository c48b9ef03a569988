//! All-locations-in-one-pass scanner variant.
//!
//! The batch precomputation path needs per-state counts for every category
//! file. Scanning once per state per file would be quadratic in practice
//! (tens of thousands of files times fifty states), so this variant checks
//! each row against the entire target list in a single pass and attributes
//! the row to the first matching location. A row that legitimately mentions
//! two target locations is credited only to the first in list order.

use crate::constants::DEFAULT_SCAN_CHUNK_SIZE;
use crate::models::FieldFlags;
use crate::scanner::stream::walk_lines;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Per-location record tally produced by a multi-location scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationTally {
    pub total: u64,
    pub flags: FieldFlags,
}

/// Scanner that counts rows for a fixed list of target locations in one
/// pass over the file
#[derive(Debug, Clone)]
pub struct MultiLocationScanner {
    /// (lower-cased match token, display name) per target, in priority order
    targets: Vec<(String, String)>,
    chunk_size: usize,
}

impl MultiLocationScanner {
    /// Create a scanner for the given target location names
    pub fn new(targets: &[&str]) -> Self {
        Self::with_chunk_size(targets, DEFAULT_SCAN_CHUNK_SIZE)
    }

    /// Create a scanner with a custom chunk size
    pub fn with_chunk_size(targets: &[&str], chunk_size: usize) -> Self {
        Self {
            targets: targets
                .iter()
                .map(|t| (t.to_lowercase(), t.to_string()))
                .collect(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Scan a file once, attributing each data row to the first target
    /// whose token the row contains.
    ///
    /// Returns tallies keyed by the lower-cased target token. Targets with
    /// no matching rows are present with a zero tally. A stream error
    /// resolves to whatever was tallied before the failure, matching the
    /// single-file scanner's degrade-to-zero contract.
    pub async fn scan(&self, path: &Path) -> HashMap<String, LocationTally> {
        let mut tallies: HashMap<String, LocationTally> = self
            .targets
            .iter()
            .map(|(token, _)| (token.clone(), LocationTally::default()))
            .collect();

        let mut saw_header = false;
        let mut flags = FieldFlags::default();

        let result = walk_lines(path, self.chunk_size, |line| {
            if !saw_header {
                flags = FieldFlags::from_header(line);
                saw_header = true;
                return;
            }
            if line.trim().is_empty() {
                return;
            }
            let lower = line.to_lowercase();
            // First match wins
            for (token, _) in &self.targets {
                if lower.contains(token.as_str()) {
                    let tally = tallies.get_mut(token).expect("target key present");
                    tally.total += 1;
                    tally.flags = flags;
                    break;
                }
            }
        })
        .await;

        if let Err(e) = result {
            warn!("Multi-location scan failed for {}: {}", path.display(), e);
        }

        tallies
    }

    /// Display name for a lower-cased target token
    pub fn display_name(&self, token: &str) -> Option<&str> {
        self.targets
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, name)| name.as_str())
    }
}
