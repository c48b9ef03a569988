//! Single-file chunked scanner.
//!
//! Reads a CSV file in fixed-size chunks, treats the first newline-delimited
//! line as the header, and counts every subsequent non-empty line as one
//! candidate record. A line split across a chunk boundary is held as an
//! unterminated remainder until the next newline or end of stream.

use crate::constants::DEFAULT_SCAN_CHUNK_SIZE;
use crate::models::FieldFlags;
use crate::scanner::LocationFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::warn;

/// Result of one streaming scan over a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    /// Number of non-empty data lines (matching the filter, when one is
    /// supplied)
    pub total: u64,
    /// Header-derived field availability flags
    #[serde(flatten)]
    pub flags: FieldFlags,
}

/// Chunked streaming scanner for category files
#[derive(Debug, Clone, Copy)]
pub struct StreamScanner {
    chunk_size: usize,
}

impl StreamScanner {
    /// Create a scanner with a custom chunk size
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Scan a file, optionally counting only rows that match a location
    /// filter.
    ///
    /// A stream error resolves to a zero-valued summary rather than
    /// propagating: callers must treat "zero records, no flags" as either
    /// truly empty or unreadable, without distinguishing the two.
    pub async fn scan(&self, path: &Path, filter: Option<&LocationFilter>) -> ScanSummary {
        match self.scan_inner(path, filter).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Scan failed for {}: {}", path.display(), e);
                ScanSummary::default()
            }
        }
    }

    async fn scan_inner(
        &self,
        path: &Path,
        filter: Option<&LocationFilter>,
    ) -> std::io::Result<ScanSummary> {
        let mut summary = ScanSummary::default();
        let mut saw_header = false;

        walk_lines(path, self.chunk_size, |line| {
            if !saw_header {
                summary.flags = FieldFlags::from_header(line);
                saw_header = true;
                return;
            }
            if line.trim().is_empty() {
                return;
            }
            match filter {
                Some(f) => {
                    if f.matches(&line.to_lowercase()) {
                        summary.total += 1;
                    }
                }
                None => summary.total += 1,
            }
        })
        .await?;

        Ok(summary)
    }
}

impl Default for StreamScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_CHUNK_SIZE)
    }
}

/// Read a file in fixed-size chunks and invoke `on_line` for every
/// newline-delimited line, including a trailing unterminated line.
///
/// Splitting happens on raw bytes so a chunk boundary can never corrupt a
/// multi-byte character; each complete line is lossily decoded on its own.
pub(crate) async fn walk_lines<F>(
    path: &Path,
    chunk_size: usize,
    mut on_line: F,
) -> std::io::Result<()>
where
    F: FnMut(&str),
{
    let mut file = File::open(path).await?;
    let mut buf = vec![0u8; chunk_size];
    let mut remainder: Vec<u8> = Vec::new();

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let mut start = 0;
        for i in 0..n {
            if buf[i] == b'\n' {
                let line = if remainder.is_empty() {
                    decode_line(&buf[start..i])
                } else {
                    remainder.extend_from_slice(&buf[start..i]);
                    let line = decode_line(&remainder);
                    remainder.clear();
                    line
                };
                on_line(&line);
                start = i + 1;
            }
        }
        remainder.extend_from_slice(&buf[start..n]);
    }

    if !remainder.is_empty() {
        on_line(&decode_line(&remainder));
    }

    Ok(())
}

/// Decode a raw line, stripping a trailing carriage return
fn decode_line(bytes: &[u8]) -> String {
    let bytes = match bytes.last() {
        Some(b'\r') => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}
