//! Parsing helpers for `/proc/partitions`.
//!
//! Grammar:
//!
//! ```text
//! major minor  #blocks  name      <- header, skipped
//!                                 <- blank separator, skipped
//!    8        0  976762584 sda    <- one row per block device
//!    8        1   48838656 sda1
//! ```
//!
//! Each row has exactly four whitespace-separated fields; `#blocks` counts
//! 1 KiB blocks. Blank lines after the header are ignored, any other malformed
//! row fails the whole parse.

use crate::{HalError, HalResult};

/// Number of leading lines (header + blank separator) that carry no rows.
const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRow {
    pub major: u32,
    pub minor: u32,
    pub blocks: u64,
    pub name: String,
}

pub fn parse_partitions(content: &str) -> HalResult<Vec<PartitionRow>> {
    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(HalError::Parse(format!(
                "/proc/partitions line {}: expected 4 fields, found {}",
                idx + 1,
                fields.len()
            )));
        }
        rows.push(PartitionRow {
            major: parse_field(fields[0], idx, "major")?,
            minor: parse_field(fields[1], idx, "minor")?,
            blocks: parse_field(fields[2], idx, "blocks")?,
            name: fields[3].to_string(),
        });
    }
    Ok(rows)
}

fn parse_field<T: std::str::FromStr>(raw: &str, idx: usize, what: &str) -> HalResult<T> {
    raw.parse().map_err(|_| {
        HalError::Parse(format!(
            "/proc/partitions line {}: invalid {} field {:?}",
            idx + 1,
            what,
            raw
        ))
    })
}
