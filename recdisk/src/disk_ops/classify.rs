//! Whole-disk vs partition classification by device name.
//!
//! Only SCSI/ATA style names are recognised: a whole disk is `sd` followed by
//! exactly one lowercase letter (`sda` .. `sdz`); anything else is treated as a
//! partition or an invalid path and must be rejected before destructive work.

use std::path::{Path, PathBuf};

pub const DISK_PREFIX: &str = "sd";

/// `name` is a bare device name such as `sda` or `sdb2`.
pub fn is_whole_disk_name(name: &str) -> bool {
    match name.strip_prefix(DISK_PREFIX).map(str::as_bytes) {
        Some([letter]) => letter.is_ascii_lowercase(),
        _ => false,
    }
}

/// True when `path` ends in a whole-disk name with nothing trailing.
pub fn is_whole_disk(path: &Path) -> bool {
    let path = path.to_string_lossy();
    let bytes = path.as_bytes();
    match bytes.len().checked_sub(DISK_PREFIX.len() + 1) {
        Some(start) => {
            &bytes[start..bytes.len() - 1] == DISK_PREFIX.as_bytes()
                && bytes[bytes.len() - 1].is_ascii_lowercase()
        }
        None => false,
    }
}

/// Exact complement of [`is_whole_disk`].
pub fn is_partition(path: &Path) -> bool {
    !is_whole_disk(path)
}

/// `name` is `disk_name` followed by one or more digits (`sda` -> `sda1`, `sda12`).
pub fn is_partition_of(name: &str, disk_name: &str) -> bool {
    match name.strip_prefix(disk_name) {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Whole disk a path belongs to: the path itself for a disk, the path with
/// its partition number stripped for a partition.
pub fn parent_disk(path: &Path) -> Option<PathBuf> {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(|c: char| c.is_ascii_digit());
    let candidate = PathBuf::from(trimmed);
    is_whole_disk(&candidate).then_some(candidate)
}
