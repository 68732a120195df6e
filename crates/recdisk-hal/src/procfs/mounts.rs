//! Parsing helpers for `/proc/mounts` (space-delimited `source mountpoint fstype ...`).

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: String,
    pub mount_point: PathBuf,
}

pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let source = fields.next()?;
            let mount_point = fields.next()?;
            Some(MountEntry {
                source: source.to_string(),
                mount_point: PathBuf::from(unescape_mount_path(mount_point)),
            })
        })
        .collect()
}

/// Mount points whose source is exactly `device`.
pub fn mount_points_of(entries: &[MountEntry], device: &Path) -> Vec<PathBuf> {
    let device = device.to_string_lossy();
    entries
        .iter()
        .filter(|entry| entry.source == device)
        .map(|entry| entry.mount_point.clone())
        .collect()
}

/// Mount points whose source starts with `dev_path` (the disk itself or any of
/// its partitions), deepest first and without duplicates.
pub fn mounted_under_device(entries: &[MountEntry], dev_path: &Path) -> Vec<PathBuf> {
    let prefix = dev_path.to_string_lossy();
    let mut mounts: Vec<PathBuf> = entries
        .iter()
        .filter(|entry| entry.source.starts_with(prefix.as_ref()))
        .map(|entry| entry.mount_point.clone())
        .collect();

    mounts.sort();
    mounts.dedup();
    mounts.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
    mounts
}

pub fn unescape_mount_path(raw: &str) -> String {
    raw.replace("\\040", " ")
        .replace("\\011", "\t")
        .replace("\\012", "\n")
        .replace("\\134", "\\")
}
