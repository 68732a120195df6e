//! Device report reader: whole disks and their partitions from `/proc/partitions`.
//!
//! Fail-safe-empty postcondition: [`find_disks`] and [`find_partitions`]
//! return either the complete answer or an empty list, never a partial one.
//! A read or parse error anywhere in the report empties the result, because
//! an incomplete disk list risks operating on the wrong device. Callers that
//! must distinguish "no partitions" from "could not tell" use the `try_`
//! variants.

use super::classify;
use recdisk_hal::path::device_basename;
use recdisk_hal::procfs::partitions::{parse_partitions, PartitionRow};
use recdisk_hal::{HalResult, HostInfoOps};
use std::fmt;
use std::path::{Path, PathBuf};

/// `/proc/partitions` counts 1 KiB blocks; sizes are shown in decimal GB.
const BLOCKS_PER_GB: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDevice {
    pub path: PathBuf,
    pub is_whole_disk: bool,
}

impl BlockDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_whole_disk = classify::is_whole_disk(&path);
        Self {
            path,
            is_whole_disk,
        }
    }

    fn from_name(name: &str) -> Self {
        Self::new(Path::new("/dev").join(name))
    }
}

impl fmt::Display for BlockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionInfo {
    pub path: PathBuf,
    pub size_gb: f64,
}

impl fmt::Display for PartitionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} GB)", self.path.display(), self.size_gb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskFilter {
    /// Only disks that carry no partitions yet.
    Unpartitioned,
    /// Every whole disk.
    All,
}

pub fn disks_from_rows(rows: &[PartitionRow], filter: DiskFilter) -> Vec<BlockDevice> {
    rows.iter()
        .filter(|row| classify::is_whole_disk_name(&row.name))
        .filter(|row| match filter {
            DiskFilter::All => true,
            DiskFilter::Unpartitioned => !rows
                .iter()
                .any(|other| classify::is_partition_of(&other.name, &row.name)),
        })
        .map(|row| BlockDevice::from_name(&row.name))
        .collect()
}

pub fn partitions_from_rows(rows: &[PartitionRow], disk: &Path) -> Vec<PartitionInfo> {
    let Some(disk_name) = device_basename(disk) else {
        return Vec::new();
    };
    rows.iter()
        .filter(|row| classify::is_partition_of(&row.name, &disk_name))
        .map(|row| PartitionInfo {
            path: Path::new("/dev").join(&row.name),
            size_gb: row.blocks as f64 / BLOCKS_PER_GB,
        })
        .collect()
}

fn read_rows<H: HostInfoOps + ?Sized>(hal: &H) -> HalResult<Vec<PartitionRow>> {
    parse_partitions(&hal.proc_partitions()?)
}

pub fn try_find_disks<H: HostInfoOps + ?Sized>(
    hal: &H,
    filter: DiskFilter,
) -> HalResult<Vec<BlockDevice>> {
    Ok(disks_from_rows(&read_rows(hal)?, filter))
}

pub fn try_find_partitions<H: HostInfoOps + ?Sized>(
    hal: &H,
    disk: &Path,
) -> HalResult<Vec<PartitionInfo>> {
    Ok(partitions_from_rows(&read_rows(hal)?, disk))
}

/// Whole disks matching `filter`, or nothing if the report is unusable.
pub fn find_disks<H: HostInfoOps + ?Sized>(hal: &H, filter: DiskFilter) -> Vec<BlockDevice> {
    try_find_disks(hal, filter).unwrap_or_else(|err| {
        log::warn!("Disk discovery failed, reporting no disks: {}", err);
        Vec::new()
    })
}

/// Partitions of `disk`, or nothing if the report is unusable.
pub fn find_partitions<H: HostInfoOps + ?Sized>(hal: &H, disk: &Path) -> Vec<PartitionInfo> {
    try_find_partitions(hal, disk).unwrap_or_else(|err| {
        log::warn!(
            "Partition discovery for {} failed, reporting none: {}",
            disk.display(),
            err
        );
        Vec::new()
    })
}
