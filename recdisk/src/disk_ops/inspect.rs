//! Disk size and partition-table label from `parted -m <disk> unit GB print`.
//!
//! Machine-mode output grammar:
//!
//! ```text
//! BYT;
//! /dev/sda:500GB:scsi:512:512:msdos:ATA Samsung SSD:;
//! 1:0.00GB:25.0GB:25.0GB:ext4::;
//! ```
//!
//! The summary row is the first line with at least six colon-separated
//! fields. Field 2 is the size with a `GB` suffix (integer), field 6 the
//! partition-table label; `unknown` means the disk has no table yet.

use recdisk_hal::{HalError, HalResult, PartedMode, PartedOp, PartedScript, PartitionOps};
use std::path::Path;

pub const UNKNOWN_LABEL: &str = "unknown";
pub const DEFAULT_LABEL: &str = "msdos";
pub const SIZE_UNIT: &str = "GB";

const SIZE_FIELD: usize = 1;
const LABEL_FIELD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskGeometry {
    pub total_gb: u64,
    pub label: String,
}

impl DiskGeometry {
    /// Sentinel for "size could not be determined"; callers must not proceed.
    pub fn unknown() -> Self {
        Self {
            total_gb: 0,
            label: UNKNOWN_LABEL.to_string(),
        }
    }

    pub fn needs_label(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }

    pub fn is_usable(&self) -> bool {
        self.total_gb > 0
    }
}

pub fn parse_summary(output: &str) -> HalResult<DiskGeometry> {
    let fields: Vec<&str> = output
        .lines()
        .map(|line| line.trim().split(':').collect::<Vec<_>>())
        .find(|fields| fields.len() > LABEL_FIELD)
        .ok_or_else(|| HalError::Parse("parted: no summary row in output".to_string()))?;

    let size = fields[SIZE_FIELD];
    let total_gb = size
        .strip_suffix(SIZE_UNIT)
        .and_then(|num| num.parse::<u64>().ok())
        .ok_or_else(|| HalError::Parse(format!("parted: unexpected disk size {:?}", size)))?;

    Ok(DiskGeometry {
        total_gb,
        label: fields[LABEL_FIELD].to_string(),
    })
}

fn size_query() -> PartedScript {
    PartedScript::new(PartedMode::Machine)
        .unit(SIZE_UNIT)
        .op(PartedOp::Print)
}

fn relabel() -> PartedScript {
    PartedScript::new(PartedMode::Script).op(PartedOp::MkLabel {
        label: DEFAULT_LABEL.to_string(),
    })
}

/// One size query; any non-zero exit is a failure.
fn query<H: PartitionOps + ?Sized>(hal: &H, disk: &Path) -> HalResult<DiskGeometry> {
    parse_summary(&hal.parted(disk, &size_query())?)
}

/// First size query. `parted` exits non-zero on a disk without a label but
/// still prints the summary row; that case is returned as an `unknown` geometry.
fn first_query<H: PartitionOps + ?Sized>(hal: &H, disk: &Path) -> HalResult<DiskGeometry> {
    match hal.parted(disk, &size_query()) {
        Ok(stdout) => parse_summary(&stdout),
        Err(err) => {
            let unlabeled = match &err {
                HalError::CommandFailed { output, .. } => parse_summary(output)
                    .ok()
                    .filter(DiskGeometry::needs_label),
                _ => None,
            };
            unlabeled.ok_or(err)
        }
    }
}

/// Query, and if the disk has no partition table write a fresh `msdos` label
/// and query again.
pub fn try_inspect<H: PartitionOps + ?Sized>(hal: &H, disk: &Path) -> HalResult<DiskGeometry> {
    let geometry = first_query(hal, disk)?;
    if !geometry.needs_label() {
        return Ok(geometry);
    }

    log::info!(
        "{} has no partition table, writing {} label",
        disk.display(),
        DEFAULT_LABEL
    );
    hal.parted(disk, &relabel())?;
    query(hal, disk)
}

/// Size and label of `disk`, repairing a missing label. Any failure yields
/// [`DiskGeometry::unknown`] (size 0), never a guessed size.
pub fn inspect<H: PartitionOps + ?Sized>(hal: &H, disk: &Path) -> DiskGeometry {
    try_inspect(hal, disk).unwrap_or_else(|err| {
        log::warn!("Unable to determine size of {}: {}", disk.display(), err);
        DiskGeometry::unknown()
    })
}

/// Read-only variant of [`inspect`] used in dry-run mode: never relabels.
pub fn probe<H: PartitionOps + ?Sized>(hal: &H, disk: &Path) -> DiskGeometry {
    first_query(hal, disk).unwrap_or_else(|err| {
        log::warn!("Unable to determine size of {}: {}", disk.display(), err);
        DiskGeometry::unknown()
    })
}
