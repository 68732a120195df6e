//! The top-level commands: list disks, list partitions, partition a disk.

use crate::config::Config;
use crate::disk_ops::classify::is_partition;
use crate::disk_ops::discovery::{find_disks, find_partitions, try_find_partitions};
use crate::disk_ops::execute::{execute, ExecuteOptions};
use crate::disk_ops::inspect::{inspect, probe};
use crate::disk_ops::plan::{format_gb, PartitionPlan};
use crate::disk_ops::{DiskFilter, DiskGeometry};
use crate::errors::RecdiskError;
use recdisk_hal::{NodeKind, SystemHal};
use std::path::Path;

/// Flags shared by the commands that may touch a disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub dry_run: bool,
    pub force: bool,
    /// The disk was just wiped; the kernel's partition view is stale.
    pub reformatted: bool,
}

/// Size and label, repairing a missing label unless this is a dry run.
fn geometry<H: SystemHal + ?Sized>(hal: &H, disk: &Path, dry_run: bool) -> DiskGeometry {
    if dry_run {
        probe(hal, disk)
    } else {
        inspect(hal, disk)
    }
}

/// One `path:<total> GB:<system> GB` line per candidate disk. Unpartitioned
/// disks only, unless forced.
pub fn list_disks<H: SystemHal + ?Sized>(hal: &H, cfg: &Config, flags: RunFlags) -> Vec<String> {
    let filter = if flags.force {
        DiskFilter::All
    } else {
        DiskFilter::Unpartitioned
    };

    find_disks(hal, filter)
        .into_iter()
        .map(|disk| {
            let geometry = geometry(hal, &disk.path, flags.dry_run);
            let system = if geometry.is_usable() {
                format_gb(PartitionPlan::new(geometry.total_gb, cfg.system_ratio_percent).system_gb)
            } else {
                "0".to_string()
            };
            format!("{}:{} GB:{} GB", disk.path.display(), geometry.total_gb, system)
        })
        .collect()
}

/// Every partition of every whole disk, joined by `:`.
pub fn list_partitions<H: SystemHal + ?Sized>(hal: &H) -> String {
    find_disks(hal, DiskFilter::All)
        .iter()
        .flat_map(|disk| find_partitions(hal, &disk.path))
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// All checks that must pass before anything destructive runs.
pub fn validate_target<H: SystemHal + ?Sized>(
    hal: &H,
    disk: &Path,
    flags: RunFlags,
) -> Result<(), RecdiskError> {
    let shown = disk.display().to_string();
    match hal.node_kind(disk) {
        Ok(NodeKind::BlockDevice) => {}
        Ok(_) => return Err(RecdiskError::WrongPath(shown)),
        Err(err) => return Err(RecdiskError::WrongPath(format!("{}: {}", shown, err.diagnostic()))),
    }

    if is_partition(disk) {
        return Err(RecdiskError::NotDisk(shown));
    }

    if flags.reformatted {
        log::info!("{} was just wiped, skipping partition check", shown);
        return Ok(());
    }

    let existing = try_find_partitions(hal, disk).map_err(|err| {
        RecdiskError::PartFailure(format!("unable to read partition table: {}", err.diagnostic()))
    })?;
    if !existing.is_empty() {
        let names: Vec<String> = existing.iter().map(ToString::to_string).collect();
        return Err(RecdiskError::WrongDisk(names.join(":")));
    }
    Ok(())
}

/// Validate, inspect, plan and run the partition/format sequence on `disk`.
pub fn partition_disk<H: SystemHal + ?Sized>(
    hal: &H,
    cfg: &Config,
    disk: &Path,
    flags: RunFlags,
) -> Result<(), RecdiskError> {
    validate_target(hal, disk, flags)?;

    let geometry = geometry(hal, disk, flags.dry_run);
    if !geometry.is_usable() {
        return Err(RecdiskError::PartFailure(
            "unable to determine disk size".to_string(),
        ));
    }

    let plan = PartitionPlan::new(geometry.total_gb, cfg.system_ratio_percent);
    let opts = ExecuteOptions {
        dry_run: flags.dry_run,
        force: flags.force,
        settle_delay: cfg.settle_delay,
    };
    execute(hal, disk, &plan, &opts).map_err(|err| RecdiskError::PartFailure(err.diagnostic()))?;

    log::info!("{} partitioned: {}", disk.display(), plan);
    Ok(())
}
