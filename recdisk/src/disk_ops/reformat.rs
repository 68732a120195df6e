//! `--reformat`: release every mount of a disk and destroy its partition table.

use super::classify::parent_disk;
use super::discovery::{find_disks, DiskFilter};
use crate::errors::RecdiskError;
use recdisk_hal::procfs::mounts::{mounted_under_device, parse_mounts};
use recdisk_hal::{NodeKind, SystemHal};
use std::path::{Path, PathBuf};

/// Disk to wipe. A requested path must be an existing block device; a
/// partition path resolves to its parent disk. Without a request the first
/// whole disk of the kernel report is used, or `None` if there is none.
pub fn resolve_target<H: SystemHal + ?Sized>(
    hal: &H,
    requested: Option<&Path>,
) -> Result<Option<PathBuf>, RecdiskError> {
    let Some(path) = requested else {
        return Ok(find_disks(hal, DiskFilter::All)
            .into_iter()
            .next()
            .map(|disk| disk.path));
    };

    match hal.node_kind(path) {
        Ok(NodeKind::BlockDevice) => {}
        Ok(_) => return Err(RecdiskError::WrongPath(path.display().to_string())),
        Err(err) => {
            return Err(RecdiskError::WrongPath(format!(
                "{}: {}",
                path.display(),
                err.diagnostic()
            )))
        }
    }

    parent_disk(path)
        .map(Some)
        .ok_or_else(|| RecdiskError::NotDisk(path.display().to_string()))
}

/// Unmount everything mounted from `disk` (deepest first), then zero its boot
/// sector. An unmount failure stops here with nothing wiped; a failed wipe is
/// only logged.
pub fn resolve_and_wipe<H: SystemHal + ?Sized>(
    hal: &H,
    disk: &Path,
    dry_run: bool,
) -> Result<(), RecdiskError> {
    let table = hal
        .proc_mounts()
        .map_err(|err| RecdiskError::PartFailure(err.diagnostic()))?;

    for mount_point in mounted_under_device(&parse_mounts(&table), disk) {
        if dry_run {
            log::info!("DRY RUN: unmount {}", mount_point.display());
            continue;
        }
        if let Err(err) = hal.unmount(&mount_point) {
            log::error!("Unable to unmount {}: {}", mount_point.display(), err);
            return Err(RecdiskError::PartMounted(err.diagnostic()));
        }
    }

    if dry_run {
        log::info!("DRY RUN: wipe boot sector of {}", disk.display());
        return Ok(());
    }
    log::info!("Wiping boot sector of {}", disk.display());
    if let Err(err) = hal.wipe_boot_sector(disk) {
        log::warn!("Boot sector wipe of {} failed: {}", disk.display(), err);
    }
    Ok(())
}

/// Resolve the target and wipe it. Returns the disk that was wiped, if any.
pub fn reformat<H: SystemHal + ?Sized>(
    hal: &H,
    requested: Option<&Path>,
    dry_run: bool,
) -> Result<Option<PathBuf>, RecdiskError> {
    let Some(disk) = resolve_target(hal, requested)? else {
        log::info!("No disk found, nothing to reformat");
        return Ok(None);
    };
    resolve_and_wipe(hal, &disk, dry_run)?;
    Ok(Some(disk))
}
