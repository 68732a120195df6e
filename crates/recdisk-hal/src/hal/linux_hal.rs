//! Linux HAL implementation using real system calls and tools.

use super::{
    FormatOps, FormatOptions, HostInfoOps, MountOps, NodeKind, PartedScript, PartitionOps,
    ProbeOps, SystemOps, BOOT_SECTOR_BYTES, MKFS_EXT4, PARTED, UMOUNT,
};
use crate::{HalError, HalResult};
use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::FileTypeExt;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

const PROC_PARTITIONS: &str = "/proc/partitions";
const PROC_MOUNTS: &str = "/proc/mounts";

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

fn map_command_err(program: &str, err: io::Error) -> HalError {
    if err.kind() == io::ErrorKind::NotFound {
        return HalError::CommandNotFound(program.to_string());
    }
    HalError::Io(err)
}

fn output_failed(program: &str, output: &Output) -> HalError {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    HalError::CommandFailed {
        program: program.to_string(),
        code: output.status.code(),
        output: combined.trim().to_string(),
    }
}

/// Run `program` to completion and return its stdout; a non-zero exit status
/// becomes [`HalError::CommandFailed`] carrying everything the tool printed.
fn run_tool(program: &str, args: &[String]) -> HalResult<String> {
    log::info!("{} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| map_command_err(program, e))?;

    if !output.status.success() {
        return Err(output_failed(program, &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl HostInfoOps for LinuxHal {
    fn proc_partitions(&self) -> HalResult<String> {
        Ok(fs::read_to_string(PROC_PARTITIONS)?)
    }

    fn proc_mounts(&self) -> HalResult<String> {
        Ok(fs::read_to_string(PROC_MOUNTS)?)
    }

    fn is_root(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }
}

impl ProbeOps for LinuxHal {
    fn node_kind(&self, path: &Path) -> HalResult<NodeKind> {
        match fs::metadata(path) {
            Ok(meta) if meta.file_type().is_block_device() => Ok(NodeKind::BlockDevice),
            Ok(_) => Ok(NodeKind::Other),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(NodeKind::Missing),
            Err(err) => Err(HalError::Io(err)),
        }
    }
}

impl PartitionOps for LinuxHal {
    fn parted(&self, disk: &Path, script: &PartedScript) -> HalResult<String> {
        run_tool(PARTED, &script.args(disk))
    }

    fn wipe_boot_sector(&self, disk: &Path) -> HalResult<()> {
        log::info!("🧹 Zeroing boot sector of {}", disk.display());
        let mut out = fs::OpenOptions::new().write(true).open(disk)?;
        out.write_all(&[0u8; BOOT_SECTOR_BYTES])?;

        // Best-effort flush (block devices may ignore).
        out.sync_all().ok();

        Ok(())
    }
}

impl FormatOps for LinuxHal {
    fn format_ext4(&self, device: &Path, opts: &FormatOptions) -> HalResult<()> {
        run_tool(MKFS_EXT4, &opts.args(device)).map(|_| ())
    }
}

impl MountOps for LinuxHal {
    fn unmount(&self, target: &Path) -> HalResult<()> {
        run_tool(UMOUNT, &[target.display().to_string()]).map(|_| ())
    }
}

impl SystemOps for LinuxHal {
    fn settle(&self, delay: Duration) {
        log::info!("Waiting {}s for partition nodes to appear", delay.as_secs_f32());
        std::thread::sleep(delay);
    }
}
