//! Filesystem formatting operations trait.

use crate::HalResult;
use std::path::Path;

pub const MKFS_EXT4: &str = "mkfs.ext4";

/// Makes `mkfs.ext4` overwrite an existing filesystem without asking.
pub const MKFS_FORCE_FLAG: &str = "-FF";

/// Trait for formatting block devices.
pub trait FormatOps {
    /// Format a device with ext4 filesystem.
    ///
    /// # Arguments
    /// * `device` - Block device path (e.g., `/dev/sda1`)
    /// * `opts` - Formatting options
    fn format_ext4(&self, device: &Path, opts: &FormatOptions) -> HalResult<()>;
}

/// Options for formatting operations.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Overwrite an existing filesystem.
    pub force: bool,
}

impl FormatOptions {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    /// Full argument vector for `mkfs.ext4` targeting `device`.
    pub fn args(&self, device: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(2);
        if self.force {
            args.push(MKFS_FORCE_FLAG.to_string());
        }
        args.push(device.display().to_string());
        args
    }
}
