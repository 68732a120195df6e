//! Unmount operations.

use crate::HalResult;
use std::path::Path;

pub const UMOUNT: &str = "umount";

/// Trait for releasing mounted filesystems.
pub trait MountOps {
    /// Unmount a filesystem via the `umount` tool.
    ///
    /// # Arguments
    /// * `target` - Mount point or device path
    ///
    /// A non-zero exit status is returned as [`crate::HalError::CommandFailed`].
    fn unmount(&self, target: &Path) -> HalResult<()>;
}
