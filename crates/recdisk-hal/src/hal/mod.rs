//! HAL trait definitions and implementations.
//!
//! This module defines the core traits for system operations and provides
//! both real (LinuxHal) and fake (FakeHal) implementations.

pub mod fake_hal;
pub mod format_ops;
pub mod host_info_ops;
pub mod linux_hal;
pub mod mount_ops;
pub mod partition_ops;
pub mod probe_ops;
pub mod system_ops;

pub use fake_hal::{FakeHal, FakeTool, Operation, PartedReply};
pub use format_ops::{FormatOps, FormatOptions, MKFS_EXT4, MKFS_FORCE_FLAG};
pub use host_info_ops::HostInfoOps;
pub use linux_hal::LinuxHal;
pub use mount_ops::{MountOps, UMOUNT};
pub use partition_ops::{PartedMode, PartedOp, PartedScript, PartitionOps, BOOT_SECTOR_BYTES, PARTED};
pub use probe_ops::{NodeKind, ProbeOps};
pub use system_ops::SystemOps;

/// Complete HAL combining all system operation traits.
pub trait SystemHal:
    HostInfoOps + ProbeOps + PartitionOps + FormatOps + MountOps + SystemOps
{
}

/// Automatically implement SystemHal for any type implementing all required traits.
impl<T> SystemHal for T where
    T: HostInfoOps + ProbeOps + PartitionOps + FormatOps + MountOps + SystemOps + ?Sized
{
}
