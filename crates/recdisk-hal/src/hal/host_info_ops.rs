//! Host information (read-only).
//!
//! This is "world-touching" (reads `/proc`, queries the process credentials)
//! and belongs in the HAL.

use crate::HalResult;

pub trait HostInfoOps {
    /// Raw text of `/proc/partitions`.
    fn proc_partitions(&self) -> HalResult<String>;

    /// Raw text of `/proc/mounts`.
    fn proc_mounts(&self) -> HalResult<String>;

    /// Whether the process runs with an effective UID of 0.
    fn is_root(&self) -> bool;
}
