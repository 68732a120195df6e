//! recdisk Hardware Abstraction Layer (HAL).
//!
//! Everything that touches the host (spawning `parted`/`mkfs.ext4`/`umount`,
//! reading `/proc`, writing to a raw device) goes through the traits in
//! [`hal`], so the disk workflows can be exercised against [`FakeHal`].

pub mod error;
pub mod hal;
pub mod path;
pub mod procfs;

pub use error::{HalError, HalResult};
pub use path::{device_basename, partition_path};
pub use hal::*;
