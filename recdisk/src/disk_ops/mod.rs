//! Disk discovery, inspection, planning and the destructive partition/format
//! sequence. Each submodule talks to the host only through `recdisk_hal`.

pub mod classify;
pub mod discovery;
pub mod execute;
pub mod inspect;
pub mod plan;
pub mod reformat;

pub use discovery::{BlockDevice, DiskFilter, PartitionInfo};
pub use execute::{ExecuteOptions, Step, StepError};
pub use inspect::DiskGeometry;
pub use plan::PartitionPlan;
