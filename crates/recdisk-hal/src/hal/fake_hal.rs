//! Fake HAL implementation for testing.
//!
//! This implementation records all operations without executing them,
//! allowing for CI-safe testing without root privileges or real hardware.
//! Kernel reports and `parted` query output are scripted by the test.

use super::{
    FormatOps, FormatOptions, HostInfoOps, MountOps, NodeKind, PartedScript, PartitionOps,
    ProbeOps, SystemOps, MKFS_EXT4, PARTED, UMOUNT,
};
use crate::procfs::mounts::parse_mounts;
use crate::{HalError, HalResult};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ReadPartitions,
    ReadMounts,
    Parted { disk: PathBuf, args: Vec<String> },
    FormatExt4 { device: PathBuf, args: Vec<String> },
    Unmount { target: PathBuf },
    WipeBootSector { disk: PathBuf },
    Settle { delay: Duration },
}

impl Operation {
    /// True for operations that stand for an external tool run or a device write.
    pub fn is_invocation(&self) -> bool {
        !matches!(self, Operation::ReadPartitions | Operation::ReadMounts)
    }
}

/// External collaborators whose failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeTool {
    /// Non-query `parted` invocations (mklabel / mkpart).
    Parted,
    Mkfs,
    Umount,
    Wipe,
}

impl FakeTool {
    fn program(self) -> &'static str {
        match self {
            FakeTool::Parted => PARTED,
            FakeTool::Mkfs => MKFS_EXT4,
            FakeTool::Umount => UMOUNT,
            FakeTool::Wipe => "boot-sector-wipe",
        }
    }
}

/// Scripted result of a `parted ... print` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartedReply {
    Ok(String),
    /// Non-zero exit; the string is what the tool printed.
    Fail(String),
}

/// Shared state for FakeHal operations.
#[derive(Debug, Clone)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// `None` makes reading `/proc/partitions` fail
    partitions: Option<String>,
    mounts: String,
    parted_queries: VecDeque<PartedReply>,
    failures: HashMap<FakeTool, String>,
    block_devices: HashSet<PathBuf>,
    other_nodes: HashSet<PathBuf>,
    root: bool,
}

impl Default for FakeHalState {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            partitions: Some("major minor  #blocks  name\n\n".to_string()),
            mounts: String::new(),
            parted_queries: VecDeque::new(),
            failures: HashMap::new(),
            block_devices: HashSet::new(),
            other_nodes: HashSet::new(),
            root: true,
        }
    }
}

/// Fake HAL implementation that records operations without executing them.
///
/// This is designed for testing and CI environments where real system
/// operations would fail or be dangerous.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state(self, f: impl FnOnce(&mut FakeHalState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    /// Script the text of `/proc/partitions`.
    pub fn with_partitions(self, report: impl Into<String>) -> Self {
        let report = report.into();
        self.with_state(|s| s.partitions = Some(report))
    }

    /// Make reading `/proc/partitions` fail.
    pub fn with_unreadable_partitions(self) -> Self {
        self.with_state(|s| s.partitions = None)
    }

    /// Script the text of `/proc/mounts`.
    pub fn with_mounts(self, report: impl Into<String>) -> Self {
        let report = report.into();
        self.with_state(|s| s.mounts = report)
    }

    pub fn with_block_device(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_state(|s| {
            s.block_devices.insert(path);
        })
    }

    /// Register a path that exists but is not a block device.
    pub fn with_regular_file(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_state(|s| {
            s.other_nodes.insert(path);
        })
    }

    pub fn without_root(self) -> Self {
        self.with_state(|s| s.root = false)
    }

    /// Queue the reply to the next `parted ... print` query.
    pub fn queue_parted_print(self, reply: PartedReply) -> Self {
        self.with_state(|s| s.parted_queries.push_back(reply))
    }

    /// Make every invocation of `tool` fail with `output` as its diagnostic text.
    pub fn fail_tool(self, tool: FakeTool, output: impl Into<String>) -> Self {
        let output = output.into();
        self.with_state(|s| {
            s.failures.insert(tool, output);
        })
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Recorded operations that ran a tool or wrote to a device.
    pub fn invocations(&self) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(Operation::is_invocation)
            .collect()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    fn record_operation(&self, op: Operation) {
        self.state.lock().unwrap().operations.push(op);
    }

    fn injected_failure(&self, tool: FakeTool) -> HalResult<()> {
        match self.state.lock().unwrap().failures.get(&tool) {
            Some(output) => Err(HalError::CommandFailed {
                program: tool.program().to_string(),
                code: Some(1),
                output: output.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl HostInfoOps for FakeHal {
    fn proc_partitions(&self) -> HalResult<String> {
        self.record_operation(Operation::ReadPartitions);
        self.state
            .lock()
            .unwrap()
            .partitions
            .clone()
            .ok_or_else(|| HalError::Other("FAKE HAL: /proc/partitions unreadable".to_string()))
    }

    fn proc_mounts(&self) -> HalResult<String> {
        self.record_operation(Operation::ReadMounts);
        Ok(self.state.lock().unwrap().mounts.clone())
    }

    fn is_root(&self) -> bool {
        self.state.lock().unwrap().root
    }
}

impl ProbeOps for FakeHal {
    fn node_kind(&self, path: &Path) -> HalResult<NodeKind> {
        let state = self.state.lock().unwrap();
        let kind = if state.block_devices.contains(path) {
            NodeKind::BlockDevice
        } else if state.other_nodes.contains(path) {
            NodeKind::Other
        } else {
            NodeKind::Missing
        };
        Ok(kind)
    }
}

impl PartitionOps for FakeHal {
    fn parted(&self, disk: &Path, script: &PartedScript) -> HalResult<String> {
        log::info!("FAKE HAL: parted {}", script.args(disk).join(" "));
        self.record_operation(Operation::Parted {
            disk: disk.to_path_buf(),
            args: script.args(disk),
        });

        if !script.is_query() {
            self.injected_failure(FakeTool::Parted)?;
            return Ok(String::new());
        }

        let reply = self.state.lock().unwrap().parted_queries.pop_front();
        match reply {
            Some(PartedReply::Ok(stdout)) => Ok(stdout),
            Some(PartedReply::Fail(output)) => Err(HalError::CommandFailed {
                program: PARTED.to_string(),
                code: Some(1),
                output,
            }),
            None => Err(HalError::CommandFailed {
                program: PARTED.to_string(),
                code: Some(1),
                output: "FAKE HAL: no scripted parted reply".to_string(),
            }),
        }
    }

    fn wipe_boot_sector(&self, disk: &Path) -> HalResult<()> {
        log::info!("FAKE HAL: wipe boot sector {}", disk.display());
        self.record_operation(Operation::WipeBootSector {
            disk: disk.to_path_buf(),
        });
        self.injected_failure(FakeTool::Wipe)
    }
}

impl FormatOps for FakeHal {
    fn format_ext4(&self, device: &Path, opts: &FormatOptions) -> HalResult<()> {
        log::info!("FAKE HAL: mkfs.ext4 {}", opts.args(device).join(" "));
        self.record_operation(Operation::FormatExt4 {
            device: device.to_path_buf(),
            args: opts.args(device),
        });
        self.injected_failure(FakeTool::Mkfs)
    }
}

impl MountOps for FakeHal {
    fn unmount(&self, target: &Path) -> HalResult<()> {
        log::info!("FAKE HAL: unmount {}", target.display());
        self.record_operation(Operation::Unmount {
            target: target.to_path_buf(),
        });
        self.injected_failure(FakeTool::Umount)?;

        // Drop the released entry so later reads of the mount table see it gone.
        let mut state = self.state.lock().unwrap();
        let target_str = target.to_string_lossy();
        let remaining = state
            .mounts
            .lines()
            .filter(|line| match parse_mounts(line).first() {
                Some(entry) => entry.mount_point != target && entry.source != target_str,
                None => true,
            })
            .collect::<Vec<_>>()
            .join("\n");
        state.mounts = remaining;
        Ok(())
    }
}

impl SystemOps for FakeHal {
    fn settle(&self, delay: Duration) {
        self.record_operation(Operation::Settle { delay });
    }
}
