//! Partitioning operations (parted, boot-sector wipe).

use crate::HalResult;
use std::fmt;
use std::path::Path;

pub const PARTED: &str = "parted";

/// Size of the MBR boot sector zeroed to destroy a partition table.
pub const BOOT_SECTOR_BYTES: usize = 512;

/// How `parted` is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartedMode {
    /// `-s`: never prompt.
    Script,
    /// `-m`: machine-parseable, colon-delimited output.
    Machine,
}

impl PartedMode {
    fn flag(self) -> &'static str {
        match self {
            PartedMode::Script => "-s",
            PartedMode::Machine => "-m",
        }
    }
}

/// A single `parted` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartedOp {
    MkLabel {
        label: String,
    },
    MkPart {
        part_type: String,
        start: String,
        end: String,
    },
    Print,
}

impl PartedOp {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            PartedOp::MkLabel { label } => {
                args.push("mklabel".to_string());
                args.push(label.clone());
            }
            PartedOp::MkPart {
                part_type,
                start,
                end,
            } => {
                args.push("mkpart".to_string());
                args.push(part_type.clone());
                args.push(start.clone());
                args.push(end.clone());
            }
            PartedOp::Print => args.push("print".to_string()),
        }
    }
}

/// One `parted` invocation: a mode, an optional unit and a list of commands
/// executed in order by the same process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartedScript {
    pub mode: PartedMode,
    pub unit: Option<String>,
    pub ops: Vec<PartedOp>,
}

impl PartedScript {
    pub fn new(mode: PartedMode) -> Self {
        Self {
            mode,
            unit: None,
            ops: Vec::new(),
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn op(mut self, op: PartedOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn is_query(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, PartedOp::Print))
    }

    /// Argument vector for `parted` operating on `disk`.
    pub fn args(&self, disk: &Path) -> Vec<String> {
        let mut args = vec![self.mode.flag().to_string(), disk.display().to_string()];
        if let Some(unit) = &self.unit {
            args.push("unit".to_string());
            args.push(unit.clone());
        }
        for op in &self.ops {
            op.push_args(&mut args);
        }
        args
    }
}

impl fmt::Display for PartedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut args = Vec::new();
        if let Some(unit) = &self.unit {
            args.push("unit".to_string());
            args.push(unit.clone());
        }
        for op in &self.ops {
            op.push_args(&mut args);
        }
        write!(f, "{}", args.join(" "))
    }
}

pub trait PartitionOps {
    /// Execute one `parted` invocation on the given disk and return its stdout.
    fn parted(&self, disk: &Path, script: &PartedScript) -> HalResult<String>;

    /// Overwrite the first [`BOOT_SECTOR_BYTES`] of `disk` with zeros.
    fn wipe_boot_sector(&self, disk: &Path) -> HalResult<()>;
}
