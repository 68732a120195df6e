//! CLI argument parsing for recdisk.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "recdisk", version)]
#[command(about = "Prepare and partition a new disk for fast recording")]
#[command(long_about = "Prepare and partition a new disk for fast recording.\n\n\
    Creates two partitions on a disk: a small ext4 system partition and a raw,\n\
    unformatted partition for direct high-throughput writes.")]
pub struct Cli {
    /// Path to a disk which should be partitioned, e.g. /dev/sda
    pub disk_path: Option<PathBuf>,

    /// List attached disk(s) suitable for partitioning along with their total
    /// sizes and possible system partition sizes, separated by colon
    #[arg(short, long)]
    pub list: bool,

    /// Convert an error number returned by this tool to its message
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub errno: Option<i64>,

    /// Execute the command but do not actually create partitions
    #[arg(short, long = "dry_run")]
    pub dry_run: bool,

    /// Force mkfs to create a file system and re-format existing partitions
    #[arg(short, long)]
    pub force: bool,

    /// List partitions and their sizes separated by colon
    #[arg(short, long)]
    pub partitions: bool,

    /// Format a single partition spanning the whole disk (no raw partition)
    #[arg(short, long)]
    pub all: bool,

    /// Delete existing partitions and reformat (unmounts first)
    #[arg(short, long)]
    pub reformat: bool,
}

/// Top-level command selected by the flags, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Partitions,
    Errno(i64),
    Partition(PathBuf),
    Help,
}

impl Cli {
    pub fn selected(&self) -> Command {
        if self.list {
            Command::List
        } else if self.partitions {
            Command::Partitions
        } else if let Some(code) = self.errno {
            Command::Errno(code)
        } else if let Some(disk) = &self.disk_path {
            Command::Partition(disk.clone())
        } else {
            Command::Help
        }
    }
}
