//! The destructive partition/format sequence.
//!
//! The sequence is a flat list of [`Step`]s run in order. There is no
//! rollback: the first failing step stops the run and the steps already
//! completed stay applied on disk. The caller reports the failure and the
//! operator decides whether to retry or reformat.

use super::inspect::{DEFAULT_LABEL, SIZE_UNIT};
use super::plan::PartitionPlan;
use recdisk_hal::procfs::mounts::{mount_points_of, parse_mounts};
use recdisk_hal::{
    partition_path, FormatOptions, HalError, HalResult, PartedMode, PartedOp, PartedScript,
    SystemHal, MKFS_EXT4,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Number of the system partition on the target disk.
pub const SYSTEM_PARTITION: u32 = 1;
const PART_TYPE: &str = "primary";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Fresh `msdos` label plus the system partition, in one `parted` run.
    CreateSystemPartition {
        disk: PathBuf,
        start: String,
        end: String,
    },
    CreateRawPartition {
        disk: PathBuf,
        start: String,
        end: String,
    },
    /// Give the kernel time to create the new device nodes.
    Settle(Duration),
    /// Unmount every mount point whose source is `device`, deepest first.
    ReleaseMount { device: PathBuf },
    Format { device: PathBuf, force: bool },
}

/// `parted -s <disk> unit GB [mklabel msdos] mkpart primary <start> <end>`.
fn mkpart_script(with_label: bool, start: &str, end: &str) -> PartedScript {
    let mut script = PartedScript::new(PartedMode::Script).unit(SIZE_UNIT);
    if with_label {
        script = script.op(PartedOp::MkLabel {
            label: DEFAULT_LABEL.to_string(),
        });
    }
    script.op(PartedOp::MkPart {
        part_type: PART_TYPE.to_string(),
        start: start.to_string(),
        end: end.to_string(),
    })
}

impl Step {
    fn run<H: SystemHal + ?Sized>(&self, hal: &H) -> HalResult<()> {
        match self {
            Step::CreateSystemPartition { disk, start, end } => {
                hal.parted(disk, &mkpart_script(true, start, end))?;
            }
            Step::CreateRawPartition { disk, start, end } => {
                hal.parted(disk, &mkpart_script(false, start, end))?;
            }
            Step::Settle(delay) => hal.settle(*delay),
            Step::ReleaseMount { device } => release_mount(hal, device)?,
            Step::Format { device, force } => {
                hal.format_ext4(device, &FormatOptions::new(*force))?
            }
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreateSystemPartition { disk, start, end } => write!(
                f,
                "parted -s {} {}",
                disk.display(),
                mkpart_script(true, start, end)
            ),
            Step::CreateRawPartition { disk, start, end } => write!(
                f,
                "parted -s {} {}",
                disk.display(),
                mkpart_script(false, start, end)
            ),
            Step::Settle(delay) => write!(f, "wait {:?} for device nodes", delay),
            Step::ReleaseMount { device } => write!(f, "unmount {} if mounted", device.display()),
            Step::Format { device, force } => write!(
                f,
                "{} {}",
                MKFS_EXT4,
                FormatOptions::new(*force).args(device).join(" ")
            ),
        }
    }
}

/// Ordered steps that turn `disk` into the layout described by `plan`.
pub fn steps(disk: &Path, plan: &PartitionPlan, force: bool, settle: Duration) -> Vec<Step> {
    let (start, end) = plan.system_bounds();
    let mut steps = vec![Step::CreateSystemPartition {
        disk: disk.to_path_buf(),
        start,
        end,
    }];

    if let Some((start, end)) = plan.raw_bounds() {
        steps.push(Step::CreateRawPartition {
            disk: disk.to_path_buf(),
            start,
            end,
        });
    }

    steps.push(Step::Settle(settle));

    let system = PathBuf::from(partition_path(disk, SYSTEM_PARTITION));
    if force {
        steps.push(Step::ReleaseMount {
            device: system.clone(),
        });
    }
    steps.push(Step::Format {
        device: system,
        force,
    });
    steps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub dry_run: bool,
    pub force: bool,
    pub settle_delay: Duration,
}

/// The step that failed and why. Steps before it have already been applied.
#[derive(Debug, Error)]
#[error("{step}: {source}")]
pub struct StepError {
    pub step: Step,
    #[source]
    pub source: HalError,
}

impl StepError {
    /// Text shown to the operator: the failing tool's own output when there is one.
    pub fn diagnostic(&self) -> String {
        self.source.diagnostic()
    }
}

/// Partition and format `disk`. A dry run only logs the steps and always succeeds.
pub fn execute<H: SystemHal + ?Sized>(
    hal: &H,
    disk: &Path,
    plan: &PartitionPlan,
    opts: &ExecuteOptions,
) -> Result<(), StepError> {
    log::info!("Partitioning {}: {}", disk.display(), plan);

    for step in steps(disk, plan, opts.force, opts.settle_delay) {
        if opts.dry_run {
            log::info!("DRY RUN: {}", step);
            continue;
        }
        if let Err(source) = step.run(hal) {
            log::error!("{} failed, leaving disk as is: {}", step, source);
            return Err(StepError { step, source });
        }
    }
    Ok(())
}

fn release_mount<H: SystemHal + ?Sized>(hal: &H, device: &Path) -> HalResult<()> {
    let table = hal.proc_mounts()?;
    let mut mount_points = mount_points_of(&parse_mounts(&table), device);
    mount_points.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    for mount_point in mount_points {
        log::info!(
            "{} is mounted on {}, unmounting before format",
            device.display(),
            mount_point.display()
        );
        hal.unmount(&mount_point)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk_ops::plan::plan;
    use recdisk_hal::{FakeHal, FakeTool, Operation};

    const SETTLE: Duration = Duration::from_secs(2);

    fn opts(dry_run: bool, force: bool) -> ExecuteOptions {
        ExecuteOptions {
            dry_run,
            force,
            settle_delay: SETTLE,
        }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn default_plan_creates_both_partitions_then_formats() {
        let hal = FakeHal::new();
        execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, false)).unwrap();

        assert_eq!(
            hal.operations(),
            vec![
                Operation::Parted {
                    disk: PathBuf::from("/dev/sda"),
                    args: strings(&[
                        "-s", "/dev/sda", "unit", "GB", "mklabel", "msdos", "mkpart", "primary",
                        "0", "5.0",
                    ]),
                },
                Operation::Parted {
                    disk: PathBuf::from("/dev/sda"),
                    args: strings(&[
                        "-s", "/dev/sda", "unit", "GB", "mkpart", "primary", "5.0", "100",
                    ]),
                },
                Operation::Settle { delay: SETTLE },
                Operation::FormatExt4 {
                    device: PathBuf::from("/dev/sda1"),
                    args: strings(&["/dev/sda1"]),
                },
            ]
        );
    }

    #[test]
    fn whole_disk_plan_skips_raw_partition() {
        let hal = FakeHal::new();
        execute(&hal, Path::new("/dev/sdb"), &plan(100, 100), &opts(false, false)).unwrap();

        let parted_calls = hal
            .operations()
            .into_iter()
            .filter(|op| matches!(op, Operation::Parted { .. }))
            .count();
        assert_eq!(parted_calls, 1);
    }

    #[test]
    fn force_unmounts_system_partition_before_forced_format() {
        let hal = FakeHal::new().with_mounts("/dev/sda1 /media/sda1 ext4 rw,relatime 0 0\n");
        execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, true)).unwrap();

        let ops = hal.invocations();
        let unmount = ops
            .iter()
            .position(|op| {
                *op == Operation::Unmount {
                    target: PathBuf::from("/media/sda1"),
                }
            })
            .expect("unmount issued");
        let format = ops
            .iter()
            .position(|op| matches!(op, Operation::FormatExt4 { .. }))
            .expect("format issued");
        assert!(unmount < format);
        assert_eq!(
            ops[format],
            Operation::FormatExt4 {
                device: PathBuf::from("/dev/sda1"),
                args: strings(&["-FF", "/dev/sda1"]),
            }
        );
    }

    #[test]
    fn force_releases_every_mount_of_system_partition() {
        let hal = FakeHal::new().with_mounts(
            "/dev/sda1 /media/a ext4 rw 0 0\n\
             /dev/sda1 /media/a/nested ext4 rw 0 0\n\
             /dev/sda1 /media/b ext4 rw 0 0\n",
        );
        execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, true)).unwrap();

        let unmounts: Vec<Operation> = hal
            .invocations()
            .into_iter()
            .filter(|op| matches!(op, Operation::Unmount { .. }))
            .collect();
        assert_eq!(unmounts.len(), 3);
        assert_eq!(
            unmounts[0],
            Operation::Unmount {
                target: PathBuf::from("/media/a/nested")
            }
        );
    }

    #[test]
    fn force_without_mount_does_not_unmount() {
        let hal = FakeHal::new().with_mounts("/dev/sda10 /media/x ext4 rw 0 0\n");
        execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, true)).unwrap();
        assert!(!hal.has_operation(|op| matches!(op, Operation::Unmount { .. })));
        assert!(hal.has_operation(|op| matches!(op, Operation::ReadMounts)));
    }

    #[test]
    fn failed_unmount_stops_before_format() {
        let hal = FakeHal::new()
            .with_mounts("/dev/sda1 /media/sda1 ext4 rw 0 0\n")
            .fail_tool(FakeTool::Umount, "umount: /media/sda1: target is busy.");
        let err = execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, true))
            .unwrap_err();

        assert!(matches!(err.step, Step::ReleaseMount { .. }));
        assert_eq!(err.diagnostic(), "umount: /media/sda1: target is busy.");
        assert!(!hal.has_operation(|op| matches!(op, Operation::FormatExt4 { .. })));
    }

    #[test]
    fn partition_failure_stops_without_rollback() {
        let hal = FakeHal::new().fail_tool(FakeTool::Parted, "Error: Partition(s) on /dev/sda are being used.");
        let err = execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, false))
            .unwrap_err();

        assert!(matches!(err.step, Step::CreateSystemPartition { .. }));
        assert_eq!(
            err.diagnostic(),
            "Error: Partition(s) on /dev/sda are being used."
        );
        assert_eq!(hal.invocations().len(), 1);
    }

    #[test]
    fn format_failure_leaves_partitions_in_place() {
        let hal = FakeHal::new().fail_tool(
            FakeTool::Mkfs,
            "/dev/sda1 contains a ext4 file system\nProceed anyway? (y,N)",
        );
        let err = execute(&hal, Path::new("/dev/sda"), &plan(100, 5), &opts(false, false))
            .unwrap_err();

        assert!(matches!(err.step, Step::Format { force: false, .. }));
        let ops = hal.invocations();
        assert_eq!(ops.len(), 4);
        assert!(!ops.iter().any(|op| matches!(op, Operation::WipeBootSector { .. })));
    }

    #[test]
    fn dry_run_invokes_nothing() {
        for (total, ratio) in [(0u64, 5u8), (100, 5), (100, 100), (47, 33), (4000, 1)] {
            for force in [false, true] {
                let hal = FakeHal::new().with_mounts("/dev/sda1 /media/sda1 ext4 rw 0 0\n");
                let result = execute(
                    &hal,
                    Path::new("/dev/sda"),
                    &plan(total, ratio),
                    &opts(true, force),
                );
                assert!(result.is_ok());
                assert_eq!(hal.operation_count(), 0);
            }
        }
    }

    #[test]
    fn steps_render_as_commands() {
        let rendered: Vec<String> = steps(Path::new("/dev/sdc"), &plan(100, 5), true, SETTLE)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rendered,
            vec![
                "parted -s /dev/sdc unit GB mklabel msdos mkpart primary 0 5.0",
                "parted -s /dev/sdc unit GB mkpart primary 5.0 100",
                "wait 2s for device nodes",
                "unmount /dev/sdc1 if mounted",
                "mkfs.ext4 -FF /dev/sdc1",
            ]
        );
    }
}
