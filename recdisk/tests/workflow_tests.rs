use clap::Parser;
use recdisk::cli::Cli;
use recdisk::config::Config;
use recdisk::dispatch;
use recdisk::errors::OutcomeCode;
use recdisk_hal::{FakeHal, FakeTool, Operation, PartedReply};
use std::path::PathBuf;
use std::time::Duration;

const FRESH_SDB: &str = "major minor  #blocks  name\n\
                         \n\
                            8        0  500107608 sda\n\
                            8        1   25000000 sda1\n\
                            8        2  475107608 sda2\n\
                            8       16  250059096 sdb\n";

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["recdisk"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid arguments")
}

fn cfg_for(cli: &Cli) -> Config {
    Config {
        settle_delay: Duration::ZERO,
        ..Config::default()
    }
    .with_overrides(cli, None)
}

fn summary(disk: &str, size_gb: u64, label: &str) -> PartedReply {
    PartedReply::Ok(format!(
        "BYT;\n{}:{}GB:scsi:512:512:{}:ATA Disk:;\n",
        disk, size_gb, label
    ))
}

fn run(hal: &FakeHal, args: &[&str]) -> Result<String, OutcomeCode> {
    let cli = cli(args);
    dispatch(hal, &cli, &cfg_for(&cli)).map_err(|err| err.outcome())
}

fn parted_calls(hal: &FakeHal) -> Vec<Vec<String>> {
    hal.operations()
        .into_iter()
        .filter_map(|op| match op {
            Operation::Parted { args, .. } => Some(args),
            _ => None,
        })
        .collect()
}

#[test]
fn scenario_fresh_disk_report_lists_only_that_disk() {
    let hal = FakeHal::new()
        .with_partitions("major minor  #blocks  name\n\n   1        0    1000000 sda\n")
        .queue_parted_print(summary("/dev/sda", 1, "msdos"));

    assert_eq!(run(&hal, &["--list"]).unwrap(), "/dev/sda:1 GB:0.05 GB\n");
}

#[test]
fn list_uses_whole_disk_ratio_with_all() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"));

    assert_eq!(
        run(&hal, &["--list", "--all"]).unwrap(),
        "/dev/sdb:250 GB:250.0 GB\n"
    );
}

#[test]
fn unlabeled_disk_is_labeled_during_list() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .queue_parted_print(summary("/dev/sdb", 250, "unknown"))
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"));

    assert_eq!(run(&hal, &["-l"]).unwrap(), "/dev/sdb:250 GB:12.5 GB\n");
    assert_eq!(
        parted_calls(&hal),
        vec![
            vec!["-m", "/dev/sdb", "unit", "GB", "print"],
            vec!["-s", "/dev/sdb", "mklabel", "msdos"],
            vec!["-m", "/dev/sdb", "unit", "GB", "print"],
        ]
    );
}

#[test]
fn partitions_listing() {
    let hal = FakeHal::new().with_partitions(FRESH_SDB);
    assert_eq!(
        run(&hal, &["--partitions"]).unwrap(),
        "/dev/sda1 (25.0 GB):/dev/sda2 (475.1 GB)\n"
    );
}

#[test]
fn errno_lookup() {
    let hal = FakeHal::new();
    assert_eq!(
        run(&hal, &["--errno", "7"]).unwrap(),
        "Partition mounted, umount failed\n"
    );
    assert_eq!(
        run(&hal, &["-e", "42"]).unwrap(),
        "No description available for this error code\n"
    );
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn no_command_prints_help() {
    let hal = FakeHal::new();
    let out = run(&hal, &[]).unwrap();
    assert!(out.contains("--dry_run"));
    assert!(out.contains("--reformat"));
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn partitions_fresh_disk_end_to_end() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sdb")
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"));

    assert_eq!(run(&hal, &["/dev/sdb"]).unwrap(), "");
    assert_eq!(
        hal.invocations(),
        vec![
            Operation::Parted {
                disk: PathBuf::from("/dev/sdb"),
                args: ["-m", "/dev/sdb", "unit", "GB", "print"]
                    .map(String::from)
                    .to_vec(),
            },
            Operation::Parted {
                disk: PathBuf::from("/dev/sdb"),
                args: [
                    "-s", "/dev/sdb", "unit", "GB", "mklabel", "msdos", "mkpart", "primary", "0",
                    "12.5",
                ]
                .map(String::from)
                .to_vec(),
            },
            Operation::Parted {
                disk: PathBuf::from("/dev/sdb"),
                args: ["-s", "/dev/sdb", "unit", "GB", "mkpart", "primary", "12.5", "250"]
                    .map(String::from)
                    .to_vec(),
            },
            Operation::Settle {
                delay: Duration::ZERO
            },
            Operation::FormatExt4 {
                device: PathBuf::from("/dev/sdb1"),
                args: vec!["/dev/sdb1".to_string()],
            },
        ]
    );
}

#[test]
fn already_partitioned_disk_is_refused_before_any_invocation() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sda");

    assert_eq!(run(&hal, &["/dev/sda"]), Err(OutcomeCode::WrongDisk));
    assert!(hal.invocations().is_empty());
}

#[test]
fn invalid_paths_are_refused() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sda2");

    assert_eq!(run(&hal, &["/dev/sdx"]), Err(OutcomeCode::WrongPath));
    assert_eq!(run(&hal, &["/dev/sda2"]), Err(OutcomeCode::NotDisk));
    assert!(hal.invocations().is_empty());
}

#[test]
fn format_failure_reports_tool_output() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sdb")
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"))
        .fail_tool(FakeTool::Mkfs, "mkfs.ext4: Device size reported to be zero.");

    let cli = cli(&["/dev/sdb"]);
    let err = dispatch(&hal, &cli, &cfg_for(&cli)).unwrap_err();

    assert_eq!(err.outcome(), OutcomeCode::PartFailure);
    assert_eq!(
        err.to_string(),
        "Partitioning finished unsuccessfully: mkfs.ext4: Device size reported to be zero."
    );
}

#[test]
fn dry_run_partition_issues_only_the_size_query() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sdb")
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"));

    assert_eq!(run(&hal, &["--dry_run", "--force", "/dev/sdb"]).unwrap(), "");
    assert_eq!(hal.invocations().len(), 1);
}

#[test]
fn reformat_with_busy_mount_stops_before_wipe() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sda")
        .with_mounts("/dev/sda1 /media/sda1 ext4 rw,relatime 0 0\n")
        .fail_tool(FakeTool::Umount, "umount: /media/sda1: target is busy.");

    assert_eq!(
        run(&hal, &["--reformat", "/dev/sda"]),
        Err(OutcomeCode::PartMounted)
    );
    assert!(!hal.has_operation(|op| matches!(op, Operation::WipeBootSector { .. })));
    assert!(!hal.has_operation(|op| matches!(op, Operation::Parted { .. })));
}

#[test]
fn reformat_then_repartition_with_forced_format() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .with_block_device("/dev/sda")
        .with_mounts("/dev/sda1 /media/sda1 ext4 rw,relatime 0 0\n")
        .queue_parted_print(summary("/dev/sda", 500, "unknown"))
        .queue_parted_print(summary("/dev/sda", 500, "msdos"));

    assert_eq!(run(&hal, &["--reformat", "/dev/sda"]).unwrap(), "");

    let ops = hal.invocations();
    assert_eq!(
        ops[0],
        Operation::Unmount {
            target: PathBuf::from("/media/sda1")
        }
    );
    assert_eq!(
        ops[1],
        Operation::WipeBootSector {
            disk: PathBuf::from("/dev/sda")
        }
    );
    assert_eq!(
        ops.last(),
        Some(&Operation::FormatExt4 {
            device: PathBuf::from("/dev/sda1"),
            args: vec!["-FF".to_string(), "/dev/sda1".to_string()],
        })
    );
}

#[test]
fn reformat_then_list_shows_all_disks() {
    let hal = FakeHal::new()
        .with_partitions(FRESH_SDB)
        .queue_parted_print(summary("/dev/sda", 500, "msdos"))
        .queue_parted_print(summary("/dev/sdb", 250, "msdos"));

    assert_eq!(
        run(&hal, &["--reformat", "--list"]).unwrap(),
        "/dev/sda:500 GB:25.0 GB\n/dev/sdb:250 GB:12.5 GB\n"
    );
    assert!(hal.has_operation(|op| *op
        == Operation::WipeBootSector {
            disk: PathBuf::from("/dev/sda")
        }));
}
