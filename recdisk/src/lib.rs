//! recdisk: prepare a disk for raw high-throughput recording.
//!
//! A disk is split into a small ext4 system partition and a raw partition
//! that the recorder writes to directly. All host access goes through
//! [`recdisk_hal`], so every command can run against `FakeHal` in tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod disk_ops;
pub mod errors;
pub mod logging;
pub mod preflight;

use clap::CommandFactory;
use cli::{Cli, Command};
use commands::RunFlags;
use config::Config;
use errors::RecdiskError;
use recdisk_hal::{LinuxHal, SystemHal};

/// Run the selected command against the real host and return what should be
/// printed on stdout.
pub fn run(cli: &Cli) -> Result<String, RecdiskError> {
    let hal = LinuxHal::new();
    let cfg = Config::from_cli(cli);
    preflight::run(&hal, &cfg)?;
    dispatch(&hal, cli, &cfg)
}

/// Reformat first when asked, then run exactly one command.
pub fn dispatch<H: SystemHal + ?Sized>(
    hal: &H,
    cli: &Cli,
    cfg: &Config,
) -> Result<String, RecdiskError> {
    let mut flags = RunFlags {
        dry_run: cli.dry_run,
        force: cli.force,
        reformatted: false,
    };

    if cli.reformat {
        flags.force = true;
        if let Some(disk) =
            disk_ops::reformat::reformat(hal, cli.disk_path.as_deref(), cli.dry_run)?
        {
            log::info!("{} reformatted", disk.display());
            flags.reformatted = true;
        }
    }

    let output = match cli.selected() {
        Command::List => lines(commands::list_disks(hal, cfg, flags)),
        Command::Partitions => format!("{}\n", commands::list_partitions(hal)),
        Command::Errno(code) => format!("{}\n", errors::describe(code)),
        Command::Partition(disk) => {
            commands::partition_disk(hal, cfg, &disk, flags)?;
            String::new()
        }
        Command::Help => Cli::command().render_help().to_string(),
    };
    Ok(output)
}

fn lines(items: Vec<String>) -> String {
    items.iter().map(|line| format!("{}\n", line)).collect()
}
