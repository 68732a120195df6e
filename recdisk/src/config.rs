use crate::cli::Cli;
use std::time::Duration;

/// Share of the disk given to the system partition unless overridden.
pub const DEFAULT_SYSTEM_RATIO_PERCENT: u8 = 5;
/// `--all`: the system partition takes the whole disk.
pub const WHOLE_DISK_RATIO_PERCENT: u8 = 100;
/// Pause between partition creation and formatting.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

pub const RATIO_ENV: &str = "RECDISK_SYSTEM_RATIO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub system_ratio_percent: u8,
    pub settle_delay: Duration,
    pub required_tools: Vec<String>,
    pub path_env: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system_ratio_percent: DEFAULT_SYSTEM_RATIO_PERCENT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            required_tools: vec!["parted".to_string(), "mkfs.ext4".to_string()],
            path_env: std::env::var("PATH").unwrap_or_default(),
        }
    }
}

impl Config {
    /// Defaults, then `RECDISK_SYSTEM_RATIO`, then `--all`.
    pub fn from_cli(cli: &Cli) -> Self {
        let ratio_override = std::env::var(RATIO_ENV).ok();
        Self::default().with_overrides(cli, ratio_override.as_deref())
    }

    pub fn with_overrides(mut self, cli: &Cli, ratio_env: Option<&str>) -> Self {
        if let Some(raw) = ratio_env {
            match parse_ratio(raw) {
                Some(ratio) => self.system_ratio_percent = ratio,
                None => log::warn!(
                    "Ignoring {}={:?}: expected an integer between 1 and 100",
                    RATIO_ENV,
                    raw
                ),
            }
        }
        if cli.all {
            self.system_ratio_percent = WHOLE_DISK_RATIO_PERCENT;
        }
        self
    }
}

fn parse_ratio(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|ratio| (1..=100).contains(ratio))
}
