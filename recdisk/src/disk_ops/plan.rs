//! System/raw split of a disk.

use std::fmt;

/// Sizes are decimal GB as reported by `parted ... unit GB`. The system share
/// is computed with real division, so it may be fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionPlan {
    pub total_gb: u64,
    pub system_gb: f64,
}

impl PartitionPlan {
    /// `ratio_percent` is clamped to `1..=100`, keeping `system_gb <= total_gb`.
    pub fn new(total_gb: u64, ratio_percent: u8) -> Self {
        let ratio = f64::from(ratio_percent.clamp(1, 100));
        Self {
            total_gb,
            system_gb: total_gb as f64 * ratio / 100.0,
        }
    }

    pub fn raw_gb(&self) -> f64 {
        (self.total_gb as f64 - self.system_gb).max(0.0)
    }

    pub fn has_raw_partition(&self) -> bool {
        self.system_gb < self.total_gb as f64
    }

    /// `mkpart` start/end for the system partition.
    pub fn system_bounds(&self) -> (String, String) {
        ("0".to_string(), format_gb(self.system_gb))
    }

    /// `mkpart` start/end for the raw partition, if one is planned.
    pub fn raw_bounds(&self) -> Option<(String, String)> {
        self.has_raw_partition()
            .then(|| (format_gb(self.system_gb), self.total_gb.to_string()))
    }
}

impl fmt::Display for PartitionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} GB total, {} GB system, {} GB raw",
            self.total_gb,
            format_gb(self.system_gb),
            format_gb(self.raw_gb())
        )
    }
}

pub fn plan(total_gb: u64, ratio_percent: u8) -> PartitionPlan {
    PartitionPlan::new(total_gb, ratio_percent)
}

/// Whole values keep one decimal (`5.0`), fractional ones print in full (`2.35`).
pub fn format_gb(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
