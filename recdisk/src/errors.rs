//! Outcome codes reported by every command, and the error type carrying them.

use std::fmt;
use thiserror::Error;

/// Closed set of command outcomes. The numeric value is the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutcomeCode {
    Ok = 0,
    WrongDisk = 1,
    WrongPath = 2,
    NotDisk = 3,
    NoTools = 4,
    NoPermissions = 5,
    PartFailure = 6,
    PartMounted = 7,
}

/// Message catalog, indexed by code. Order must follow the discriminants above.
const CATALOG: [(OutcomeCode, &str); 8] = [
    (OutcomeCode::Ok, "Operation finished successfully"),
    (OutcomeCode::WrongDisk, "The disk specified is already partitioned"),
    (
        OutcomeCode::WrongPath,
        "Path to disk provided on the command line is invalid",
    ),
    (OutcomeCode::NotDisk, "The path provided is a partition, not a disk"),
    (
        OutcomeCode::NoTools,
        "One of the command-line utilities required for this script is not found",
    ),
    (OutcomeCode::NoPermissions, "This script requires root permissions"),
    (OutcomeCode::PartFailure, "Partitioning finished unsuccessfully"),
    (OutcomeCode::PartMounted, "Partition mounted, umount failed"),
];

pub const NO_DESCRIPTION: &str = "No description available for this error code";

impl OutcomeCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| CATALOG.get(idx))
            .map(|(outcome, _)| *outcome)
    }

    pub fn message(self) -> &'static str {
        CATALOG[self as usize].1
    }
}

impl fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Message for a raw numeric code, as printed by `--errno`.
pub fn describe(code: i64) -> &'static str {
    OutcomeCode::from_code(code)
        .map(OutcomeCode::message)
        .unwrap_or(NO_DESCRIPTION)
}

/// A failed command. Displayed as the outcome message followed by the
/// diagnostic detail, the way it is printed to the operator.
#[derive(Error, Debug)]
pub enum RecdiskError {
    #[error("{}{}", OutcomeCode::WrongDisk, suffix(.0))]
    WrongDisk(String),
    #[error("{}{}", OutcomeCode::WrongPath, suffix(.0))]
    WrongPath(String),
    #[error("{}{}", OutcomeCode::NotDisk, suffix(.0))]
    NotDisk(String),
    #[error("{}{}", OutcomeCode::NoTools, suffix(.0))]
    NoTools(String),
    #[error("{}", OutcomeCode::NoPermissions)]
    NoPermissions,
    #[error("{}{}", OutcomeCode::PartFailure, suffix(.0))]
    PartFailure(String),
    #[error("{}{}", OutcomeCode::PartMounted, suffix(.0))]
    PartMounted(String),
}

/// `": <detail>"`, or nothing when there is no detail.
fn suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}

impl RecdiskError {
    pub fn outcome(&self) -> OutcomeCode {
        match self {
            RecdiskError::WrongDisk(_) => OutcomeCode::WrongDisk,
            RecdiskError::WrongPath(_) => OutcomeCode::WrongPath,
            RecdiskError::NotDisk(_) => OutcomeCode::NotDisk,
            RecdiskError::NoTools(_) => OutcomeCode::NoTools,
            RecdiskError::NoPermissions => OutcomeCode::NoPermissions,
            RecdiskError::PartFailure(_) => OutcomeCode::PartFailure,
            RecdiskError::PartMounted(_) => OutcomeCode::PartMounted,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            RecdiskError::WrongDisk(d)
            | RecdiskError::WrongPath(d)
            | RecdiskError::NotDisk(d)
            | RecdiskError::NoTools(d)
            | RecdiskError::PartFailure(d)
            | RecdiskError::PartMounted(d) => Some(d.as_str()).filter(|d| !d.is_empty()),
            RecdiskError::NoPermissions => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_codes() {
        for (idx, (outcome, _)) in CATALOG.iter().enumerate() {
            assert_eq!(outcome.code() as usize, idx);
        }
    }

    #[test]
    fn describe_known_and_unknown_codes() {
        assert_eq!(describe(0), "Operation finished successfully");
        assert_eq!(describe(7), "Partition mounted, umount failed");
        assert_eq!(describe(8), NO_DESCRIPTION);
        assert_eq!(describe(-1), NO_DESCRIPTION);
    }

    #[test]
    fn empty_detail_prints_bare_message() {
        let err = RecdiskError::PartMounted(String::new());
        assert_eq!(err.to_string(), "Partition mounted, umount failed");
    }

    #[test]
    fn detail_follows_message() {
        let err = RecdiskError::WrongPath("/dev/sdz".to_string());
        assert_eq!(
            err.to_string(),
            "Path to disk provided on the command line is invalid: /dev/sdz"
        );
        assert_eq!(
            RecdiskError::NoPermissions.to_string(),
            "This script requires root permissions"
        );
    }

    #[test]
    fn errors_map_back_to_outcome_codes() {
        assert_eq!(RecdiskError::NoPermissions.outcome().code(), 5);
        let err = RecdiskError::PartFailure("mkfs.ext4 exploded".to_string());
        assert_eq!(err.outcome(), OutcomeCode::PartFailure);
        assert_eq!(
            err.to_string(),
            "Partitioning finished unsuccessfully: mkfs.ext4 exploded"
        );
    }
}
