//! Parsers for the two kernel text reports recdisk reads.

pub mod mounts;
pub mod partitions;
