//! Device node probing.

use crate::HalResult;
use std::path::Path;

/// What a path on the host resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Missing,
    BlockDevice,
    Other,
}

pub trait ProbeOps {
    fn node_kind(&self, path: &Path) -> HalResult<NodeKind>;
}
