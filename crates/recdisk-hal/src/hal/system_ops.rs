//! System-level operations.

use std::time::Duration;

/// System operations trait.
pub trait SystemOps {
    /// Unconditional pause so the kernel can publish freshly created
    /// partition nodes before they are referenced by path.
    fn settle(&self, delay: Duration);
}
