//! Identifier types for modules and slot generation units.
//!
//! Both identifiers are allocated from process-wide counters, so two values
//! compare equal only if they came from the same allocation.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_MODULE: AtomicU32 = AtomicU32::new(0);
static NEXT_GENERATION: AtomicU32 = AtomicU32::new(0);

/// Identifies one module for the lifetime of the process.
///
/// # Example
///
/// ```
/// use mosaic_core::ModuleId;
///
/// let a = ModuleId::next();
/// let b = ModuleId::next();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

impl ModuleId {
    /// Allocate a fresh module id.
    pub fn next() -> Self {
        Self(NEXT_MODULE.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module_{}", self.0)
    }
}

/// Identifies one generation unit of static slots.
///
/// Every `StaticSlotFactory` owns exactly one generation; slots allocated by
/// different generations never alias even when they share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationId(u32);

impl GenerationId {
    /// Allocate a fresh generation id.
    pub fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen_{}", self.0)
    }
}
