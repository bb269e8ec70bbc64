#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod aabb;

use serde::{Deserialize, Serialize};

pub use aabb::Aabb;
pub use glam::Vec3;

/// Logical timestamp in milliseconds.
///
/// Every interaction carries the time it happened at, so debounce and
/// double-tap windows are evaluated against event time rather than a clock
/// read inside the engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Start of every timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` milliseconds.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
