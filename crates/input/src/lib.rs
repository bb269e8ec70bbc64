#![warn(missing_docs)]
//! Catalog selection and tap gesture handling.
//!
//! A tap always selects the tapped entry. Two taps less than the double-tap
//! window apart also place the most recently tapped entry. Only the time of
//! the previous tap is compared, so tapping two different entries quickly
//! counts as a double-tap on the second one.

use blockstack_core::Millis;
use tracing::debug;

/// Default maximum gap between the two taps of a double-tap.
pub const DEFAULT_DOUBLE_TAP_MS: u64 = 300;

/// Currently selected catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected yet.
    #[default]
    NoSelection,
    /// The named entry is selected.
    Selected(String),
}

impl Selection {
    /// Selected entry name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Selection::NoSelection => None,
            Selection::Selected(name) => Some(name),
        }
    }
}

/// What a tap asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The entry became the selection.
    Selected(String),
    /// The entry became the selection and should also be placed.
    DoubleTap(String),
}

impl TapOutcome {
    /// Name of the tapped entry.
    pub fn name(&self) -> &str {
        match self {
            TapOutcome::Selected(name) | TapOutcome::DoubleTap(name) => name,
        }
    }

    /// Whether the tap completed a double-tap.
    pub fn is_double_tap(&self) -> bool {
        matches!(self, TapOutcome::DoubleTap(_))
    }
}

/// Selection state plus the timestamp of the last tap.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selection: Selection,
    last_tap: Option<Millis>,
    double_tap_ms: u64,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_TAP_MS)
    }
}

impl SelectionController {
    /// Controller with the given double-tap window.
    pub fn new(double_tap_ms: u64) -> Self {
        Self {
            selection: Selection::NoSelection,
            last_tap: None,
            double_tap_ms,
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected entry name, if any.
    pub fn selected_name(&self) -> Option<&str> {
        self.selection.name()
    }

    /// Double-tap window in milliseconds.
    pub fn double_tap_ms(&self) -> u64 {
        self.double_tap_ms
    }

    /// Select `name` without affecting tap timing.
    pub fn select(&mut self, name: impl Into<String>) {
        self.selection = Selection::Selected(name.into());
    }

    /// Register a tap on the catalog entry `name` at `now`.
    pub fn tap(&mut self, name: impl Into<String>, now: Millis) -> TapOutcome {
        let name = name.into();
        let is_double = self
            .last_tap
            .is_some_and(|previous| now.since(previous) < self.double_tap_ms);
        self.last_tap = Some(now);
        self.selection = Selection::Selected(name.clone());

        if is_double {
            debug!(block = %name, %now, "Double tap");
            TapOutcome::DoubleTap(name)
        } else {
            debug!(block = %name, %now, "Tap");
            TapOutcome::Selected(name)
        }
    }
}
