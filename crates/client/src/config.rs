use blockstack_input::DEFAULT_DOUBLE_TAP_MS;
use blockstack_world::{
    StackParams, DEFAULT_DEBOUNCE_MS, DEFAULT_PLACEMENT_SCALE, DEFAULT_STACK_FACTOR,
    DEFAULT_STORAGE_KEY,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tunables for a [`crate::Session`]; fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fraction of each block's height that lifts the next block.
    pub stack_factor: f32,
    /// Uniform scale applied to placed geometry before measuring it.
    pub placement_scale: f32,
    /// Quiet period before a pending write is persisted.
    pub debounce_ms: u64,
    /// Maximum gap between taps that counts as a double-tap.
    pub double_tap_ms: u64,
    /// Durable slot the stack is mirrored into.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stack_factor: DEFAULT_STACK_FACTOR,
            placement_scale: DEFAULT_PLACEMENT_SCALE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    /// Replace out-of-range values with defaults, logging each replacement.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.stack_factor.is_finite() || self.stack_factor < 0.0 {
            warn!(
                value = self.stack_factor,
                "stack_factor must be >= 0; using default"
            );
            self.stack_factor = defaults.stack_factor;
        }
        if !self.placement_scale.is_finite() || self.placement_scale <= 0.0 {
            warn!(
                value = self.placement_scale,
                "placement_scale must be > 0; using default"
            );
            self.placement_scale = defaults.placement_scale;
        }
        if self.storage_key.trim().is_empty() {
            warn!("storage_key must not be empty; using default");
            self.storage_key = defaults.storage_key;
        }
        self
    }

    /// Stacking parameters derived from this config.
    pub fn stack_params(&self) -> StackParams {
        StackParams {
            stack_factor: self.stack_factor,
            placement_scale: self.placement_scale,
        }
    }
}
