//! Debounced writes on the logical clock.
//!
//! A mutation schedules its snapshot; later mutations replace it and push the
//! deadline out. The owner polls with the current time to release it.

use blockstack_core::Millis;

/// Default quiet period before a pending write lands.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Millis,
    value: T,
}

/// A single deferred write with cancel/replace semantics.
///
/// Scheduling replaces the pending value and pushes the deadline out, so a
/// burst of mutations lands as one write of the final state.
#[derive(Debug, Clone)]
pub struct DebouncedWriter<T> {
    window_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Default for DebouncedWriter<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl<T> DebouncedWriter<T> {
    /// Writer that waits `window_ms` of quiet before releasing a value.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    /// Quiet period in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Queue `value`, replacing any pending one. Returns true if one was replaced.
    pub fn schedule(&mut self, value: T, now: Millis) -> bool {
        let due = now.advance(self.window_ms);
        self.pending.replace(Pending { due, value }).is_some()
    }

    /// Release the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Drop the pending value. Returns true if there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Release the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value.
    pub fn due(&self) -> Option<Millis> {
        self.pending.as_ref().map(|pending| pending.due)
    }
}
