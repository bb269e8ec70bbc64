//! Session lifecycle.
//!
//! A session starts in [`SessionPhase::Loading`]. Installing the catalog moves
//! it to [`SessionPhase::CatalogReady`], and restoring persisted placements
//! moves it to [`SessionPhase::Ready`]. Every interaction before `Ready` is
//! ignored, so a late restore can never overwrite blocks the user already
//! placed.
//!
//! Every add schedules a debounced write of the whole stack. Clearing cancels
//! any pending write and overwrites the slot immediately.

use blockstack_assets::{BlockCatalog, Geometry};
use blockstack_core::Millis;
use blockstack_input::{Selection, SelectionController, TapOutcome};
use blockstack_world::{
    load_placements, save_placements, BlockStack, DebouncedWriter, KvStore, PlacedBlock,
    RestoreReport, SerializedPlacement,
};
use tracing::{debug, info, warn};

use crate::{SessionConfig, SessionEvent};

/// Where a session is in its startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the asset catalog.
    Loading,
    /// Catalog installed; persisted placements not yet restored.
    CatalogReady,
    /// Interactive.
    Ready,
}

/// Owner of all mutable state: catalog, selection, stack and pending writes.
pub struct Session<G, S> {
    config: SessionConfig,
    phase: SessionPhase,
    catalog: BlockCatalog<G>,
    selection: SelectionController,
    stack: BlockStack<G>,
    writer: DebouncedWriter<Vec<SerializedPlacement>>,
    store: S,
    events: Vec<(Millis, SessionEvent)>,
}

impl<G: Geometry, S: KvStore> Session<G, S> {
    /// New session in the `Loading` phase.
    pub fn new(config: SessionConfig, store: S) -> Self {
        let config = config.sanitized();
        Self {
            phase: SessionPhase::Loading,
            catalog: BlockCatalog::default(),
            selection: SelectionController::new(config.double_tap_ms),
            stack: BlockStack::new(config.stack_params()),
            writer: DebouncedWriter::new(config.debounce_ms),
            store,
            events: Vec::new(),
            config,
        }
    }

    /// Install the catalog and restore persisted placements in one step.
    pub fn start(&mut self, catalog: BlockCatalog<G>, now: Millis) -> Option<RestoreReport> {
        self.catalog_ready(catalog);
        self.restore(now)
    }

    /// Install the fully built catalog. Only accepted while loading.
    pub fn catalog_ready(&mut self, catalog: BlockCatalog<G>) {
        if self.phase != SessionPhase::Loading {
            warn!(phase = ?self.phase, "Catalog already installed; ignoring replacement");
            return;
        }
        info!(entries = catalog.len(), "Catalog ready");
        self.catalog = catalog;
        self.phase = SessionPhase::CatalogReady;
    }

    /// Read the durable slot and rehydrate the stack against the catalog.
    ///
    /// Returns `None` if the catalog is not installed yet or the session is
    /// already interactive.
    pub fn restore(&mut self, now: Millis) -> Option<RestoreReport> {
        if self.phase != SessionPhase::CatalogReady {
            warn!(phase = ?self.phase, "Restore requires an installed catalog and runs once");
            return None;
        }
        let entries = load_placements(&self.store, &self.config.storage_key);
        let report = self.stack.restore(&self.catalog, entries);
        self.phase = SessionPhase::Ready;
        info!(
            restored = report.restored,
            dropped = report.dropped,
            "Restored placements"
        );
        self.push_event(
            now,
            SessionEvent::Restored {
                restored: report.restored,
                dropped: report.dropped,
            },
        );
        Some(report)
    }

    /// Tap the catalog entry `name`; a double-tap also places it.
    pub fn tap(&mut self, name: &str, now: Millis) -> Option<TapOutcome> {
        if !self.is_interactive("tap") {
            return None;
        }
        if !self.catalog.contains(name) {
            debug!(block = name, "Tap on unknown catalog entry ignored");
            return None;
        }
        let outcome = self.selection.tap(name, now);
        self.push_event(
            now,
            SessionEvent::Tapped {
                name: name.to_string(),
                double: outcome.is_double_tap(),
            },
        );
        if outcome.is_double_tap() {
            self.place(now);
        }
        Some(outcome)
    }

    /// Select `name` without tap timing. Unknown names are ignored.
    pub fn select(&mut self, name: &str, now: Millis) -> bool {
        if !self.is_interactive("select") {
            return false;
        }
        if !self.catalog.contains(name) {
            debug!(block = name, "Selection of unknown catalog entry ignored");
            return false;
        }
        self.selection.select(name);
        self.push_event(
            now,
            SessionEvent::Selected {
                name: name.to_string(),
            },
        );
        true
    }

    /// Place the current selection on top of the stack, returning its id.
    pub fn add_block(&mut self, now: Millis) -> Option<u32> {
        if !self.is_interactive("add_block") {
            return None;
        }
        self.place(now)
    }

    /// Remove every block and overwrite the slot with an empty list right away.
    ///
    /// Any pending debounced write is cancelled first so it cannot land after
    /// the clear. Selection is left untouched.
    pub fn clear_blocks(&mut self, now: Millis) -> usize {
        if !self.is_interactive("clear_blocks") {
            return 0;
        }
        if self.writer.cancel() {
            debug!("Cancelled pending write before clear");
        }
        let removed = self.stack.clear();
        self.write_snapshot(&[], now);
        self.push_event(now, SessionEvent::Cleared { removed });
        removed
    }

    /// Persist the pending snapshot once its quiet period has elapsed.
    pub fn tick(&mut self, now: Millis) -> bool {
        match self.writer.poll(now) {
            Some(snapshot) => {
                self.write_snapshot(&snapshot, now);
                true
            }
            None => false,
        }
    }

    /// Persist any pending snapshot immediately.
    pub fn shutdown(&mut self, now: Millis) -> bool {
        match self.writer.flush() {
            Some(snapshot) => {
                self.write_snapshot(&snapshot, now);
                true
            }
            None => false,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether interactions are accepted.
    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    /// Effective configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Installed catalog (empty while loading).
    pub fn catalog(&self) -> &BlockCatalog<G> {
        &self.catalog
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    /// The stack of placed blocks.
    pub fn stack(&self) -> &BlockStack<G> {
        &self.stack
    }

    /// Placed blocks in placement order.
    pub fn blocks(&self) -> &[PlacedBlock<G>] {
        self.stack.blocks()
    }

    /// Durable store backing this session.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Deadline of the pending debounced write, if one is waiting.
    pub fn pending_write_due(&self) -> Option<Millis> {
        self.writer.due()
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<(Millis, SessionEvent)> {
        std::mem::take(&mut self.events)
    }

    fn is_interactive(&self, action: &'static str) -> bool {
        if self.phase == SessionPhase::Ready {
            return true;
        }
        debug!(action, phase = ?self.phase, "Ignoring interaction before session is ready");
        false
    }

    fn place(&mut self, now: Millis) -> Option<u32> {
        let placed = self
            .stack
            .add_block(&self.catalog, self.selection.selected_name())?;
        let event = SessionEvent::Placed {
            id: placed.id,
            name: placed.name.clone(),
            y: placed.position.y,
        };
        let id = placed.id;
        self.push_event(now, event);
        self.writer.schedule(self.stack.snapshot(), now);
        Some(id)
    }

    fn write_snapshot(&mut self, snapshot: &[SerializedPlacement], now: Millis) {
        match save_placements(&mut self.store, &self.config.storage_key, snapshot) {
            Ok(()) => self.push_event(
                now,
                SessionEvent::Persisted {
                    blocks: snapshot.len(),
                },
            ),
            Err(err) => warn!(
                key = %self.config.storage_key,
                "Failed to persist placements: {err:#}"
            ),
        }
    }

    fn push_event(&mut self, now: Millis, event: SessionEvent) {
        self.events.push((now, event));
    }
}
