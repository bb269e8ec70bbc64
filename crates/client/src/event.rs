use std::fmt;

/// Something observable that happened inside a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Persisted placements were rehydrated.
    Restored {
        /// Entries rebuilt.
        restored: usize,
        /// Entries dropped because their name left the catalog.
        dropped: usize,
    },
    /// A catalog entry was tapped.
    Tapped {
        /// Entry name.
        name: String,
        /// Whether the tap completed a double-tap.
        double: bool,
    },
    /// The selection was set directly.
    Selected {
        /// Entry name.
        name: String,
    },
    /// A block was added to the stack.
    Placed {
        /// Id of the new block.
        id: u32,
        /// Entry name.
        name: String,
        /// Vertical offset of the new block.
        y: f32,
    },
    /// The stack was cleared and the slot overwritten.
    Cleared {
        /// Number of blocks removed.
        removed: usize,
    },
    /// The stack was written to the durable slot.
    Persisted {
        /// Number of blocks written.
        blocks: usize,
    },
}

impl SessionEvent {
    /// Short machine-friendly label.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Restored { .. } => "restored",
            SessionEvent::Tapped { .. } => "tapped",
            SessionEvent::Selected { .. } => "selected",
            SessionEvent::Placed { .. } => "placed",
            SessionEvent::Cleared { .. } => "cleared",
            SessionEvent::Persisted { .. } => "persisted",
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Restored { restored, dropped } => {
                write!(f, "restored {restored} blocks ({dropped} dropped)")
            }
            SessionEvent::Tapped { name, double } => {
                if *double {
                    write!(f, "double-tapped {name}")
                } else {
                    write!(f, "tapped {name}")
                }
            }
            SessionEvent::Selected { name } => write!(f, "selected {name}"),
            SessionEvent::Placed { id, name, y } => write!(f, "placed #{id} {name} at y={y}"),
            SessionEvent::Cleared { removed } => write!(f, "cleared {removed} blocks"),
            SessionEvent::Persisted { blocks } => write!(f, "persisted {blocks} blocks"),
        }
    }
}
