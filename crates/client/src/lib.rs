#![warn(missing_docs)]
//! Session façade: the single owner of catalog, selection, stack and
//! persistence state.

mod config;
mod event;
mod session;

pub use config::SessionConfig;
pub use event::SessionEvent;
pub use session::{Session, SessionPhase};
