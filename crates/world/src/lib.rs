#![warn(missing_docs)]
//! Stack placement engine and its persistence adapter.

mod debounce;
mod persist;
mod stack;
mod store;

pub use debounce::{DebouncedWriter, DEFAULT_DEBOUNCE_MS};
pub use persist::{
    decode_placements, encode_placements, load_placements, save_placements, SerializedPlacement,
    DEFAULT_STORAGE_KEY,
};
pub use stack::{
    BlockStack, PlacedBlock, RestoreReport, StackParams, DEFAULT_PLACEMENT_SCALE,
    DEFAULT_STACK_FACTOR,
};
pub use store::{FileStore, KvStore, MemoryStore};
