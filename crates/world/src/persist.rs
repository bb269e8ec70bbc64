//! Serialized form of the stack and its mapping onto a key-value slot.
//!
//! Only `(id, name, position)` is written; geometry is rebuilt on load by
//! resolving `name` against the current catalog. The slot holds a JSON array.
//! Anything that is not an array reads as "nothing saved", and array elements
//! that do not decode are skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::KvStore;

/// Slot the stack is mirrored into.
pub const DEFAULT_STORAGE_KEY: &str = "placed-blocks";

/// Geometry-free projection of a placed block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPlacement {
    /// Index of the block when it was saved.
    pub id: u32,
    /// Catalog entry name.
    pub name: String,
    /// Base position `[x, y, z]`.
    pub position: [f32; 3],
}

/// Encode placements as a JSON array.
pub fn encode_placements(placements: &[SerializedPlacement]) -> Result<Vec<u8>> {
    serde_json::to_vec(placements).context("Failed to serialize placements")
}

/// Decode a JSON array of placements.
///
/// Returns `None` when the payload is not a JSON array.
pub fn decode_placements(bytes: &[u8]) -> Option<Vec<SerializedPlacement>> {
    let items = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(
                kind = value_kind(&other),
                "Persisted placements are not a list"
            );
            return None;
        }
        Err(err) => {
            warn!(%err, "Persisted placements are not valid JSON");
            return None;
        }
    };

    let mut placements = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<SerializedPlacement>(item) {
            Ok(placement) => placements.push(placement),
            Err(err) => warn!(index = idx, %err, "Skipping malformed persisted placement"),
        }
    }
    Some(placements)
}

/// Read the persisted placements under `key`.
///
/// A missing slot, an unreadable slot, or a malformed value all yield an empty
/// list.
pub fn load_placements<S: KvStore + ?Sized>(store: &S, key: &str) -> Vec<SerializedPlacement> {
    match store.get(key) {
        Ok(Some(bytes)) => decode_placements(&bytes).unwrap_or_default(),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!(key, "Failed to read persisted placements: {err:#}");
            Vec::new()
        }
    }
}

/// Write `placements` to `key`, replacing whatever was there.
pub fn save_placements<S: KvStore + ?Sized>(
    store: &mut S,
    key: &str,
    placements: &[SerializedPlacement],
) -> Result<()> {
    let bytes = encode_placements(placements)?;
    store
        .set(key, &bytes)
        .with_context(|| format!("Failed to write persisted placements to {key}"))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
