use std::fs;
use std::path::Path;

use crate::{AssetError, AssetManifest};

/// Built-in palette used when no manifest file is available.
///
/// Sizes follow standard brick proportions (8 mm stud pitch, 9.6 mm brick height).
pub const DEFAULT_MANIFEST_JSON: &str = include_str!("../../../config/blocks.json");

/// Load an asset manifest from the provided JSON file path.
pub fn manifest_from_file(path: &Path) -> Result<AssetManifest, AssetError> {
    let data = fs::read_to_string(path)?;
    manifest_from_str(&data)
}

/// Load an asset manifest from an in-memory JSON string.
pub fn manifest_from_str(input: &str) -> Result<AssetManifest, AssetError> {
    Ok(serde_json::from_str(input)?)
}

/// Parse the built-in palette.
pub fn default_manifest() -> Result<AssetManifest, AssetError> {
    manifest_from_str(DEFAULT_MANIFEST_JSON)
}
