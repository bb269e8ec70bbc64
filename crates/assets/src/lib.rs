#![warn(missing_docs)]
//! Block geometry, asset manifests, and the selectable block catalog.

mod catalog;
mod geometry;
mod loader;
mod provider;

pub use catalog::{build_catalog, build_catalog_strict, part_name, BlockCatalog, CatalogEntry};
pub use geometry::{Geometry, MeshNode};
pub use loader::{default_manifest, manifest_from_file, manifest_from_str, DEFAULT_MANIFEST_JSON};
pub use provider::{AssetProvider, ManifestProvider};

use serde::Deserialize;
use thiserror::Error;

/// A named model file whose top-level children become catalog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource {
    /// Display name used as the prefix of every part name (e.g., "8x2 Block").
    pub name: String,
    /// Location of the model (e.g., "/assets/8x2.glb").
    pub path: String,
}

impl AssetSource {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Manifest describing every asset source and the bounds of its parts.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetManifest {
    /// Sources in palette order.
    pub sources: Vec<SourceDefinition>,
}

impl AssetManifest {
    /// Sources in manifest order.
    pub fn asset_sources(&self) -> Vec<AssetSource> {
        self.sources
            .iter()
            .map(|def| AssetSource::new(def.name.clone(), def.path.clone()))
            .collect()
    }
}

/// One model file in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Display name (e.g., "2x1 Angled Block").
    pub name: String,
    /// Model location.
    pub path: String,
    /// Top-level children of the model, in file order.
    #[serde(default)]
    pub parts: Vec<PartDefinition>,
}

/// Local-space bounds of a single child node.
#[derive(Debug, Clone, Deserialize)]
pub struct PartDefinition {
    /// Width, height and depth of the part; the base sits on y = 0.
    pub size: [f32; 3],
    /// Offset of the part inside its model.
    #[serde(default)]
    pub offset: [f32; 3],
}

/// Errors emitted while loading manifests or resolving sources.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading manifests.
    #[error("failed to read asset manifest: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse asset manifest: {0}")]
    Parse(#[from] serde_json::Error),
    /// The provider has nothing loaded for the requested path.
    #[error("asset source not loaded: {0}")]
    MissingSource(String),
    /// A part declared a negative or non-finite size.
    #[error("invalid part {index} in {source_name}: size must be finite and non-negative")]
    InvalidPart {
        /// Source display name.
        source_name: String,
        /// 1-based part index.
        index: usize,
    },
}
