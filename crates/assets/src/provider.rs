use std::collections::HashMap;

use glam::Vec3;

use crate::{AssetError, AssetManifest, AssetSource, Geometry, MeshNode};

/// Resolves an asset source to its loaded top-level child nodes.
///
/// The returned slice is the provider's own cache; callers clone what they keep.
pub trait AssetProvider {
    /// Geometry node type produced by this provider.
    type Node: Geometry;

    /// Ordered children of the source's scene root.
    fn list_children(&self, source: &AssetSource) -> Result<&[Self::Node], AssetError>;
}

/// Provider backed by the part bounds declared in an [`AssetManifest`].
#[derive(Debug, Default)]
pub struct ManifestProvider {
    loaded: HashMap<String, Vec<MeshNode>>,
}

impl ManifestProvider {
    /// Build nodes for every source in the manifest, keyed by path.
    pub fn new(manifest: &AssetManifest) -> Result<Self, AssetError> {
        let mut loaded = HashMap::with_capacity(manifest.sources.len());
        for source in &manifest.sources {
            let mut nodes = Vec::with_capacity(source.parts.len());
            for (idx, part) in source.parts.iter().enumerate() {
                let size = Vec3::from_array(part.size);
                if !size.is_finite() || size.min_element() < 0.0 {
                    return Err(AssetError::InvalidPart {
                        source_name: source.name.clone(),
                        index: idx + 1,
                    });
                }
                nodes.push(
                    MeshNode::with_size(size).with_translation(Vec3::from_array(part.offset)),
                );
            }
            loaded.insert(source.path.clone(), nodes);
        }
        Ok(Self { loaded })
    }

    /// Number of loaded model files.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Returns true when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl AssetProvider for ManifestProvider {
    type Node = MeshNode;

    fn list_children(&self, source: &AssetSource) -> Result<&[MeshNode], AssetError> {
        self.loaded
            .get(&source.path)
            .map(Vec::as_slice)
            .ok_or_else(|| AssetError::MissingSource(source.path.clone()))
    }
}
