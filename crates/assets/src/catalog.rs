//! Flat, stable-ordered catalog of selectable block variants.
//!
//! Every top-level child of every asset source becomes one entry named
//! `"<source> - Part <n>"` (1-based). Entries keep source order, then child
//! order within a source.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{AssetError, AssetProvider, AssetSource, Geometry};

/// One selectable block variant and its reference geometry.
#[derive(Debug, Clone)]
pub struct CatalogEntry<G> {
    /// Unique display name (e.g., "4x2 Block - Part 1").
    pub name: String,
    /// Reference geometry; callers clone it rather than mutating it.
    pub geometry: G,
}

/// Catalog entries plus a name index.
#[derive(Debug, Clone)]
pub struct BlockCatalog<G> {
    entries: Vec<CatalogEntry<G>>,
    name_to_index: HashMap<String, usize>,
}

impl<G> Default for BlockCatalog<G> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            name_to_index: HashMap::new(),
        }
    }
}

impl<G: Geometry> BlockCatalog<G> {
    /// Construct a catalog from the supplied entries.
    ///
    /// On duplicate names the later entry wins every name lookup.
    pub fn new(entries: Vec<CatalogEntry<G>>) -> Self {
        let mut name_to_index = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if let Some(previous) = name_to_index.insert(entry.name.clone(), idx) {
                warn!(
                    block = %entry.name,
                    previous,
                    shadowed_by = idx,
                    "Duplicate catalog name; later entry shadows earlier one"
                );
            }
        }
        Self {
            entries,
            name_to_index,
        }
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry<G>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the catalog has no entries (e.g., assets still loading).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry<G>> {
        self.name_to_index
            .get(name)
            .and_then(|&idx| self.entries.get(idx))
    }

    /// Whether `name` resolves to an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Fresh, independent clone of the named entry's geometry.
    pub fn instantiate(&self, name: &str) -> Option<G> {
        let found = self.get(name).map(|entry| entry.geometry.clone());
        if found.is_none() {
            debug!(block = name, "Catalog lookup failed");
        }
        found
    }

    /// Entry names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

/// Display name of the `index`-th (1-based) child of `source`.
pub fn part_name(source: &str, index: usize) -> String {
    format!("{source} - Part {index}")
}

fn entries_for_source<P: AssetProvider>(
    provider: &P,
    source: &AssetSource,
) -> Result<Vec<CatalogEntry<P::Node>>, AssetError> {
    let children = provider.list_children(source)?;
    Ok(children
        .iter()
        .enumerate()
        .map(|(idx, child)| CatalogEntry {
            name: part_name(&source.name, idx + 1),
            geometry: child.clone(),
        })
        .collect())
}

/// Build the catalog, logging and skipping sources that fail to resolve.
pub fn build_catalog<P: AssetProvider>(
    provider: &P,
    sources: &[AssetSource],
) -> BlockCatalog<P::Node> {
    let mut entries = Vec::new();
    for source in sources {
        match entries_for_source(provider, source) {
            Ok(mut parts) => entries.append(&mut parts),
            Err(err) => warn!(
                source = %source.name,
                path = %source.path,
                %err,
                "Skipping asset source"
            ),
        }
    }
    BlockCatalog::new(entries)
}

/// Build the catalog, returning the first source failure to the caller.
pub fn build_catalog_strict<P: AssetProvider>(
    provider: &P,
    sources: &[AssetSource],
) -> Result<BlockCatalog<P::Node>, AssetError> {
    let mut entries = Vec::new();
    for source in sources {
        entries.extend(entries_for_source(provider, source)?);
    }
    Ok(BlockCatalog::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MeshNode;
    use glam::Vec3;

    struct FixedProvider {
        models: Vec<(String, Vec<MeshNode>)>,
    }

    impl FixedProvider {
        fn new(models: &[(&str, &[f32])]) -> Self {
            Self {
                models: models
                    .iter()
                    .map(|(path, heights)| {
                        let nodes = heights
                            .iter()
                            .map(|&h| MeshNode::with_size(Vec3::new(1.0, h, 1.0)))
                            .collect();
                        (path.to_string(), nodes)
                    })
                    .collect(),
            }
        }
    }

    impl AssetProvider for FixedProvider {
        type Node = MeshNode;

        fn list_children(&self, source: &AssetSource) -> Result<&[MeshNode], AssetError> {
            self.models
                .iter()
                .find(|(path, _)| *path == source.path)
                .map(|(_, nodes)| nodes.as_slice())
                .ok_or_else(|| AssetError::MissingSource(source.path.clone()))
        }
    }

    #[test]
    fn names_parts_in_source_then_child_order() {
        let provider = FixedProvider::new(&[("a.glb", &[1.0, 2.0]), ("b.glb", &[3.0])]);
        let catalog = build_catalog(
            &provider,
            &[
                AssetSource::new("8x2 Block", "a.glb"),
                AssetSource::new("2x2 Block", "b.glb"),
            ],
        );
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            vec![
                "8x2 Block - Part 1",
                "8x2 Block - Part 2",
                "2x2 Block - Part 1",
            ]
        );
        assert_eq!(
            catalog
                .get("8x2 Block - Part 2")
                .map(|e| e.geometry.bounding_box().height()),
            Some(2.0)
        );
    }

    #[test]
    fn catalog_geometry_is_independent_of_provider_cache() {
        let provider = FixedProvider::new(&[("a.glb", &[1.0])]);
        let catalog = build_catalog(&provider, &[AssetSource::new("A", "a.glb")]);
        let mut placed = catalog.instantiate("A - Part 1").expect("entry exists");
        placed.set_scale(10.0);

        assert_eq!(placed.bounding_box().height(), 10.0);
        assert_eq!(catalog.entries()[0].geometry.scale(), 1.0);
        assert_eq!(provider.models[0].1[0].scale(), 1.0);
    }

    #[test]
    fn lenient_build_skips_missing_sources() {
        let provider = FixedProvider::new(&[("b.glb", &[1.0])]);
        let sources = [
            AssetSource::new("A", "a.glb"),
            AssetSource::new("B", "b.glb"),
        ];
        let catalog = build_catalog(&provider, &sources);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["B - Part 1"]);

        let err = build_catalog_strict(&provider, &sources).unwrap_err();
        assert!(matches!(err, AssetError::MissingSource(path) if path == "a.glb"));
    }

    #[test]
    fn duplicate_names_resolve_to_last_entry() {
        let provider = FixedProvider::new(&[("a.glb", &[1.0]), ("b.glb", &[4.0])]);
        let catalog = build_catalog(
            &provider,
            &[
                AssetSource::new("Same", "a.glb"),
                AssetSource::new("Same", "b.glb"),
            ],
        );
        assert_eq!(catalog.len(), 2);
        let resolved = catalog.instantiate("Same - Part 1").expect("name resolves");
        assert_eq!(resolved.bounding_box().height(), 4.0);
    }

    #[test]
    fn empty_catalog_fails_lookups_gracefully() {
        let catalog: BlockCatalog<MeshNode> = BlockCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.instantiate("8x2 Block - Part 1").is_none());
        assert!(!catalog.contains("8x2 Block - Part 1"));
    }
}
