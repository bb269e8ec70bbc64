//! Vertical stacking of placed blocks.
//!
//! Each new block sits at `(0, h, 0)` where `h` is the sum of the measured
//! heights of every block already placed, each scaled by the stack factor.
//! A block's own height only lifts the blocks placed after it.

use blockstack_assets::{BlockCatalog, Geometry};
use glam::Vec3;
use tracing::{debug, warn};

use crate::SerializedPlacement;

/// Fraction of a block's measured height that contributes to the next offset.
pub const DEFAULT_STACK_FACTOR: f32 = 0.85;

/// Uniform scale applied to every placed block (the viewport's display scale).
pub const DEFAULT_PLACEMENT_SCALE: f32 = 5.0;

/// Tunables fixed for the lifetime of a [`BlockStack`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackParams {
    /// Multiplier on each block's bounding-box height.
    pub stack_factor: f32,
    /// Scale set on each cloned geometry before it is measured.
    pub placement_scale: f32,
}

impl Default for StackParams {
    fn default() -> Self {
        Self {
            stack_factor: DEFAULT_STACK_FACTOR,
            placement_scale: DEFAULT_PLACEMENT_SCALE,
        }
    }
}

/// A positioned instance of a catalog entry.
#[derive(Debug, Clone)]
pub struct PlacedBlock<G> {
    /// Index of the block in the stack.
    pub id: u32,
    /// Catalog entry name.
    pub name: String,
    /// Geometry cloned from the catalog; never shared with it.
    pub geometry: G,
    /// Base position of the block.
    pub position: Vec3,
}

impl<G> PlacedBlock<G> {
    /// Persisted projection of this block.
    pub fn to_serialized(&self) -> SerializedPlacement {
        SerializedPlacement {
            id: self.id,
            name: self.name.clone(),
            position: self.position.to_array(),
        }
    }
}

/// Outcome of [`BlockStack::restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Entries rehydrated into the stack.
    pub restored: usize,
    /// Entries dropped because their name is no longer in the catalog.
    pub dropped: usize,
}

/// Ordered list of placed blocks.
#[derive(Debug, Clone)]
pub struct BlockStack<G> {
    params: StackParams,
    blocks: Vec<PlacedBlock<G>>,
}

impl<G> Default for BlockStack<G> {
    fn default() -> Self {
        Self::new(StackParams::default())
    }
}

impl<G> BlockStack<G> {
    /// Empty stack using the given parameters.
    pub fn new(params: StackParams) -> Self {
        Self {
            params,
            blocks: Vec::new(),
        }
    }

    /// Parameters this stack was created with.
    pub fn params(&self) -> StackParams {
        self.params
    }

    /// Placed blocks in placement order.
    pub fn blocks(&self) -> &[PlacedBlock<G>] {
        &self.blocks
    }

    /// Number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true when nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Remove every block, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.blocks.len();
        self.blocks.clear();
        removed
    }

    /// Persisted projection of the whole stack, in order.
    pub fn snapshot(&self) -> Vec<SerializedPlacement> {
        self.blocks.iter().map(PlacedBlock::to_serialized).collect()
    }
}

impl<G: Geometry> BlockStack<G> {
    /// Vertical offset the next placed block would receive.
    pub fn top_height(&self) -> f32 {
        self.blocks.iter().fold(0.0, |height, block| {
            height + block.geometry.bounding_box().height() * self.params.stack_factor
        })
    }

    /// Place the selected catalog entry on top of the stack.
    ///
    /// Returns `None` without touching the stack when nothing is selected or the
    /// name is not in the catalog.
    pub fn add_block(
        &mut self,
        catalog: &BlockCatalog<G>,
        selected: Option<&str>,
    ) -> Option<&PlacedBlock<G>> {
        let Some(name) = selected else {
            debug!("add_block ignored: nothing selected");
            return None;
        };
        let geometry = self.instantiate(catalog, name)?;
        let height = self.top_height();
        let id = self.blocks.len() as u32;
        self.blocks.push(PlacedBlock {
            id,
            name: name.to_string(),
            geometry,
            position: Vec3::new(0.0, height, 0.0),
        });
        debug!(id, block = name, height, "Placed block");
        self.blocks.last()
    }

    /// Replace the stack with persisted entries resolved against `catalog`.
    ///
    /// Entries whose name no longer resolves are dropped. Persisted positions are
    /// kept; ids are reassigned by index so they stay contiguous.
    pub fn restore(
        &mut self,
        catalog: &BlockCatalog<G>,
        entries: Vec<SerializedPlacement>,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();
        let mut restored = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(geometry) = self.instantiate(catalog, &entry.name) else {
                warn!(
                    block = %entry.name,
                    id = entry.id,
                    "Dropping persisted block missing from catalog"
                );
                report.dropped += 1;
                continue;
            };
            restored.push(PlacedBlock {
                id: restored.len() as u32,
                name: entry.name,
                geometry,
                position: Vec3::from_array(entry.position),
            });
        }
        report.restored = restored.len();
        self.blocks = restored;
        report
    }

    fn instantiate(&self, catalog: &BlockCatalog<G>, name: &str) -> Option<G> {
        let mut geometry = catalog.instantiate(name)?;
        geometry.set_scale(self.params.placement_scale);
        Some(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockstack_assets::{CatalogEntry, MeshNode};

    fn catalog(blocks: &[(&str, f32)]) -> BlockCatalog<MeshNode> {
        BlockCatalog::new(
            blocks
                .iter()
                .map(|&(name, height)| CatalogEntry {
                    name: name.to_string(),
                    geometry: MeshNode::with_size(Vec3::new(1.0, height, 1.0)),
                })
                .collect(),
        )
    }

    fn unit_params(stack_factor: f32) -> StackParams {
        StackParams {
            stack_factor,
            placement_scale: 1.0,
        }
    }

    #[test]
    fn first_block_sits_on_origin() {
        let catalog = catalog(&[("A", 2.0)]);
        let mut stack = BlockStack::new(unit_params(0.5));
        let placed = stack.add_block(&catalog, Some("A")).expect("placed");
        assert_eq!(placed.id, 0);
        assert_eq!(placed.position, Vec3::ZERO);
        assert!(placed.position.y.is_sign_positive());
    }

    #[test]
    fn offsets_accumulate_previous_heights_only() {
        let catalog = catalog(&[("short", 1.0), ("tall", 4.0)]);
        let mut stack = BlockStack::new(unit_params(0.5));
        stack.add_block(&catalog, Some("tall"));
        stack.add_block(&catalog, Some("short"));
        stack.add_block(&catalog, Some("tall"));

        let ys: Vec<f32> = stack.blocks().iter().map(|b| b.position.y).collect();
        assert_eq!(ys, vec![0.0, 2.0, 2.5]);
        assert_eq!(stack.top_height(), 4.5);
    }

    #[test]
    fn placement_scale_applies_before_measuring() {
        let catalog = catalog(&[("A", 1.0)]);
        let mut stack = BlockStack::new(StackParams {
            stack_factor: 0.5,
            placement_scale: 4.0,
        });
        stack.add_block(&catalog, Some("A"));
        stack.add_block(&catalog, Some("A"));
        assert_eq!(stack.blocks()[1].position.y, 2.0);
        assert_eq!(stack.blocks()[1].geometry.scale(), 4.0);
        assert_eq!(catalog.entries()[0].geometry.scale(), 1.0);
    }

    #[test]
    fn add_without_selection_is_a_noop() {
        let catalog = catalog(&[("A", 1.0)]);
        let mut stack = BlockStack::new(unit_params(1.0));
        assert!(stack.add_block(&catalog, None).is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn add_unknown_name_is_a_noop() {
        let catalog = catalog(&[("A", 1.0)]);
        let mut stack = BlockStack::new(unit_params(1.0));
        stack.add_block(&catalog, Some("A"));
        assert!(stack.add_block(&catalog, Some("missing")).is_none());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn clear_empties_and_restarts_ids() {
        let catalog = catalog(&[("A", 1.0)]);
        let mut stack = BlockStack::new(unit_params(1.0));
        stack.add_block(&catalog, Some("A"));
        stack.add_block(&catalog, Some("A"));
        assert_eq!(stack.clear(), 2);
        let placed = stack.add_block(&catalog, Some("A")).expect("placed");
        assert_eq!(placed.id, 0);
        assert_eq!(placed.position.y, 0.0);
    }

    #[test]
    fn restore_drops_unknown_names_and_reindexes() {
        let catalog = catalog(&[("A", 1.0), ("B", 1.0)]);
        let mut stack = BlockStack::new(unit_params(1.0));
        let report = stack.restore(
            &catalog,
            vec![
                SerializedPlacement {
                    id: 0,
                    name: "A".into(),
                    position: [0.0, 0.0, 0.0],
                },
                SerializedPlacement {
                    id: 1,
                    name: "retired".into(),
                    position: [0.0, 1.0, 0.0],
                },
                SerializedPlacement {
                    id: 2,
                    name: "B".into(),
                    position: [0.0, 2.0, 0.0],
                },
            ],
        );
        assert_eq!(
            report,
            RestoreReport {
                restored: 2,
                dropped: 1
            }
        );
        let restored: Vec<_> = stack
            .blocks()
            .iter()
            .map(|b| (b.id, b.name.as_str(), b.position.y))
            .collect();
        assert_eq!(restored, vec![(0, "A", 0.0), (1, "B", 2.0)]);
    }

    #[test]
    fn snapshot_roundtrips_through_restore() {
        let catalog = catalog(&[("A", 1.0), ("B", 3.0)]);
        let mut stack = BlockStack::new(StackParams::default());
        for name in ["A", "B", "B", "A"] {
            stack.add_block(&catalog, Some(name));
        }
        let snapshot = stack.snapshot();

        let mut reloaded = BlockStack::new(StackParams::default());
        reloaded.restore(&catalog, snapshot.clone());
        assert_eq!(reloaded.snapshot(), snapshot);
        assert_eq!(reloaded.top_height(), stack.top_height());
    }
}
