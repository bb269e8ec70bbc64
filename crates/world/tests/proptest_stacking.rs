//! Property tests for vertical stacking.
//!
//! Critical properties:
//! - n valid adds yield n blocks with ids 0..n-1 in order
//! - y offsets never decrease for non-negative heights
//! - each offset equals the scaled sum of the heights below it
//! - restoring a snapshot reproduces the same (id, name, position) triples

use blockstack_assets::{BlockCatalog, CatalogEntry, MeshNode};
use blockstack_world::{BlockStack, StackParams};
use glam::Vec3;
use proptest::prelude::*;

fn catalog(heights: &[f32]) -> BlockCatalog<MeshNode> {
    BlockCatalog::new(
        heights
            .iter()
            .enumerate()
            .map(|(idx, &h)| CatalogEntry {
                name: format!("Block {idx} - Part 1"),
                geometry: MeshNode::with_size(Vec3::new(1.0, h, 1.0)),
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn stacking_is_monotonic_and_contiguous(
        heights in prop::collection::vec(0.0f32..10.0, 1..6),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40),
        stack_factor in 0.0f32..1.5,
        placement_scale in 0.1f32..10.0,
    ) {
        let catalog = catalog(&heights);
        let mut stack = BlockStack::new(StackParams { stack_factor, placement_scale });

        for pick in &picks {
            let name = format!("Block {} - Part 1", pick.index(heights.len()));
            prop_assert!(stack.add_block(&catalog, Some(&name)).is_some());
        }

        prop_assert_eq!(stack.len(), picks.len());
        let mut previous_y = 0.0f32;
        for (idx, block) in stack.blocks().iter().enumerate() {
            prop_assert_eq!(block.id as usize, idx);
            prop_assert_eq!(block.position.x, 0.0);
            prop_assert_eq!(block.position.z, 0.0);
            prop_assert!(block.position.y >= previous_y);
            previous_y = block.position.y;
        }
    }

    #[test]
    fn offsets_match_scaled_height_sum(
        heights in prop::collection::vec(0.0f32..5.0, 1..20),
    ) {
        let catalog = catalog(&heights);
        let params = StackParams { stack_factor: 0.85, placement_scale: 5.0 };
        let mut stack = BlockStack::new(params);
        for idx in 0..heights.len() {
            stack.add_block(&catalog, Some(&format!("Block {idx} - Part 1")));
        }

        let mut expected = 0.0f32;
        for (block, &h) in stack.blocks().iter().zip(&heights) {
            prop_assert!((block.position.y - expected).abs() <= 1e-3 * (1.0 + expected));
            expected += h * params.placement_scale * params.stack_factor;
        }
    }

    #[test]
    fn snapshot_restore_roundtrip(
        heights in prop::collection::vec(0.0f32..5.0, 1..5),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..20),
    ) {
        let catalog = catalog(&heights);
        let mut stack = BlockStack::new(StackParams::default());
        for pick in &picks {
            let name = format!("Block {} - Part 1", pick.index(heights.len()));
            stack.add_block(&catalog, Some(&name));
        }

        let snapshot = stack.snapshot();
        let mut reloaded = BlockStack::new(StackParams::default());
        let report = reloaded.restore(&catalog, snapshot.clone());

        prop_assert_eq!(report.dropped, 0);
        prop_assert_eq!(reloaded.snapshot(), snapshot);
    }
}
