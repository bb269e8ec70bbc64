use std::fmt::Write;

use blockstack_assets::Geometry;
use blockstack_world::PlacedBlock;

use crate::{DisplayTransform, RenderSurface};

/// Headless surface that renders the stack as one line per block.
#[derive(Debug, Default)]
pub struct TextSurface {
    transform: DisplayTransform,
    frame: String,
    frames_drawn: u64,
}

impl TextSurface {
    /// Surface using `transform` for display positions.
    pub fn new(transform: DisplayTransform) -> Self {
        Self {
            transform,
            frame: String::new(),
            frames_drawn: 0,
        }
    }

    /// Text of the most recent frame.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Number of frames drawn so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }
}

impl<G: Geometry> RenderSurface<G> for TextSurface {
    fn draw(&mut self, blocks: &[PlacedBlock<G>]) {
        self.frame.clear();
        if blocks.is_empty() {
            self.frame.push_str("(empty stack)\n");
        }
        for block in blocks {
            let shown = self.transform.apply(block.position);
            let height = block.geometry.bounding_box().height();
            // Writing to a String cannot fail.
            let _ = writeln!(
                self.frame,
                "#{:<3} {:<28} at ({:.4}, {:.4}, {:.4}) height {:.4}",
                block.id, block.name, shown.x, shown.y, shown.z, height
            );
        }
        self.frames_drawn += 1;
        tracing::trace!(
            blocks = blocks.len(),
            frame = self.frames_drawn,
            "Drew text frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockstack_assets::MeshNode;
    use glam::Vec3;

    fn block(id: u32, name: &str, y: f32) -> PlacedBlock<MeshNode> {
        PlacedBlock {
            id,
            name: name.to_string(),
            geometry: MeshNode::with_size(Vec3::new(1.0, 0.5, 1.0)),
            position: Vec3::new(0.0, y, 0.0),
        }
    }

    #[test]
    fn draws_one_line_per_block() {
        let mut surface = TextSurface::default();
        let blocks = [block(0, "A - Part 1", 0.0), block(1, "B - Part 1", 0.425)];
        surface.draw(&blocks);
        let lines: Vec<_> = surface.frame().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#0"));
        assert!(lines[1].contains("B - Part 1"));
        assert!(lines[1].contains("(0.0000, 0.4250, 0.0000)"));
        assert_eq!(surface.frames_drawn(), 1);
    }

    #[test]
    fn empty_stack_has_placeholder_line() {
        let mut surface = TextSurface::default();
        RenderSurface::<MeshNode>::draw(&mut surface, &[]);
        assert_eq!(surface.frame(), "(empty stack)\n");
    }
}
