#![warn(missing_docs)]
//! Rendering surface boundary and display-only transforms.
//!
//! Surfaces receive the placed blocks as-is. Geometry already carries the
//! placement scale, so surfaces must not scale it again. Any environment
//! shift (e.g. moving the stack in front of an AR viewer) is applied here and
//! never written back into block positions.

mod text;

pub use text::TextSurface;

use blockstack_world::PlacedBlock;
use glam::Vec3;

/// Anything that can draw the current stack.
pub trait RenderSurface<G> {
    /// Draw `blocks` in placement order.
    fn draw(&mut self, blocks: &[PlacedBlock<G>]);
}

/// Where the stack is being shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Orbiting 3D viewport around the origin.
    #[default]
    Orbit,
    /// Immersive camera view anchored in the environment.
    Immersive,
}

/// Maps engine positions to display positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    /// Active display mode.
    pub mode: DisplayMode,
    /// Offset added to every block in immersive mode.
    pub depth_offset: Vec3,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Orbit,
            depth_offset: Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl DisplayTransform {
    /// Display position of a block placed at `position`.
    pub fn apply(&self, position: Vec3) -> Vec3 {
        match self.mode {
            DisplayMode::Orbit => position,
            DisplayMode::Immersive => position + self.depth_offset,
        }
    }
}
