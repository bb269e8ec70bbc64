use blockstack_core::Aabb;
use glam::Vec3;

/// Renderable geometry handle as seen by the catalog and the stacking engine.
///
/// `Clone` must produce an independent node: scaling a clone never affects the
/// node it was cloned from.
pub trait Geometry: Clone {
    /// Bounds after the node's own scale and translation are applied.
    fn bounding_box(&self) -> Aabb;

    /// Set the node's uniform scale.
    fn set_scale(&mut self, scale: f32);
}

/// Headless geometry node: local bounds plus a uniform scale and offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    local: Aabb,
    scale: f32,
    translation: Vec3,
}

impl MeshNode {
    /// Node with the given local bounds, unit scale and no offset.
    pub fn new(local: Aabb) -> Self {
        Self {
            local,
            scale: 1.0,
            translation: Vec3::ZERO,
        }
    }

    /// Node whose base is centered on the origin.
    pub fn with_size(size: Vec3) -> Self {
        Self::new(Aabb::from_base_size(size))
    }

    /// Set the node's offset inside its parent model.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Untransformed bounds.
    pub fn local_bounds(&self) -> Aabb {
        self.local
    }
}

impl Geometry for MeshNode {
    fn bounding_box(&self) -> Aabb {
        self.local.scaled(self.scale).translated(self.translation)
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}
