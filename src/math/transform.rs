use std::cell::Cell;

use super::matrix::Mat2D;
use super::vec2::Vec2;

/// Local position / rotation / scale, optionally composed with a parent's world matrix.
///
/// Rotation is stored in degrees. The world matrix is computed lazily and cached;
/// every mutation invalidates the cache and raises a dirty flag that dependents
/// (collider bounds, cached world vertices) consume with [`Transform::take_dirty`].
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec2,
    rotation: f64,
    scale: Vec2,
    parent: Option<Mat2D>,
    world: Cell<Option<Mat2D>>,
    dirty: bool,
}

impl Transform {
    /// Creates a new transform with unit scale. `rotation` is in degrees.
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self {
            position,
            rotation,
            scale: Vec2::ONE,
            parent: None,
            world: Cell::new(None),
            dirty: true,
        }
    }

    /// Creates an identity transform (no translation, no rotation, unit scale).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Local rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
        self.invalidate();
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.invalidate();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    pub fn rotate(&mut self, delta_degrees: f64) {
        self.set_rotation(self.rotation + delta_degrees);
    }

    /// Attaches this transform under `parent` (snapshotting its current world matrix),
    /// or detaches it with `None`.
    pub fn set_parent(&mut self, parent: Option<&Transform>) {
        self.parent = parent.map(Transform::world_matrix);
        self.invalidate();
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn local_matrix(&self) -> Mat2D {
        Mat2D::from_trs(self.position, self.rotation.to_radians(), self.scale)
    }

    pub fn world_matrix(&self) -> Mat2D {
        if let Some(m) = self.world.get() {
            return m;
        }
        let local = self.local_matrix();
        let world = match self.parent {
            Some(parent) => parent * local,
            None => local,
        };
        self.world.set(Some(world));
        world
    }

    pub fn world_position(&self) -> Vec2 {
        self.world_matrix().translation()
    }

    /// World rotation in degrees.
    pub fn world_rotation(&self) -> f64 {
        match self.parent {
            Some(parent) => parent.rotation().to_degrees() + self.rotation,
            None => self.rotation,
        }
    }

    pub fn world_scale(&self) -> Vec2 {
        match self.parent {
            Some(parent) => {
                let ps = parent.scale();
                Vec2::new(ps.x * self.scale.x, ps.y * self.scale.y)
            }
            None => self.scale,
        }
    }

    /// Moves the transform so its world position becomes `position`.
    pub fn set_world_position(&mut self, position: Vec2) {
        let local = match self.parent.and_then(|p| p.inverse()) {
            Some(inv) => inv.transform_point(position),
            None => position,
        };
        self.set_position(local);
    }

    /// Rotates the transform so its world rotation becomes `degrees`.
    pub fn set_world_rotation(&mut self, degrees: f64) {
        let parent_rotation = self.parent.map_or(0.0, |p| p.rotation().to_degrees());
        self.set_rotation(degrees - parent_rotation);
    }

    /// Maps a point from local space to world space.
    pub fn local_to_world(&self, point: Vec2) -> Vec2 {
        self.world_matrix().transform_point(point)
    }

    /// Maps a direction from local space to world space (no translation).
    pub fn local_to_world_vector(&self, vector: Vec2) -> Vec2 {
        self.world_matrix().transform_vector(vector)
    }

    /// Maps a point from world space into local space.
    /// Returns `None` when the world matrix is singular (a zero scale axis).
    pub fn world_to_local(&self, point: Vec2) -> Option<Vec2> {
        self.world_matrix().inverse().map(|inv| inv.transform_point(point))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the transform changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn invalidate(&mut self) {
        self.world.set(None);
        self.dirty = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.rotation == other.rotation
            && self.scale == other.scale
            && self.parent == other.parent
    }
}
