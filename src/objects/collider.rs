use crate::collision::AABB;
use crate::error::{PhysicsError, Result};
use crate::math::{Transform, Vec2};
use crate::shapes::{Shape, ShapeKind, WorldShape};

/// Number of collision layers.
pub const LAYER_COUNT: usize = 32;

/// A collision layer index in `0..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Layer(u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);

    pub fn new(index: u8) -> Result<Self> {
        if index as usize >= LAYER_COUNT {
            return Err(PhysicsError::InvalidLayer(index));
        }
        Ok(Layer(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Single-bit mask of this layer.
    pub fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Symmetric 32×32 table of which layers collide with which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; LAYER_COUNT],
}

impl LayerMatrix {
    /// Every layer collides with every other.
    pub fn all() -> Self {
        Self { rows: [u32::MAX; LAYER_COUNT] }
    }

    /// No layer collides with anything.
    pub fn none() -> Self {
        Self { rows: [0; LAYER_COUNT] }
    }

    /// Enables or disables collisions between `a` and `b`, in both directions.
    pub fn set_collides(&mut self, a: Layer, b: Layer, collides: bool) {
        if collides {
            self.rows[a.0 as usize] |= b.mask();
            self.rows[b.0 as usize] |= a.mask();
        } else {
            self.rows[a.0 as usize] &= !b.mask();
            self.rows[b.0 as usize] &= !a.mask();
        }
    }

    pub fn collides(&self, a: Layer, b: Layer) -> bool {
        self.rows[a.0 as usize] & b.mask() != 0
    }
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self::all()
    }
}

/// Owns a body's shape together with its trigger flag, its layer, and the
/// world-space geometry cached from the owning body's transform.
///
/// A collider starts detached: it has no world geometry until [`Collider::refresh`]
/// binds it to a transform. Removing a body from a world detaches it again.
#[derive(Debug, Clone)]
pub struct Collider {
    shape: Shape,
    is_trigger: bool,
    layer: Layer,
    world_shape: Option<WorldShape>,
    aabb: AABB,
    dirty: bool,
}

impl Collider {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            is_trigger: false,
            layer: Layer::DEFAULT,
            world_shape: None,
            aabb: AABB::new(Vec2::ZERO, Vec2::ZERO),
            dirty: true,
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    pub fn set_trigger(&mut self, is_trigger: bool) {
        self.is_trigger = is_trigger;
    }

    pub fn is_attached(&self) -> bool {
        self.world_shape.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds the cached world geometry and bounds if they are stale.
    /// Returns whether anything was recomputed.
    pub fn refresh(&mut self, transform: &Transform) -> bool {
        if !self.dirty && self.world_shape.is_some() {
            return false;
        }
        let world_shape = self.shape.to_world(transform);
        self.aabb = world_shape.aabb();
        self.world_shape = Some(world_shape);
        self.dirty = false;
        true
    }

    /// Drops the cached world geometry.
    pub fn detach(&mut self) {
        self.world_shape = None;
        self.dirty = true;
    }

    /// World geometry, or `None` while detached.
    pub fn world_shape(&self) -> Option<&WorldShape> {
        self.world_shape.as_ref()
    }

    /// World bounds as of the last refresh.
    pub fn aabb(&self) -> AABB {
        self.aabb
    }
}
