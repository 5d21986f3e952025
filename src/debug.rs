//! Renderer-agnostic debug visualisation.
//!
//! The world describes what to draw through the [`DebugDraw`] trait; the
//! caller decides how to put it on screen.

use crate::math::Vec2;

/// RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DebugColor {
    pub const STATIC_BODY: DebugColor = DebugColor::new(0.5, 0.5, 0.5, 1.0);
    pub const DYNAMIC_BODY: DebugColor = DebugColor::new(0.2, 0.8, 0.3, 1.0);
    pub const TRIGGER: DebugColor = DebugColor::new(0.9, 0.8, 0.1, 0.6);
    pub const AABB: DebugColor = DebugColor::new(0.3, 0.5, 0.9, 0.8);
    pub const CELL: DebugColor = DebugColor::new(0.6, 0.6, 0.6, 0.25);
    pub const CONTACT: DebugColor = DebugColor::new(0.9, 0.2, 0.2, 1.0);
    pub const NORMAL: DebugColor = DebugColor::new(1.0, 0.5, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Selects which layers of debug geometry [`PhysicsWorld::debug_draw`](crate::PhysicsWorld::debug_draw) emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugDrawFlags {
    pub shapes: bool,
    pub aabbs: bool,
    pub broadphase_cells: bool,
    pub contacts: bool,
}

impl DebugDrawFlags {
    pub const ALL: DebugDrawFlags = DebugDrawFlags { shapes: true, aabbs: true, broadphase_cells: true, contacts: true };
    pub const NONE: DebugDrawFlags =
        DebugDrawFlags { shapes: false, aabbs: false, broadphase_cells: false, contacts: false };
}

impl Default for DebugDrawFlags {
    /// Shapes and contacts only.
    fn default() -> Self {
        Self { shapes: true, aabbs: false, broadphase_cells: false, contacts: true }
    }
}

/// Primitive draw calls issued by the world. All coordinates are in world space.
pub trait DebugDraw {
    /// Oriented rectangle; `rotation` is in degrees.
    fn draw_box(&mut self, center: Vec2, half_extents: Vec2, rotation: f64, color: DebugColor);
    fn draw_circle(&mut self, center: Vec2, radius: f64, color: DebugColor);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: DebugColor);
    /// Capsule whose core segment runs from `a` to `b`.
    fn draw_capsule(&mut self, a: Vec2, b: Vec2, radius: f64, color: DebugColor);
    /// Closed polygon outline.
    fn draw_polygon(&mut self, vertices: &[Vec2], color: DebugColor);
}
