//! 2D rigid-body physics: a spatial-hash broad-phase, SAT and clipping
//! narrow-phase, and a warm-started sequential impulse contact solver.

pub mod collision;
pub mod common;
pub mod constraints;
pub mod debug;
pub mod error;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use collision::{BodyPair, Manifold, AABB};
pub use common::Material;
pub use debug::{DebugColor, DebugDraw, DebugDrawFlags};
pub use error::{PhysicsError, Result};
pub use math::{Ray, Transform, Vec2};
pub use objects::{BodyHandle, Collider, Layer, LayerMatrix, RigidBody};
pub use shapes::{BoxShape, Capsule, Circle, Polygon, Shape};
pub use world::{BroadphaseMode, CollisionEvents, PhysicsWorld, RaycastHit, WorldConfig};
