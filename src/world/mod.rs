pub mod config;
pub mod events;
pub mod physics_world;

pub use crate::objects::BodyHandle;
pub use config::{BroadphaseMode, WorldConfig, DEFAULT_GRAVITY};
pub use events::CollisionEvents;
pub use physics_world::{PhysicsWorld, RaycastHit};
