pub mod collider;
pub mod rigid_body;

pub use collider::{Collider, Layer, LayerMatrix, LAYER_COUNT};
pub use rigid_body::{BodyHandle, RigidBody};
