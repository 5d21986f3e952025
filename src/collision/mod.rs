pub mod aabb;
pub mod detection;
mod geometry;
pub mod manifold;
pub mod raycast;
mod sat;
pub mod spatial_grid;

// Re-export key types
pub use aabb::AABB;
pub use detection::collide;
pub use manifold::{BodyPair, Contact, ContactId, ContactPoint, ContactSet, Manifold, MAX_CONTACTS, SPECULATIVE_DISTANCE};
pub use raycast::{raycast_shape, RayIntersection};
pub use spatial_grid::SpatialHashGrid;
