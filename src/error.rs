//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::world::BodyHandle;

/// Errors raised by shape/body construction, the broad-phase and the world.
///
/// "No collision" and numerical degeneracy are never errors: they are reported
/// through empty contact sets, zero inertia or `None` raycast results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("collision layer {0} is out of range (expected 0..=31)")]
    InvalidLayer(u8),

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("dynamic body has no mass (shape area {area}, density {density})")]
    DegenerateMass { area: f64, density: f64 },

    #[error("broad-phase cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    #[error("time step must be finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("body {0:?} does not belong to this world")]
    UnknownBody(BodyHandle),

    #[error("body {0:?} is not tracked by the broad-phase")]
    UntrackedBody(BodyHandle),

    #[error("body {0:?} is already tracked by the broad-phase")]
    AlreadyTracked(BodyHandle),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
