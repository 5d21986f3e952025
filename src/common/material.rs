//! Defines physical material properties.

use crate::error::{PhysicsError, Result};

/// Represents the physical properties of a rigid body affecting mass and collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Mass per unit area. Must be positive.
    pub density: f64,
    /// Coefficient of friction. Range [0, infinity).
    pub friction: f64,
    /// Coefficient of restitution (bounciness). Range [0, 1].
    /// 0 = perfectly inelastic (no bounce), 1 = perfectly elastic.
    pub restitution: f64,
    /// Linear velocity damping per second. Non-negative.
    pub linear_damping: f64,
    /// Angular velocity damping per second. Non-negative.
    pub angular_damping: f64,
}

impl Material {
    /// Creates a material without damping, rejecting out-of-range values.
    pub fn new(density: f64, friction: f64, restitution: f64) -> Result<Self> {
        Self::with_damping(density, friction, restitution, 0.0, 0.0)
    }

    pub fn with_damping(
        density: f64,
        friction: f64,
        restitution: f64,
        linear_damping: f64,
        angular_damping: f64,
    ) -> Result<Self> {
        if !(density > 0.0) || !density.is_finite() {
            return Err(PhysicsError::InvalidMaterial(format!("density must be positive, got {density}")));
        }
        if !(friction >= 0.0) || !friction.is_finite() {
            return Err(PhysicsError::InvalidMaterial(format!("friction must be non-negative, got {friction}")));
        }
        if !(0.0..=1.0).contains(&restitution) {
            return Err(PhysicsError::InvalidMaterial(format!(
                "restitution must lie in [0, 1], got {restitution}"
            )));
        }
        for (name, value) in [("linear damping", linear_damping), ("angular damping", angular_damping)] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(PhysicsError::InvalidMaterial(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(Material { density, friction, restitution, linear_damping, angular_damping })
    }
}

impl Default for Material {
    /// Unit density, moderate friction, a little bounce, no damping.
    fn default() -> Self {
        Material {
            density: 1.0,
            friction: 0.5,
            restitution: 0.2,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }
}
