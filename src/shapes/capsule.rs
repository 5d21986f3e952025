use std::f64::consts::PI;

use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

/// A line segment swept by a circle.
///
/// The core segment runs along the local Y axis, from `(0, -length/2)` to
/// `(0, length/2)`; the total height is `length + 2 * radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub length: f64,
    pub radius: f64,
}

impl Capsule {
    pub fn new(length: f64, radius: f64) -> Result<Self> {
        if !(length > 0.0) || !length.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "capsule length must be positive and finite, got {length} (use a circle instead)"
            )));
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "capsule radius must be positive and finite, got {radius}"
            )));
        }
        Ok(Self { length, radius })
    }

    /// Bottom end of the core segment.
    pub fn a(&self) -> Vec2 {
        Vec2::new(0.0, -self.length * 0.5)
    }

    /// Top end of the core segment.
    pub fn b(&self) -> Vec2 {
        Vec2::new(0.0, self.length * 0.5)
    }

    pub fn area(&self) -> f64 {
        self.length * 2.0 * self.radius + PI * self.radius * self.radius
    }

    /// Rectangle plus two half-discs, shifted with the parallel axis theorem.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        let (l, r) = (self.length, self.radius);
        let rect_area = l * 2.0 * r;
        let caps_area = PI * r * r;
        let total = rect_area + caps_area;
        let rect_mass = mass * rect_area / total;
        let caps_mass = mass * caps_area / total;

        let rect_inertia = rect_mass * (l * l + 4.0 * r * r) / 12.0;
        // Half-disc centroid sits 4r/3π from its flat side.
        let d = 4.0 * r / (3.0 * PI);
        let caps_inertia = caps_mass * (0.5 * r * r + 0.25 * l * l + l * d);
        rect_inertia + caps_inertia
    }
}
