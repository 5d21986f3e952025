use std::f64::consts::PI;

use crate::error::{PhysicsError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    pub fn new(radius: f64) -> Result<Self> {
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be positive and finite, got {radius}"
            )));
        }
        Ok(Self { radius })
    }

    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// Solid disc about its center.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        0.5 * mass * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_circle_new() {
        let c = Circle::new(5.0).unwrap();
        assert_eq!(c.radius, 5.0);
    }

    #[test]
    fn test_circle_rejects_bad_radius() {
        assert!(matches!(Circle::new(-1.0), Err(PhysicsError::InvalidShape(_))));
        assert!(Circle::new(0.0).is_err());
        assert!(Circle::new(f64::INFINITY).is_err());
        assert!(Circle::new(f64::NAN).is_err());
    }

    #[test]
    fn test_circle_mass_properties() {
        let r = 2.0;
        let c = Circle::new(r).unwrap();
        let mass = c.area();
        assert!((mass - PI * 4.0).abs() < EPSILON);
        assert!((c.moment_of_inertia(mass) - 0.5 * mass * r * r).abs() < EPSILON);
    }
}
