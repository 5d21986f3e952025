use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

use super::polygon::Polygon;

/// Axis-aligned rectangle in local space: a four-vertex [`Polygon`] that
/// remembers its width and height.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    width: f64,
    height: f64,
    polygon: Polygon,
}

impl BoxShape {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(PhysicsError::InvalidShape(format!(
                    "box {name} must be positive and finite, got {value}"
                )));
            }
        }
        let (hw, hh) = (width * 0.5, height * 0.5);
        let polygon = Polygon::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])?;
        Ok(Self { width, height, polygon })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        self.polygon.moment_of_inertia(mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_unit_box_mass_properties() {
        let b = BoxShape::new(1.0, 1.0).unwrap();
        let mass = b.area();
        assert!((mass - 1.0).abs() < EPSILON);
        assert!((b.moment_of_inertia(mass) - mass / 12.0 * (1.0 + 1.0)).abs() < EPSILON);
    }

    #[test]
    fn test_rectangle_inertia_matches_closed_form() {
        let (w, h) = (2.0, 0.5);
        let b = BoxShape::new(w, h).unwrap();
        let mass = 3.0;
        assert!((b.moment_of_inertia(mass) - mass * (w * w + h * h) / 12.0).abs() < EPSILON);
        assert!((b.polygon().area() - b.area()).abs() < EPSILON);
    }

    #[test]
    fn test_box_rejects_bad_dimensions() {
        assert!(BoxShape::new(0.0, 1.0).is_err());
        assert!(BoxShape::new(1.0, -2.0).is_err());
        assert!(BoxShape::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_box_vertices_are_centered() {
        let b = BoxShape::new(4.0, 2.0).unwrap();
        assert_eq!(b.polygon().vertices()[0], Vec2::new(-2.0, -1.0));
        assert_eq!(b.polygon().vertices()[2], Vec2::new(2.0, 1.0));
        assert_eq!(b.half_extents(), Vec2::new(2.0, 1.0));
    }
}
