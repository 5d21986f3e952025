use super::vec2::Vec2;

/// A ray with a unit direction, limited to `max_distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
    pub max_distance: f64,
}

impl Ray {
    /// Builds a ray, normalizing `direction`.
    /// Returns `None` for a zero-length direction or a negative/NaN distance.
    pub fn new(origin: Vec2, direction: Vec2, max_distance: f64) -> Option<Self> {
        let direction = direction.normalize();
        if direction == Vec2::ZERO || !(max_distance >= 0.0) {
            return None;
        }
        Some(Self { origin, direction, max_distance })
    }

    pub fn point_at(&self, distance: f64) -> Vec2 {
        self.origin + self.direction * distance
    }
}
