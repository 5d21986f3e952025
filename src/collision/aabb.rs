// Defines an Axis-Aligned Bounding Box

use crate::math::{Ray, Vec2};

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
/// `min <= max` holds component-wise for every box built through the constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB, reordering the corners if needed.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        AABB { min: center - half, max: center + half }
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = AABB { min: *first, max: *first };
        for point in rest {
            aabb.min = aabb.min.min(*point);
            aabb.max = aabb.max.max(*point);
        }
        Some(aabb)
    }

    /// Checks if this AABB overlaps with another AABB. Touching edges count as overlap,
    /// so a box resting exactly on another still produces a candidate pair.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x >= other.min.x && self.min.x <= other.max.x;
        let y_overlap = self.max.y >= other.min.y && self.min.y <= other.max.y;
        x_overlap && y_overlap
    }

    /// Returns the smallest box containing both inputs.
    pub fn union(a: &AABB, b: &AABB) -> AABB {
        AABB { min: a.min.min(b.min), max: a.max.max(b.max) }
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        *self = AABB::union(self, other);
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Whether the grid cell `(cell_x, cell_y)` of a grid with `cell_size` lies inside the
    /// cell rectangle this box covers.
    pub fn contains_cell(&self, cell_x: i32, cell_y: i32, cell_size: f64) -> bool {
        let inv = 1.0 / cell_size;
        let min_x = (self.min.x * inv).floor() as i32;
        let min_y = (self.min.y * inv).floor() as i32;
        let max_x = (self.max.x * inv).floor() as i32;
        let max_y = (self.max.y * inv).floor() as i32;
        cell_x >= min_x && cell_x <= max_x && cell_y >= min_y && cell_y <= max_y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn expanded(&self, margin: f64) -> AABB {
        let m = Vec2::new(margin, margin);
        AABB::new(self.min - m, self.max + m)
    }

    /// Slab test. Returns the entry distance along the ray (0 when the origin is inside),
    /// or `None` if the ray misses the box within its max distance.
    pub fn ray_entry(&self, ray: &Ray) -> Option<f64> {
        let mut t_min = 0.0_f64;
        let mut t_max = ray.max_distance;
        for (origin, dir, lo, hi) in [
            (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
            (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
        ] {
            if dir.abs() < 1e-12 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let (t1, t2) = ((lo - origin) * inv, (hi - origin) * inv);
            let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_corners() {
        let aabb = AABB::new(Vec2::new(2.0, -1.0), Vec2::new(-3.0, 4.0));
        assert_eq!(aabb.min, Vec2::new(-3.0, -1.0));
        assert_eq!(aabb.max, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_overlaps_including_touching() {
        let a = AABB::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = AABB::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));
        let touching = AABB::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let apart = AABB::new(Vec2::new(1.5, 1.5), Vec2::new(2.0, 2.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.overlaps(&touching));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_union_contains_both_inputs() {
        let cases = [
            (AABB::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)), AABB::new(Vec2::new(-2.0, 0.5), Vec2::new(0.5, 3.0))),
            (AABB::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0)), AABB::new(Vec2::new(-1.0, -1.0), Vec2::new(0.0, 0.0))),
            (AABB::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)), AABB::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0))),
        ];
        for (a, b) in cases {
            let u = AABB::union(&a, &b);
            assert!(u.min.x <= a.min.x && u.min.x <= b.min.x);
            assert!(u.min.y <= a.min.y && u.min.y <= b.min.y);
            assert!(u.max.x >= a.max.x && u.max.x >= b.max.x);
            assert!(u.max.y >= a.max.y && u.max.y >= b.max.y);
        }
    }

    #[test]
    fn test_from_points() {
        assert!(AABB::from_points(&[]).is_none());
        let aabb = AABB::from_points(&[Vec2::new(1.0, 5.0), Vec2::new(-1.0, 2.0), Vec2::new(3.0, -4.0)]).unwrap();
        assert_eq!(aabb.min, Vec2::new(-1.0, -4.0));
        assert_eq!(aabb.max, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_contains_point_and_cell() {
        let aabb = AABB::new(Vec2::new(-1.0, 0.5), Vec2::new(2.5, 3.0));
        assert!(aabb.contains_point(Vec2::new(0.0, 1.0)));
        assert!(!aabb.contains_point(Vec2::new(3.0, 1.0)));

        // Cells of size 1: x in -1..=2, y in 0..=3
        assert!(aabb.contains_cell(-1, 0, 1.0));
        assert!(aabb.contains_cell(2, 3, 1.0));
        assert!(!aabb.contains_cell(3, 0, 1.0));
        assert!(!aabb.contains_cell(0, -1, 1.0));
    }

    #[test]
    fn test_ray_entry() {
        let aabb = AABB::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let ray = Ray::new(Vec2::new(-5.0, 0.0), Vec2::RIGHT, 100.0).unwrap();
        assert!((aabb.ray_entry(&ray).unwrap() - 4.0).abs() < 1e-12);

        let short = Ray::new(Vec2::new(-5.0, 0.0), Vec2::RIGHT, 3.0).unwrap();
        assert!(aabb.ray_entry(&short).is_none());

        let miss = Ray::new(Vec2::new(-5.0, 2.0), Vec2::RIGHT, 100.0).unwrap();
        assert!(aabb.ray_entry(&miss).is_none());

        let inside = Ray::new(Vec2::ZERO, Vec2::UP, 1.0).unwrap();
        assert_eq!(aabb.ray_entry(&inside), Some(0.0));
    }
}
