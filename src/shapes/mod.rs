pub mod box_shape;
pub mod capsule;
pub mod circle;
pub mod polygon;

pub use box_shape::BoxShape;
pub use capsule::Capsule;
pub use circle::Circle;
pub use polygon::Polygon;

use crate::collision::AABB;
use crate::math::{Transform, Vec2};

/// Discriminant of [`Shape`], ordered the way the narrow-phase pair table is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Circle = 0,
    Capsule = 1,
    Box = 2,
    Polygon = 3,
}

impl ShapeKind {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Enum representing the geometric shape of a collider, in local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Box(BoxShape),
    Capsule(Capsule),
    Polygon(Polygon),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Box(_) => ShapeKind::Box,
            Shape::Capsule(_) => ShapeKind::Capsule,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Local (unscaled) area.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Box(b) => b.area(),
            Shape::Capsule(c) => c.area(),
            Shape::Polygon(p) => p.area(),
        }
    }

    /// Moment of inertia about the local centroid for the given mass.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        match self {
            Shape::Circle(c) => c.moment_of_inertia(mass),
            Shape::Box(b) => b.moment_of_inertia(mass),
            Shape::Capsule(c) => c.moment_of_inertia(mass),
            Shape::Polygon(p) => p.moment_of_inertia(mass),
        }
    }

    /// Places the shape in world space through `transform`.
    ///
    /// Circle and capsule radii scale by the largest world scale component; a
    /// non-uniform scale is therefore only approximated for round shapes.
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        let radius_scale = transform.world_scale().abs().max_component();
        match self {
            Shape::Circle(c) => WorldShape::Circle {
                center: transform.world_position(),
                radius: c.radius * radius_scale,
            },
            Shape::Capsule(c) => WorldShape::Capsule {
                a: transform.local_to_world(c.a()),
                b: transform.local_to_world(c.b()),
                radius: c.radius * radius_scale,
            },
            Shape::Box(b) => WorldShape::polygon_from_local(b.polygon().vertices(), transform),
            Shape::Polygon(p) => WorldShape::polygon_from_local(p.vertices(), transform),
        }
    }
}

/// World-space geometry of a shape, cached per collider between transform changes.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f64 },
    Capsule { a: Vec2, b: Vec2, radius: f64 },
    /// Counter-clockwise vertices with outward unit edge normals.
    Polygon { vertices: Vec<Vec2>, normals: Vec<Vec2> },
}

impl WorldShape {
    fn polygon_from_local(local: &[Vec2], transform: &Transform) -> Self {
        let matrix = transform.world_matrix();
        let mut vertices: Vec<Vec2> = local.iter().map(|v| matrix.transform_point(*v)).collect();
        // A mirrored transform flips the winding.
        if matrix.determinant() < 0.0 {
            vertices.reverse();
        }
        let n = vertices.len();
        let normals = (0..n)
            .map(|i| (vertices[(i + 1) % n] - vertices[i]).rotate_right().normalize())
            .collect();
        WorldShape::Polygon { vertices, normals }
    }

    pub fn aabb(&self) -> AABB {
        match self {
            WorldShape::Circle { center, radius } => AABB::from_center(*center, Vec2::new(*radius, *radius)),
            WorldShape::Capsule { a, b, radius } => {
                let r = Vec2::new(*radius, *radius);
                AABB::new(a.min(*b) - r, a.max(*b) + r)
            }
            WorldShape::Polygon { vertices, .. } => {
                AABB::from_points(vertices).unwrap_or_else(|| AABB::new(Vec2::ZERO, Vec2::ZERO))
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            WorldShape::Circle { center, .. } => *center,
            WorldShape::Capsule { a, b, .. } => (*a + *b) * 0.5,
            WorldShape::Polygon { vertices, .. } => {
                let mut sum = Vec2::ZERO;
                for v in vertices {
                    sum += *v;
                }
                sum / vertices.len().max(1) as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_shape_dispatch() {
        let circle = Shape::Circle(Circle::new(1.0).unwrap());
        let boxed = Shape::Box(BoxShape::new(1.0, 1.0).unwrap());
        assert_eq!(circle.kind(), ShapeKind::Circle);
        assert_eq!(boxed.kind(), ShapeKind::Box);
        assert!((circle.area() - std::f64::consts::PI).abs() < EPSILON);
        assert!((boxed.moment_of_inertia(1.0) - 1.0 / 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_circle_aabb_is_rotation_invariant() {
        let shape = Shape::Circle(Circle::new(1.0).unwrap());
        let a = shape.to_world(&Transform::new(Vec2::new(2.0, 3.0), 0.0)).aabb();
        let b = shape.to_world(&Transform::new(Vec2::new(2.0, 3.0), 73.0)).aabb();
        assert_eq!(a, b);
        assert_eq!(a.min, Vec2::new(1.0, 2.0));
        assert_eq!(a.max, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_circle_radius_uses_max_scale() {
        let shape = Shape::Circle(Circle::new(1.0).unwrap());
        let t = Transform::identity().with_scale(Vec2::new(2.0, 3.0));
        match shape.to_world(&t) {
            WorldShape::Circle { radius, .. } => assert!((radius - 3.0).abs() < EPSILON),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rotated_box_aabb() {
        let shape = Shape::Box(BoxShape::new(2.0, 2.0).unwrap());
        let aabb = shape.to_world(&Transform::new(Vec2::ZERO, 45.0)).aabb();
        let h = 2.0_f64.sqrt();
        assert!((aabb.max.x - h).abs() < EPSILON);
        assert!((aabb.min.y + h).abs() < EPSILON);
    }

    #[test]
    fn test_capsule_world_shape() {
        let shape = Shape::Capsule(Capsule::new(2.0, 0.5).unwrap());
        let world = shape.to_world(&Transform::new(Vec2::new(1.0, 0.0), 90.0));
        match &world {
            WorldShape::Capsule { a, b, radius } => {
                assert!((*a - Vec2::new(2.0, 0.0)).magnitude() < EPSILON);
                assert!((*b - Vec2::new(0.0, 0.0)).magnitude() < EPSILON);
                assert_eq!(*radius, 0.5);
            }
            other => panic!("unexpected {:?}", other),
        }
        let aabb = world.aabb();
        assert!((aabb.min - Vec2::new(-0.5, -0.5)).magnitude() < EPSILON);
        assert!((aabb.max - Vec2::new(2.5, 0.5)).magnitude() < EPSILON);
    }

    #[test]
    fn test_mirrored_polygon_keeps_outward_normals() {
        let shape = Shape::Box(BoxShape::new(1.0, 1.0).unwrap());
        let t = Transform::identity().with_scale(Vec2::new(-1.0, 1.0));
        if let WorldShape::Polygon { vertices, normals } = shape.to_world(&t) {
            for (v, n) in vertices.iter().zip(&normals) {
                assert!(n.dot(-*v) < 0.0);
            }
        } else {
            panic!("box should become a polygon");
        }
    }
}
