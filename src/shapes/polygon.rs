use crate::error::{PhysicsError, Result};
use crate::math::Vec2;

/// Largest vertex count; contact ids pack edge and vertex indices into 8 bits.
pub const MAX_POLYGON_VERTICES: usize = 256;

/// Below this, the area / cross sum of a polygon is treated as zero.
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Represents a convex polygon shape defined by its vertices in local space.
///
/// Vertices are stored counter-clockwise and recentered so the centroid sits at
/// the local origin. `normals[i]` is the outward unit normal of the edge from
/// `vertices[i]` to `vertices[i + 1]`. Convexity is assumed, not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
    centroid_offset: Vec2,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    ///
    /// Clockwise input is reversed to counter-clockwise. Fails on fewer than 3
    /// or more than [`MAX_POLYGON_VERTICES`] vertices, non-finite coordinates
    /// or a zero-length edge.
    pub fn new(mut vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::TooFewVertices(vertices.len()));
        }
        if vertices.len() > MAX_POLYGON_VERTICES {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon has {} vertices, at most {MAX_POLYGON_VERTICES} are supported",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidShape("polygon vertex is not finite".into()));
        }
        if signed_area(&vertices) < 0.0 {
            vertices.reverse();
        }

        let centroid = calculate_centroid(&vertices);
        for v in vertices.iter_mut() {
            *v -= centroid;
        }

        let n = vertices.len();
        let mut normals = Vec::with_capacity(n);
        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            if edge.magnitude_squared() < DEGENERATE_EPSILON * DEGENERATE_EPSILON {
                return Err(PhysicsError::InvalidShape(format!("polygon edge {i} has zero length")));
            }
            normals.push(edge.rotate_right().normalize());
        }

        Ok(Polygon { vertices, normals, centroid_offset: centroid })
    }

    /// Vertices relative to the centroid, counter-clockwise.
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Where the centroid was in the coordinates the polygon was built from.
    pub fn centroid_offset(&self) -> Vec2 {
        self.centroid_offset
    }

    /// Calculates the area of the polygon using the Shoelace formula.
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Moment of inertia about the centroid for the given mass.
    ///
    /// Degenerate polygons (near-zero area or cross sum) report 0 instead of
    /// dividing by ~zero.
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        let n = self.vertices.len();
        let mut numerator = 0.0;
        let mut cross_sum = 0.0;
        for i in 0..n {
            let v1 = self.vertices[i];
            let v2 = self.vertices[(i + 1) % n];
            let cross = v1.cross(v2);
            let term_x = v1.x * v1.x + v1.x * v2.x + v2.x * v2.x;
            let term_y = v1.y * v1.y + v1.y * v2.y + v2.y * v2.y;
            numerator += cross * (term_x + term_y);
            cross_sum += cross;
        }
        if cross_sum.abs() < DEGENERATE_EPSILON || self.area() < DEGENERATE_EPSILON {
            return 0.0;
        }
        mass * numerator / (6.0 * cross_sum.abs())
    }

    /// Index of the vertex with the largest projection on `direction`.
    /// Ties go to the first vertex found in iteration order.
    pub fn support_index(&self, direction: Vec2) -> usize {
        support_index(&self.vertices, direction)
    }

    /// The vertex furthest along `direction`, in local space.
    pub fn support_point(&self, direction: Vec2) -> Vec2 {
        self.vertices[self.support_index(direction)]
    }
}

/// Index of the point with the largest projection on `direction`; first wins on ties.
fn support_index(points: &[Vec2], direction: Vec2) -> usize {
    let mut best = 0;
    let mut best_proj = f64::NEG_INFINITY;
    for (i, p) in points.iter().enumerate() {
        let proj = p.dot(direction);
        if proj > best_proj {
            best_proj = proj;
            best = i;
        }
    }
    best
}

fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    let mut area = 0.0;
    for i in 0..n {
        area += vertices[i].cross(vertices[(i + 1) % n]);
    }
    area * 0.5
}

/// Area-weighted centroid; falls back to the vertex average for collinear input.
fn calculate_centroid(vertices: &[Vec2]) -> Vec2 {
    let n = vertices.len();
    let origin = vertices[0];
    let mut centroid = Vec2::ZERO;
    let mut signed_area_sum = 0.0;

    for i in 1..(n - 1) {
        let v2 = vertices[i];
        let v3 = vertices[i + 1];
        let triangle_signed_area = (v2 - origin).cross(v3 - origin) / 2.0;
        signed_area_sum += triangle_signed_area;
        centroid += (origin + v2 + v3) / 3.0 * triangle_signed_area;
    }

    if signed_area_sum.abs() < 1e-10 {
        let mut avg = Vec2::ZERO;
        for v in vertices {
            avg += *v;
        }
        avg / n as f64
    } else {
        centroid / signed_area_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ]
    }

    #[test]
    fn test_polygon_new_too_few_vertices() {
        let result = Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        assert_eq!(result, Err(PhysicsError::TooFewVertices(2)));
    }

    #[test]
    fn test_polygon_vertex_limit() {
        let ring = |n: usize| -> Vec<Vec2> {
            (0..n)
                .map(|i| {
                    let angle = std::f64::consts::TAU * i as f64 / n as f64;
                    Vec2::new(10.0 * angle.cos(), 10.0 * angle.sin())
                })
                .collect()
        };
        assert!(Polygon::new(ring(MAX_POLYGON_VERTICES)).is_ok());
        let result = Polygon::new(ring(MAX_POLYGON_VERTICES + 1));
        assert!(matches!(result, Err(PhysicsError::InvalidShape(_))));
    }

    #[test]
    fn test_polygon_rejects_zero_length_edge() {
        let result = Polygon::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        assert!(matches!(result, Err(PhysicsError::InvalidShape(_))));
    }

    #[test]
    fn test_polygon_area_square() {
        let polygon = Polygon::new(unit_square()).unwrap();
        assert!((polygon.area() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_recentered_on_centroid() {
        let offset = Vec2::new(10.0, -5.0);
        let polygon = Polygon::new(vec![
            offset + Vec2::new(0.0, 0.0),
            offset + Vec2::new(3.0, 0.0),
            offset + Vec2::new(0.0, 3.0),
        ])
        .unwrap();
        let expected_centroid = offset + Vec2::new(1.0, 1.0);
        assert!((polygon.centroid_offset() - expected_centroid).magnitude() < EPSILON);

        let mut sum = Vec2::ZERO;
        for v in polygon.vertices() {
            sum += *v;
        }
        assert!(sum.magnitude() < EPSILON);
        assert!((polygon.area() - 4.5).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_clockwise_input_is_reordered() {
        let mut cw = unit_square();
        cw.reverse();
        let polygon = Polygon::new(cw).unwrap();
        assert!(signed_area(polygon.vertices()) > 0.0);
    }

    #[test]
    fn test_polygon_normals_are_unit_and_outward() {
        let polygon = Polygon::new(unit_square()).unwrap();
        assert_eq!(polygon.normals().len(), polygon.vertices().len());
        for (i, n) in polygon.normals().iter().enumerate() {
            assert!((n.magnitude() - 1.0).abs() < EPSILON);
            // Outward: the centroid (origin) lies behind every edge.
            assert!(n.dot(Vec2::ZERO - polygon.vertices()[i]) < 0.0);
        }
        assert_eq!(polygon.normals()[0], Vec2::new(0.0, -1.0));
        assert_eq!(polygon.normals()[1], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_polygon_inertia_unit_square() {
        let polygon = Polygon::new(unit_square()).unwrap();
        let mass = polygon.area();
        let inertia = polygon.moment_of_inertia(mass);
        assert!((inertia - mass / 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_inertia_is_translation_invariant() {
        let offset = Vec2::new(10.0, 0.0);
        let polygon = Polygon::new(unit_square().into_iter().map(|v| v + offset).collect()).unwrap();
        let inertia = polygon.moment_of_inertia(2.0);
        assert!((inertia - 2.0 / 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_polygon_degenerate_inertia_is_zero() {
        // Collinear points: area ~0
        let polygon = Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]).unwrap();
        assert!(polygon.area() < EPSILON);
        assert_eq!(polygon.moment_of_inertia(1.0), 0.0);
    }

    #[test]
    fn test_support_point() {
        let polygon = Polygon::new(unit_square()).unwrap();
        assert_eq!(polygon.support_point(Vec2::new(1.0, 1.0)), Vec2::new(0.5, 0.5));
        assert_eq!(polygon.support_point(Vec2::new(-1.0, -0.1)), Vec2::new(-0.5, -0.5));
        // Tie between (0.5,-0.5) and (0.5,0.5): first in iteration order wins.
        assert_eq!(polygon.support_point(Vec2::RIGHT), Vec2::new(0.5, -0.5));
    }
}
