use crate::math::{Ray, Vec2};
use crate::shapes::WorldShape;

use super::geometry::closest_point_on_segment;

/// Where a ray first enters a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersection {
    pub distance: f64,
    pub point: Vec2,
    /// Outward surface normal at `point`.
    pub normal: Vec2,
}

/// Casts `ray` against a world-space shape.
///
/// A ray whose origin is inside the shape reports no hit.
pub fn raycast_shape(shape: &WorldShape, ray: &Ray) -> Option<RayIntersection> {
    match shape {
        WorldShape::Circle { center, radius } => raycast_circle(*center, *radius, ray),
        WorldShape::Polygon { vertices, normals } => raycast_polygon(vertices, normals, ray),
        WorldShape::Capsule { a, b, radius } => raycast_capsule(*a, *b, *radius, ray),
    }
}

fn raycast_circle(center: Vec2, radius: f64, ray: &Ray) -> Option<RayIntersection> {
    let m = ray.origin - center;
    let b = m.dot(ray.direction);
    let c = m.magnitude_squared() - radius * radius;
    // Inside, or outside and pointing away.
    if c < 0.0 || (c > 0.0 && b > 0.0) {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    if t < 0.0 || t > ray.max_distance {
        return None;
    }
    let point = ray.point_at(t);
    Some(RayIntersection { distance: t, point, normal: (point - center).normalize() })
}

/// Clips the ray against each edge's half-plane; the last entering plane is the hit face.
fn raycast_polygon(vertices: &[Vec2], normals: &[Vec2], ray: &Ray) -> Option<RayIntersection> {
    let mut lower = 0.0;
    let mut upper = ray.max_distance;
    let mut index = None;

    for (i, (v, n)) in vertices.iter().zip(normals).enumerate() {
        let numerator = n.dot(*v - ray.origin);
        let denominator = n.dot(ray.direction);
        if denominator == 0.0 {
            if numerator < 0.0 {
                return None;
            }
        } else if denominator < 0.0 && numerator < lower * denominator {
            lower = numerator / denominator;
            index = Some(i);
        } else if denominator > 0.0 && numerator < upper * denominator {
            upper = numerator / denominator;
        }
        if upper < lower {
            return None;
        }
    }

    let i = index?;
    Some(RayIntersection { distance: lower, point: ray.point_at(lower), normal: normals[i] })
}

/// Distance along the ray to segment `p-q`; parallel segments never hit.
fn ray_segment(ray: &Ray, p: Vec2, q: Vec2) -> Option<f64> {
    let e = q - p;
    let denom = ray.direction.cross(e);
    if denom.abs() < 1e-12 {
        return None;
    }
    let w = p - ray.origin;
    let t = w.cross(e) / denom;
    let u = w.cross(ray.direction) / denom;
    (t >= 0.0 && t <= ray.max_distance && (0.0..=1.0).contains(&u)).then_some(t)
}

/// Two side segments offset by the radius plus the two end caps.
fn raycast_capsule(a: Vec2, b: Vec2, radius: f64, ray: &Ray) -> Option<RayIntersection> {
    let (closest, _) = closest_point_on_segment(a, b, ray.origin);
    if closest.distance_squared(ray.origin) < radius * radius {
        return None;
    }

    let mut best: Option<RayIntersection> = None;
    let mut keep = |hit: RayIntersection| {
        if best.map_or(true, |b| hit.distance < b.distance) {
            best = Some(hit);
        }
    };

    let side = (b - a).rotate_right().normalize();
    for normal in [side, -side] {
        // Only the side facing the ray can be entered.
        if normal.dot(ray.direction) >= 0.0 {
            continue;
        }
        let offset = normal * radius;
        if let Some(t) = ray_segment(ray, a + offset, b + offset) {
            keep(RayIntersection { distance: t, point: ray.point_at(t), normal });
        }
    }
    for cap in [a, b] {
        if let Some(hit) = raycast_circle(cap, radius, ray) {
            keep(hit);
        }
    }
    best
}
