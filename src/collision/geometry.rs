use crate::math::Vec2;

const PARALLEL_EPSILON: f64 = 1e-12;

/// Finds the point on a line segment closest to a given point.
/// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
pub fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < PARALLEL_EPSILON {
        return (segment_a, 0.0);
    }
    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (segment_a + segment_vec * t, t)
}

/// Closest points between segments `p1-q1` and `p2-q2`.
/// Parallel segments resolve to the pair found from `p1`.
pub fn segment_segment_closest(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> (Vec2, Vec2) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.magnitude_squared();
    let e = d2.magnitude_squared();
    let f = d2.dot(r);

    if a < PARALLEL_EPSILON && e < PARALLEL_EPSILON {
        return (p1, p2);
    }
    let (s, t) = if a < PARALLEL_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e < PARALLEL_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom > PARALLEL_EPSILON { ((b * f - c * e) / denom).clamp(0.0, 1.0) } else { 0.0 };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };
    (p1 + d1 * s, p2 + d2 * t)
}

/// Inclusive point test against a counter-clockwise convex polygon.
pub fn point_in_convex(point: Vec2, vertices: &[Vec2], normals: &[Vec2]) -> bool {
    vertices.iter().zip(normals).all(|(v, n)| n.dot(point - *v) <= 0.0)
}
