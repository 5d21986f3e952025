//! Separating-axis test and reference-face clipping for convex hulls with an
//! optional rounding radius. Polygons and boxes are hulls with radius 0; a
//! capsule is a two-vertex hull (its core segment) with the capsule radius.

use crate::math::Vec2;

use super::geometry::{point_in_convex, segment_segment_closest};
use super::manifold::{ContactId, ContactPoint, ContactSet, SPECULATIVE_DISTANCE};

/// Distance tolerance below which two cores are considered overlapping.
const LINEAR_SLOP: f64 = 0.005;
/// cos of the largest angle between the closest-point direction and a face
/// normal for a rounded contact to still count as face-to-face.
const FACE_ALIGNMENT: f64 = 0.999;

/// Borrowed view of a convex hull: counter-clockwise vertices, the outward
/// normal of each edge `i -> i + 1`, and a rounding radius.
#[derive(Debug, Clone, Copy)]
pub struct Hull<'a> {
    pub vertices: &'a [Vec2],
    pub normals: &'a [Vec2],
    pub radius: f64,
}

impl<'a> Hull<'a> {
    pub fn new(vertices: &'a [Vec2], normals: &'a [Vec2], radius: f64) -> Self {
        debug_assert_eq!(vertices.len(), normals.len());
        Self { vertices, normals, radius }
    }

    fn len(&self) -> usize {
        self.vertices.len()
    }

    fn edge(&self, i: usize) -> (Vec2, Vec2) {
        (self.vertices[i], self.vertices[(i + 1) % self.len()])
    }

    /// Distinct edges; a segment hull walks the same edge in both directions.
    fn edge_count(&self) -> usize {
        if self.len() == 2 {
            1
        } else {
            self.len()
        }
    }
}

/// Vertices and normals for the core segment of a capsule.
pub fn segment_hull_data(a: Vec2, b: Vec2) -> ([Vec2; 2], [Vec2; 2]) {
    let n = (b - a).rotate_right().normalize();
    ([a, b], [n, -n])
}

/// Edge of `h1` whose normal separates `h2` the most, with that separation.
/// Each edge is scored by the deepest vertex of `h2` along its normal.
pub fn find_max_separation(h1: &Hull, h2: &Hull) -> (usize, f64) {
    let mut best_index = 0;
    let mut max_separation = f64::NEG_INFINITY;
    for (i, (n, v1)) in h1.normals.iter().zip(h1.vertices).enumerate() {
        let mut si = f64::INFINITY;
        for w in h2.vertices {
            si = si.min(n.dot(*w - *v1));
        }
        if si > max_separation {
            max_separation = si;
            best_index = i;
        }
    }
    (best_index, max_separation)
}

/// Edge of `incident` whose normal is most anti-parallel to `reference_normal`.
fn find_incident_edge(reference_normal: Vec2, incident: &Hull) -> usize {
    let mut index = 0;
    let mut min_dot = f64::INFINITY;
    for (i, n) in incident.normals.iter().enumerate() {
        let dot = reference_normal.dot(*n);
        if dot < min_dot {
            min_dot = dot;
            index = i;
        }
    }
    index
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    point: Vec2,
    vertex: usize,
}

/// Keeps the part of the segment `v` with `normal·p <= offset`. Returns both
/// endpoints of the kept part, or `None` when fewer than two survive.
fn clip_segment_to_line(v: [ClipVertex; 2], normal: Vec2, offset: f64) -> Option<[ClipVertex; 2]> {
    let d0 = normal.dot(v[0].point) - offset;
    let d1 = normal.dot(v[1].point) - offset;

    let mut out = [v[0]; 2];
    let mut count = 0;
    if d0 <= 0.0 {
        out[count] = v[0];
        count += 1;
    }
    if d1 <= 0.0 {
        out[count] = v[1];
        count += 1;
    }
    if d0 * d1 < 0.0 {
        let t = d0 / (d0 - d1);
        // The clipped point keeps the id of the endpoint it replaces.
        let vertex = if d0 > 0.0 { v[0].vertex } else { v[1].vertex };
        out[count] = ClipVertex { point: v[0].point.lerp(v[1].point, t), vertex };
        count += 1;
    }
    (count == 2).then_some(out)
}

/// Clips the incident edge of `incident` against the side planes of the
/// reference edge and keeps the points within [`SPECULATIVE_DISTANCE`] of touching.
///
/// `flip` says the reference hull is body B, so the manifold normal is the
/// reversed reference normal.
fn clip_against_reference(
    reference: &Hull,
    reference_edge: usize,
    incident: &Hull,
    flip: bool,
) -> ContactSet {
    let (v11, v12) = reference.edge(reference_edge);
    let reference_normal = reference.normals[reference_edge];
    let total_radius = reference.radius + incident.radius;

    let incident_edge = find_incident_edge(reference_normal, incident);
    let next = (incident_edge + 1) % incident.len();
    let incident_segment = [
        ClipVertex { point: incident.vertices[incident_edge], vertex: incident_edge },
        ClipVertex { point: incident.vertices[next], vertex: next },
    ];

    let tangent = (v12 - v11).normalize();
    let Some(clipped) = clip_segment_to_line(incident_segment, -tangent, -tangent.dot(v11)) else {
        return ContactSet::empty();
    };
    let Some(clipped) = clip_segment_to_line(clipped, tangent, tangent.dot(v12)) else {
        return ContactSet::empty();
    };

    let normal = if flip { -reference_normal } else { reference_normal };
    let mut set = ContactSet::with_normal(normal);
    for cv in clipped {
        let separation = reference_normal.dot(cv.point - v11);
        let penetration = total_radius - separation;
        if penetration < -SPECULATIVE_DISTANCE {
            continue;
        }
        let reference_surface = cv.point - reference_normal * (separation - reference.radius);
        let incident_surface = cv.point - reference_normal * incident.radius;
        set.push(ContactPoint {
            position: (reference_surface + incident_surface) * 0.5,
            penetration,
            id: ContactId::feature(reference_edge, cv.vertex, flip),
        });
    }
    set
}

struct Closest {
    point_a: Vec2,
    point_b: Vec2,
    distance: f64,
    edge_a: usize,
    edge_b: usize,
}

/// Closest points between the cores of two hulls; distance 0 when they overlap.
fn closest_features(a: &Hull, b: &Hull) -> Closest {
    let mut best = Closest {
        point_a: a.vertices[0],
        point_b: b.vertices[0],
        distance: f64::INFINITY,
        edge_a: 0,
        edge_b: 0,
    };
    for i in 0..a.edge_count() {
        let (p1, q1) = a.edge(i);
        for j in 0..b.edge_count() {
            let (p2, q2) = b.edge(j);
            let (c1, c2) = segment_segment_closest(p1, q1, p2, q2);
            let d = c1.distance(c2);
            if d < best.distance {
                best = Closest { point_a: c1, point_b: c2, distance: d, edge_a: i, edge_b: j };
            }
        }
    }

    let contained = (b.len() >= 3 && a.vertices.iter().any(|v| point_in_convex(*v, b.vertices, b.normals)))
        || (a.len() >= 3 && b.vertices.iter().any(|v| point_in_convex(*v, a.vertices, a.normals)));
    if contained {
        best.distance = 0.0;
    }
    best
}

/// Narrow-phase test between two convex hulls. The normal points from `a` to `b`.
pub fn collide_hulls(a: &Hull, b: &Hull) -> ContactSet {
    let total_radius = a.radius + b.radius;
    let reach = total_radius + SPECULATIVE_DISTANCE;

    let (edge_a, separation_a) = find_max_separation(a, b);
    if separation_a > reach {
        return ContactSet::empty();
    }
    let (edge_b, separation_b) = find_max_separation(b, a);
    if separation_b > reach {
        return ContactSet::empty();
    }

    // Prefer A as the reference unless B is clearly better, to avoid flip-flopping.
    let flip = separation_b > separation_a + 0.1 * LINEAR_SLOP;
    let (reference, reference_edge, incident) = if flip { (b, edge_b, a) } else { (a, edge_a, b) };

    if total_radius > 0.0 {
        let closest = closest_features(a, b);
        if closest.distance > reach {
            return ContactSet::empty();
        }
        if closest.distance > LINEAR_SLOP {
            let normal = (closest.point_b - closest.point_a) / closest.distance;
            let reference_normal = reference.normals[reference_edge];
            let face_normal = if flip { -reference_normal } else { reference_normal };
            if face_normal.dot(normal) > FACE_ALIGNMENT {
                let set = clip_against_reference(reference, reference_edge, incident, flip);
                if !set.is_empty() {
                    return set;
                }
            }
            return rounded_point_contact(a, b, &closest, normal);
        }
    }

    clip_against_reference(reference, reference_edge, incident, flip)
}

/// Single contact between rounded hulls whose cores are apart but within reach.
/// Its penetration is negative when the surfaces do not touch yet.
fn rounded_point_contact(a: &Hull, b: &Hull, closest: &Closest, normal: Vec2) -> ContactSet {
    let surface_a = closest.point_a + normal * a.radius;
    let surface_b = closest.point_b - normal * b.radius;
    let mut set = ContactSet::with_normal(normal);
    set.push(ContactPoint {
        position: (surface_a + surface_b) * 0.5,
        penetration: a.radius + b.radius - closest.distance,
        id: ContactId::closest_features(closest.edge_a, closest.edge_b),
    });
    set
}
