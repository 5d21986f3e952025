//! Narrow-phase: pairwise contact generation between world-space shapes.
//!
//! Every routine takes shape A first and returns a [`ContactSet`] whose normal
//! points from A towards B. [`collide`] dispatches through a table indexed by
//! [`ShapeKind`]; for pairs stored the other way round it swaps the arguments
//! and flips the result.

use crate::math::Vec2;
use crate::shapes::{ShapeKind, WorldShape};

use super::geometry::closest_point_on_segment;
use super::manifold::{ContactId, ContactPoint, ContactSet, SPECULATIVE_DISTANCE};
use super::sat::{collide_hulls, segment_hull_data, Hull};

type CollideFn = fn(&WorldShape, &WorldShape) -> ContactSet;

const N: usize = ShapeKind::COUNT;

/// Upper triangle of the pair table; `None` below the diagonal.
const PAIR_TABLE: [[Option<CollideFn>; N]; N] = [
    [Some(circle_circle), Some(circle_capsule), Some(circle_box), Some(circle_polygon)],
    [None, Some(capsule_capsule), Some(capsule_box), Some(capsule_polygon)],
    [None, None, Some(box_box), Some(box_polygon)],
    [None, None, None, Some(polygon_polygon)],
];

/// Tests shape A (of `kind_a`) against shape B (of `kind_b`).
pub fn collide(kind_a: ShapeKind, shape_a: &WorldShape, kind_b: ShapeKind, shape_b: &WorldShape) -> ContactSet {
    let (i, j) = (kind_a.index(), kind_b.index());
    if i <= j {
        PAIR_TABLE[i][j].map_or_else(ContactSet::empty, |f| f(shape_a, shape_b))
    } else {
        PAIR_TABLE[j][i].map_or_else(ContactSet::empty, |f| f(shape_b, shape_a).flip())
    }
}

/// Contact between two discs. Coincident centers fall back to an upward normal.
fn discs(center_a: Vec2, radius_a: f64, center_b: Vec2, radius_b: f64) -> ContactSet {
    let dist_vec = center_b - center_a;
    let dist_sq = dist_vec.magnitude_squared();
    let radii_sum = radius_a + radius_b;
    let reach = radii_sum + SPECULATIVE_DISTANCE;
    if dist_sq > reach * reach {
        return ContactSet::empty();
    }

    let distance = dist_sq.sqrt();
    let normal = if distance > 1e-10 { dist_vec / distance } else { Vec2::UP };
    let surface_a = center_a + normal * radius_a;
    let surface_b = center_b - normal * radius_b;

    let mut set = ContactSet::with_normal(normal);
    set.push(ContactPoint {
        position: (surface_a + surface_b) * 0.5,
        penetration: radii_sum - distance,
        id: ContactId::default(),
    });
    set
}

fn circle_circle(a: &WorldShape, b: &WorldShape) -> ContactSet {
    match (a, b) {
        (WorldShape::Circle { center: ca, radius: ra }, WorldShape::Circle { center: cb, radius: rb }) => {
            discs(*ca, *ra, *cb, *rb)
        }
        _ => ContactSet::empty(),
    }
}

fn circle_capsule(a: &WorldShape, b: &WorldShape) -> ContactSet {
    match (a, b) {
        (WorldShape::Circle { center, radius }, WorldShape::Capsule { a: p, b: q, radius: capsule_radius }) => {
            let (closest, _) = closest_point_on_segment(*p, *q, *center);
            discs(*center, *radius, closest, *capsule_radius)
        }
        _ => ContactSet::empty(),
    }
}

fn circle_box(a: &WorldShape, b: &WorldShape) -> ContactSet {
    circle_polygon(a, b)
}

/// Circle against a convex polygon: the face of greatest separation, or the
/// nearest vertex when the center lies in that vertex's Voronoi region.
fn circle_polygon(a: &WorldShape, b: &WorldShape) -> ContactSet {
    let (WorldShape::Circle { center, radius }, WorldShape::Polygon { vertices, normals }) = (a, b) else {
        return ContactSet::empty();
    };
    let (c, r) = (*center, *radius);
    let count = vertices.len();

    let mut face = 0;
    let mut separation = f64::NEG_INFINITY;
    for (i, (v, n)) in vertices.iter().zip(normals).enumerate() {
        let s = n.dot(c - *v);
        if s > r + SPECULATIVE_DISTANCE {
            return ContactSet::empty();
        }
        if s > separation {
            separation = s;
            face = i;
        }
    }

    let v1 = vertices[face];
    let v2 = vertices[(face + 1) % count];

    // Center inside the polygon: push out through the shallowest face.
    if separation < f64::EPSILON {
        return face_contact(c, r, normals[face], separation);
    }

    let u1 = (c - v1).dot(v2 - v1);
    let u2 = (c - v2).dot(v1 - v2);
    if u1 <= 0.0 {
        vertex_contact(c, r, v1)
    } else if u2 <= 0.0 {
        vertex_contact(c, r, v2)
    } else {
        face_contact(c, r, normals[face], separation)
    }
}

fn face_contact(center: Vec2, radius: f64, face_normal: Vec2, separation: f64) -> ContactSet {
    let normal = -face_normal;
    let penetration = radius - separation;
    let mut set = ContactSet::with_normal(normal);
    set.push(ContactPoint {
        position: center + normal * (radius - penetration * 0.5),
        penetration,
        id: ContactId::default(),
    });
    set
}

fn vertex_contact(center: Vec2, radius: f64, vertex: Vec2) -> ContactSet {
    let offset = vertex - center;
    let distance = offset.magnitude();
    if distance > radius + SPECULATIVE_DISTANCE {
        return ContactSet::empty();
    }
    let normal = if distance > 1e-10 { offset / distance } else { Vec2::UP };
    let penetration = radius - distance;
    let mut set = ContactSet::with_normal(normal);
    set.push(ContactPoint {
        position: center + normal * (radius - penetration * 0.5),
        penetration,
        id: ContactId::default(),
    });
    set
}

fn capsule_capsule(a: &WorldShape, b: &WorldShape) -> ContactSet {
    let (WorldShape::Capsule { a: pa, b: qa, radius: ra }, WorldShape::Capsule { a: pb, b: qb, radius: rb }) = (a, b)
    else {
        return ContactSet::empty();
    };
    let (va, na) = segment_hull_data(*pa, *qa);
    let (vb, nb) = segment_hull_data(*pb, *qb);
    collide_hulls(&Hull::new(&va, &na, *ra), &Hull::new(&vb, &nb, *rb))
}

fn capsule_box(a: &WorldShape, b: &WorldShape) -> ContactSet {
    capsule_polygon(a, b)
}

fn capsule_polygon(a: &WorldShape, b: &WorldShape) -> ContactSet {
    let (WorldShape::Capsule { a: p, b: q, radius }, WorldShape::Polygon { vertices, normals }) = (a, b) else {
        return ContactSet::empty();
    };
    let (vc, nc) = segment_hull_data(*p, *q);
    collide_hulls(&Hull::new(&vc, &nc, *radius), &Hull::new(vertices, normals, 0.0))
}

fn box_box(a: &WorldShape, b: &WorldShape) -> ContactSet {
    polygon_polygon(a, b)
}

fn box_polygon(a: &WorldShape, b: &WorldShape) -> ContactSet {
    polygon_polygon(a, b)
}

fn polygon_polygon(a: &WorldShape, b: &WorldShape) -> ContactSet {
    let (WorldShape::Polygon { vertices: va, normals: na }, WorldShape::Polygon { vertices: vb, normals: nb }) = (a, b)
    else {
        return ContactSet::empty();
    };
    collide_hulls(&Hull::new(va, na, 0.0), &Hull::new(vb, nb, 0.0))
}
