use std::hash::{Hash, Hasher};

use crate::math::Vec2;
use crate::objects::BodyHandle;

/// A manifold never holds more than two contact points in 2D.
pub const MAX_CONTACTS: usize = 2;

/// Gap up to which the narrow-phase still reports separated contacts, with a
/// negative penetration, so their accumulated impulses survive brief separations.
pub const SPECULATIVE_DISTANCE: f64 = 0.02;

/// Stable identity of a contact feature, used to match contacts across frames.
///
/// Polygon-family contacts pack the reference edge, the incident vertex and
/// whether the reference face belonged to body B. Rounded point contacts pack
/// the two closest edges instead, and single-point circle contacts use id 0.
/// Edge and vertex indices take 8 bits each, which is why polygons are
/// limited to [`MAX_POLYGON_VERTICES`](crate::shapes::polygon::MAX_POLYGON_VERTICES).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContactId(pub u32);

impl ContactId {
    const FLIP_BIT: u32 = 1 << 16;
    const CLOSEST_BIT: u32 = 1 << 17;

    pub fn feature(reference_edge: usize, incident_vertex: usize, flipped: bool) -> Self {
        let mut key = ((reference_edge as u32 & 0xff) << 8) | (incident_vertex as u32 & 0xff);
        if flipped {
            key |= Self::FLIP_BIT;
        }
        ContactId(key)
    }

    /// Point contact between rounded shapes, keyed by the closest edge on each.
    pub fn closest_features(edge_a: usize, edge_b: usize) -> Self {
        ContactId(Self::CLOSEST_BIT | ((edge_a as u32 & 0xff) << 8) | (edge_b as u32 & 0xff))
    }

    pub fn reference_edge(self) -> usize {
        ((self.0 >> 8) & 0xff) as usize
    }

    pub fn incident_vertex(self) -> usize {
        (self.0 & 0xff) as usize
    }

    pub fn is_flipped(self) -> bool {
        self.0 & Self::FLIP_BIT != 0
    }

    /// The same feature seen with bodies A and B swapped.
    pub fn flipped(self) -> Self {
        ContactId(self.0 ^ Self::FLIP_BIT)
    }
}

/// One narrow-phase contact: where, how deep, and which features produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactPoint {
    /// World position, midway between the two surfaces.
    pub position: Vec2,
    /// Overlap along the manifold normal. Non-negative means touching; a
    /// negative value is a separated contact within [`SPECULATIVE_DISTANCE`].
    pub penetration: f64,
    pub id: ContactId,
}

/// Result of a pairwise narrow-phase test: a normal (A towards B) and 0-2 points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContactSet {
    pub normal: Vec2,
    points: [ContactPoint; MAX_CONTACTS],
    count: usize,
}

impl ContactSet {
    /// No collision.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_normal(normal: Vec2) -> Self {
        Self { normal, ..Self::default() }
    }

    pub fn push(&mut self, point: ContactPoint) {
        if self.count < MAX_CONTACTS {
            self.points[self.count] = point;
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn points(&self) -> &[ContactPoint] {
        &self.points[..self.count]
    }

    /// Re-expresses the result with A and B swapped.
    pub fn flip(mut self) -> Self {
        self.normal = -self.normal;
        for p in &mut self.points[..self.count] {
            p.id = p.id.flipped();
        }
        self
    }
}

/// A solver contact: geometry from the narrow-phase plus accumulated impulses
/// and per-step scratch values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Contact {
    pub position: Vec2,
    pub penetration: f64,
    pub id: ContactId,
    /// Contact point relative to body A's world position.
    pub ra: Vec2,
    /// Contact point relative to body B's world position.
    pub rb: Vec2,
    /// Accumulated normal impulse (carried across frames).
    pub accum_impulse: f64,
    /// Accumulated friction impulse (carried across frames).
    pub accum_friction: f64,
    pub normal_mass: f64,
    pub tangent_mass: f64,
    pub bias: f64,
}

/// Unordered body pair, normalized so `BodyPair::new(a, b) == BodyPair::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyPair {
    lo: BodyHandle,
    hi: BodyHandle,
}

impl BodyPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        if a <= b {
            BodyPair { lo: a, hi: b }
        } else {
            BodyPair { lo: b, hi: a }
        }
    }

    pub fn first(&self) -> BodyHandle {
        self.lo
    }

    pub fn second(&self) -> BodyHandle {
        self.hi
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.lo == handle || self.hi == handle
    }
}

/// Persistent contact record between two bodies.
///
/// Equality and hashing only look at the unordered body pair, so
/// `Manifold::new(a, b) == Manifold::new(b, a)`.
#[derive(Debug, Clone)]
pub struct Manifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Collision normal, pointing from body A towards body B.
    pub normal: Vec2,
    /// Combined friction coefficient, refreshed by the solver's presolve.
    pub friction: f64,
    /// Set when either collider is a trigger; such manifolds are never solved.
    pub is_trigger: bool,
    contacts: [Contact; MAX_CONTACTS],
    contact_count: usize,
    // Slots of A and B in the world body list, resolved each step.
    pub(crate) index_a: usize,
    pub(crate) index_b: usize,
}

impl Manifold {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            normal: Vec2::ZERO,
            friction: 0.0,
            is_trigger: false,
            contacts: [Contact::default(); MAX_CONTACTS],
            contact_count: 0,
            index_a: 0,
            index_b: 0,
        }
    }

    pub fn pair(&self) -> BodyPair {
        BodyPair::new(self.body_a, self.body_b)
    }

    pub fn contact_count(&self) -> usize {
        self.contact_count
    }

    /// Whether any contact actually touches. Separated contacts are only kept
    /// for their accumulated impulses.
    pub fn is_touching(&self) -> bool {
        self.contacts().iter().any(|c| c.penetration >= 0.0)
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts[..self.contact_count]
    }

    pub fn contacts_mut(&mut self) -> &mut [Contact] {
        &mut self.contacts[..self.contact_count]
    }

    /// Replaces the contacts with a fresh narrow-phase result.
    ///
    /// Positions, depths and the contact count all come from `set`; only the
    /// accumulated impulses are inherited, from the previous contact with the
    /// same [`ContactId`]. Unmatched contacts start from zero.
    pub fn update(&mut self, set: &ContactSet) {
        let previous = self.contacts;
        let previous_count = self.contact_count;

        self.normal = set.normal;
        self.contact_count = set.len();
        for (slot, point) in self.contacts.iter_mut().zip(set.points()) {
            let carried = previous[..previous_count].iter().find(|c| c.id == point.id);
            *slot = Contact {
                position: point.position,
                penetration: point.penetration,
                id: point.id,
                accum_impulse: carried.map_or(0.0, |c| c.accum_impulse),
                accum_friction: carried.map_or(0.0, |c| c.accum_friction),
                ..Contact::default()
            };
        }
    }

    pub fn clear(&mut self) {
        self.contact_count = 0;
    }
}

impl PartialEq for Manifold {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for Manifold {}

impl Hash for Manifold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pair().hash(state);
    }
}
