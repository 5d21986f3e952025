use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace, warn};

use crate::collision::{collide, raycast_shape, BodyPair, ContactSet, Manifold, SpatialHashGrid, AABB};
use crate::constraints::solve;
use crate::debug::{DebugColor, DebugDraw, DebugDrawFlags};
use crate::error::{PhysicsError, Result};
use crate::integration::integrator;
use crate::math::{Ray, Vec2};
use crate::objects::{BodyHandle, LayerMatrix, RigidBody};
use crate::shapes::{Shape, WorldShape};

use super::config::{BroadphaseMode, WorldConfig, DEFAULT_GRAVITY};
use super::events::CollisionEvents;

/// Radius of the marker drawn at each contact point.
const CONTACT_MARKER_RADIUS: f64 = 0.05;
/// Length of the drawn contact normals.
const CONTACT_NORMAL_LENGTH: f64 = 0.25;

/// Closest body hit by a world raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub body: BodyHandle,
    pub point: Vec2,
    /// Surface normal at `point`, facing the ray.
    pub normal: Vec2,
    pub distance: f64,
}

/// Owns the bodies, their contact manifolds and the broad-phase, and advances
/// them with [`PhysicsWorld::step`].
#[derive(Debug)]
pub struct PhysicsWorld {
    config: WorldConfig,
    gravity: Vec2,
    // Dense storage; `handles[i]` owns `bodies[i]` and `slots` maps back.
    bodies: Vec<RigidBody>,
    handles: Vec<BodyHandle>,
    slots: HashMap<BodyHandle, usize>,
    next_handle: u32,
    broadphase: SpatialHashGrid,
    manifolds: BTreeMap<BodyPair, Manifold>,
    touching: BTreeSet<BodyPair>,
    events: CollisionEvents,
}

impl PhysicsWorld {
    /// Creates a new, empty physics world with default settings.
    pub fn new() -> Self {
        Self::build(WorldConfig::default(), SpatialHashGrid::default())
    }

    /// Creates an empty world. Fails if the broad-phase cell size is invalid.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        let broadphase = SpatialHashGrid::new(config.cell_size)?;
        Ok(Self::build(config, broadphase))
    }

    fn build(config: WorldConfig, broadphase: SpatialHashGrid) -> Self {
        Self {
            gravity: config.gravity,
            config,
            bodies: Vec::new(),
            handles: Vec::new(),
            slots: HashMap::new(),
            next_handle: 0,
            broadphase,
            manifolds: BTreeMap::new(),
            touching: BTreeSet::new(),
            events: CollisionEvents::default(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn set_solver_iterations(&mut self, iterations: usize) {
        self.config.solver_iterations = iterations;
    }

    pub fn layer_matrix(&self) -> &LayerMatrix {
        &self.config.layer_matrix
    }

    /// Layer changes apply from the next step; manifolds between layers that
    /// stop colliding are dropped then.
    pub fn layer_matrix_mut(&mut self) -> &mut LayerMatrix {
        &mut self.config.layer_matrix
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    /// Restores [`DEFAULT_GRAVITY`].
    pub fn reset_gravity(&mut self) {
        self.gravity = DEFAULT_GRAVITY;
    }

    /// Adds a rigid body to the world and returns its handle.
    pub fn add_body(&mut self, mut body: RigidBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        body.sync();
        self.slots.insert(handle, self.bodies.len());
        self.handles.push(handle);
        self.bodies.push(body);
        debug!(body = %handle, count = self.bodies.len(), "body added");
        handle
    }

    /// Removes a body and every manifold it takes part in, handing the body
    /// back detached. Pairs it was touching show up as exited on the next step.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let slot = self.slots.remove(&handle).ok_or(PhysicsError::UnknownBody(handle))?;
        if self.broadphase.is_tracked(handle) {
            self.broadphase.remove(handle)?;
        }

        let mut body = self.bodies.swap_remove(slot);
        self.handles.swap_remove(slot);
        if let Some(moved) = self.handles.get(slot) {
            self.slots.insert(*moved, slot);
        }

        self.manifolds.retain(|pair, _| {
            let keep = !pair.contains(handle);
            if !keep {
                debug!(body_a = %pair.first(), body_b = %pair.second(), "manifold destroyed");
            }
            keep
        });

        body.detach();
        debug!(body = %handle, count = self.bodies.len(), "body removed");
        Ok(body)
    }

    /// Removes every body and manifold. Handles are still never reused.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.handles.clear();
        self.slots.clear();
        self.broadphase.clear();
        self.manifolds.clear();
        self.touching.clear();
        self.events.clear();
        debug!("world cleared");
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots.get(&handle).map(|&slot| &self.bodies[slot])
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots.get(&handle).map(|&slot| &mut self.bodies[slot])
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.handles.iter().copied().zip(self.bodies.iter())
    }

    /// Active manifolds in body-pair order, touching or not.
    pub fn manifolds(&self) -> impl Iterator<Item = &Manifold> {
        self.manifolds.values()
    }

    pub fn manifold(&self, a: BodyHandle, b: BodyHandle) -> Option<&Manifold> {
        self.manifolds.get(&BodyPair::new(a, b))
    }

    /// Contact changes produced by the last step.
    pub fn events(&self) -> &CollisionEvents {
        &self.events
    }

    pub fn broadphase(&self) -> &SpatialHashGrid {
        &self.broadphase
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// A non-positive `dt` is ignored; a non-finite one is an error.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        if dt <= 0.0 {
            warn!(dt, "ignoring non-positive time step");
            return Ok(());
        }
        let inv_dt = 1.0 / dt;

        // 1. Integrate forces (update velocities)
        for body in &mut self.bodies {
            integrator::integrate_forces(body, self.gravity, dt);
        }

        // 2. Broad-phase
        self.sync_bodies();
        let pairs = self.find_pairs()?;

        // 3. Create, reuse and drop manifolds
        self.update_manifolds(&pairs);

        // 4. Narrow-phase
        for manifold in self.manifolds.values_mut() {
            let a = self.bodies[manifold.index_a].collider();
            let b = self.bodies[manifold.index_b].collider();
            let set = match (a.world_shape(), b.world_shape()) {
                (Some(shape_a), Some(shape_b)) => collide(a.kind(), shape_a, b.kind(), shape_b),
                _ => ContactSet::empty(),
            };
            manifold.update(&set);
        }

        // 5. Solve contacts
        solve(self.manifolds.values_mut(), &mut self.bodies, inv_dt, self.config.solver_iterations);

        // 6. Integrate velocities (update positions)
        for body in &mut self.bodies {
            integrator::integrate_velocities(body, dt);
        }

        // 7. Collision events
        let touching: BTreeSet<BodyPair> =
            self.manifolds.iter().filter(|(_, m)| m.is_touching()).map(|(pair, _)| *pair).collect();
        self.events = CollisionEvents::diff(&self.touching, &touching);
        self.touching = touching;

        trace!(
            bodies = self.bodies.len(),
            pairs = pairs.len(),
            touching = self.touching.len(),
            entered = self.events.entered.len(),
            exited = self.events.exited.len(),
            "step complete"
        );
        Ok(())
    }

    /// Rebuilds the cached world geometry of every body whose transform changed.
    pub fn sync_bodies(&mut self) {
        for body in &mut self.bodies {
            body.sync();
        }
    }

    /// Candidate pairs with overlapping AABBs, excluding static-static pairs
    /// and pairs on layers that do not collide. Sorted.
    fn find_pairs(&mut self) -> Result<Vec<BodyPair>> {
        let bodies = &self.bodies;
        let slots = &self.slots;
        let matrix = &self.config.layer_matrix;

        match self.config.broadphase {
            BroadphaseMode::SpatialHash => {
                let entries: Vec<(BodyHandle, AABB)> =
                    self.handles.iter().zip(bodies).map(|(h, b)| (*h, b.collider().aabb())).collect();
                self.broadphase.update(&entries)?;
                Ok(self.broadphase.query_potential_pairs(|a, b| match (slots.get(&a), slots.get(&b)) {
                    (Some(&ia), Some(&ib)) => should_collide(&bodies[ia], &bodies[ib], matrix),
                    _ => false,
                }))
            }
            BroadphaseMode::BruteForce => {
                let mut pairs = Vec::new();
                for i in 0..bodies.len() {
                    for j in (i + 1)..bodies.len() {
                        let (a, b) = (&bodies[i], &bodies[j]);
                        if a.collider().aabb().overlaps(&b.collider().aabb()) && should_collide(a, b, matrix) {
                            pairs.push(BodyPair::new(self.handles[i], self.handles[j]));
                        }
                    }
                }
                pairs.sort();
                Ok(pairs)
            }
        }
    }

    fn update_manifolds(&mut self, pairs: &[BodyPair]) {
        let live: BTreeSet<BodyPair> = pairs.iter().copied().collect();
        self.manifolds.retain(|pair, _| {
            let keep = live.contains(pair);
            if !keep {
                debug!(body_a = %pair.first(), body_b = %pair.second(), "manifold destroyed");
            }
            keep
        });

        for pair in pairs {
            let (Some(&index_a), Some(&index_b)) = (self.slots.get(&pair.first()), self.slots.get(&pair.second()))
            else {
                continue;
            };
            let manifold = self.manifolds.entry(*pair).or_insert_with(|| {
                debug!(body_a = %pair.first(), body_b = %pair.second(), "manifold created");
                Manifold::new(pair.first(), pair.second())
            });
            manifold.index_a = index_a;
            manifold.index_b = index_b;
            manifold.is_trigger =
                self.bodies[index_a].collider().is_trigger() || self.bodies[index_b].collider().is_trigger();
        }
    }

    /// Casts a ray against every non-trigger body and returns the closest hit.
    /// Bodies the ray starts inside are not reported.
    pub fn raycast(&mut self, origin: Vec2, direction: Vec2, max_distance: f64) -> Option<RaycastHit> {
        self.raycast_with_mask(origin, direction, max_distance, u32::MAX)
    }

    /// Like [`PhysicsWorld::raycast`], limited to bodies whose layer bit is set in `mask`.
    pub fn raycast_with_mask(
        &mut self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f64,
        mask: u32,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(origin, direction, max_distance)?;
        self.sync_bodies();

        let mut closest: Option<RaycastHit> = None;
        for (handle, body) in self.bodies() {
            let collider = body.collider();
            if collider.is_trigger() || collider.layer().mask() & mask == 0 {
                continue;
            }
            let Some(entry) = collider.aabb().ray_entry(&ray) else {
                continue;
            };
            if closest.is_some_and(|hit| entry > hit.distance) {
                continue;
            }
            let Some(hit) = collider.world_shape().and_then(|shape| raycast_shape(shape, &ray)) else {
                continue;
            };
            if closest.map_or(true, |best| hit.distance < best.distance) {
                closest = Some(RaycastHit { body: handle, point: hit.point, normal: hit.normal, distance: hit.distance });
            }
        }
        closest
    }

    /// Emits debug geometry for the current state through `drawer`.
    pub fn debug_draw(&mut self, drawer: &mut dyn DebugDraw, flags: DebugDrawFlags) {
        self.sync_bodies();

        if flags.broadphase_cells {
            let size = self.broadphase.cell_size();
            let half = Vec2::new(size * 0.5, size * 0.5);
            for ((x, y), _) in self.broadphase.occupied_cells() {
                let min = Vec2::new(x as f64 * size, y as f64 * size);
                drawer.draw_box(min + half, half, 0.0, DebugColor::CELL);
            }
        }

        for body in &self.bodies {
            let collider = body.collider();
            if flags.shapes {
                let color = if collider.is_trigger() {
                    DebugColor::TRIGGER
                } else if body.is_static() {
                    DebugColor::STATIC_BODY
                } else {
                    DebugColor::DYNAMIC_BODY
                };
                draw_body(drawer, body, color);
            }
            if flags.aabbs {
                let aabb = collider.aabb();
                drawer.draw_box(aabb.center(), aabb.half_extents(), 0.0, DebugColor::AABB);
            }
        }

        if flags.contacts {
            for manifold in self.manifolds.values() {
                for contact in manifold.contacts() {
                    drawer.draw_circle(contact.position, CONTACT_MARKER_RADIUS, DebugColor::CONTACT);
                    drawer.draw_line(
                        contact.position,
                        contact.position + manifold.normal * CONTACT_NORMAL_LENGTH,
                        DebugColor::NORMAL,
                    );
                }
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn should_collide(a: &RigidBody, b: &RigidBody, matrix: &LayerMatrix) -> bool {
    if a.is_static() && b.is_static() {
        return false;
    }
    matrix.collides(a.collider().layer(), b.collider().layer())
}

fn draw_body(drawer: &mut dyn DebugDraw, body: &RigidBody, color: DebugColor) {
    let Some(shape) = body.collider().world_shape() else {
        return;
    };
    match (body.collider().shape(), shape) {
        (Shape::Box(b), _) => {
            let scale = body.transform.world_scale();
            let half = b.half_extents();
            let half = Vec2::new(half.x * scale.x.abs(), half.y * scale.y.abs());
            drawer.draw_box(body.position(), half, body.rotation(), color);
        }
        (_, WorldShape::Circle { center, radius }) => {
            drawer.draw_circle(*center, *radius, color);
            // Orientation marker
            let spoke = body.transform.local_to_world_vector(Vec2::RIGHT).normalize() * *radius;
            drawer.draw_line(*center, *center + spoke, color);
        }
        (_, WorldShape::Capsule { a, b, radius }) => drawer.draw_capsule(*a, *b, *radius, color),
        (_, WorldShape::Polygon { vertices, .. }) => drawer.draw_polygon(vertices, color),
    }
}
