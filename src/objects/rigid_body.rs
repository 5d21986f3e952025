use std::fmt;

use crate::common::Material;
use crate::error::{PhysicsError, Result};
use crate::math::{Transform, Vec2};

use super::collider::Collider;

/// Masses below this are treated as zero.
const MIN_MASS: f64 = 1e-10;

/// Opaque, copyable identifier of a body inside a world. Handles are handed
/// out in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

impl BodyHandle {
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    // Placement; the world position is the center of mass.
    pub transform: Transform,
    collider: Collider,
    pub material: Material,

    // Primary state
    pub linear_velocity: Vec2,
    pub angular_velocity: f64, // Radians per second

    // Accumulators for forces/torques applied during a time step
    pub force: Vec2,
    pub torque: f64,

    // Physical properties, derived once from shape and density
    mass: f64,
    inv_mass: f64, // 1.0 / mass (0.0 for static)
    inertia: f64,
    inv_inertia: f64, // 1.0 / inertia (0.0 for static / infinite inertia)
    is_static: bool,
}

impl RigidBody {
    /// Creates a dynamic body. Mass is `shape area * density`; inertia comes
    /// from the shape. Both use the unscaled local shape.
    pub fn new(collider: Collider, material: Material, transform: Transform) -> Result<Self> {
        let area = collider.shape().area();
        let mass = area * material.density;
        if !(mass > MIN_MASS) || !mass.is_finite() {
            return Err(PhysicsError::DegenerateMass { area, density: material.density });
        }
        let inertia = collider.shape().moment_of_inertia(mass);

        let mut body = Self {
            transform,
            collider,
            material,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass,
            inv_mass: 0.0,
            inertia,
            inv_inertia: 0.0,
            is_static: false,
        };
        body.update_inverses();
        body.sync();
        Ok(body)
    }

    /// Creates a body that never moves. Its mass and inertia are still derived
    /// so that it can later be made dynamic with [`RigidBody::set_static`].
    pub fn new_static(collider: Collider, material: Material, transform: Transform) -> Result<Self> {
        let mut body = Self::new(collider, material, transform)?;
        body.set_static();
        Ok(body)
    }

    fn update_inverses(&mut self) {
        if self.is_static {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
        } else {
            self.inv_mass = 1.0 / self.mass;
            self.inv_inertia = if self.inertia > 0.0 && self.inertia.is_finite() { 1.0 / self.inertia } else { 0.0 };
        }
    }

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    /// Mutable collider access; the cached world geometry is refreshed on the next sync.
    pub fn collider_mut(&mut self) -> &mut Collider {
        self.collider.mark_dirty();
        &mut self.collider
    }

    pub(crate) fn detach(&mut self) {
        self.collider.detach();
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Toggles the static flag. Static bodies get zero inverse mass and
    /// inertia; switching back restores them from the stored mass and inertia.
    pub fn set_static(&mut self) {
        self.is_static = !self.is_static;
        if self.is_static {
            self.linear_velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }
        self.update_inverses();
    }

    /// World position of the center of mass.
    pub fn position(&self) -> Vec2 {
        self.transform.world_position()
    }

    /// World rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.transform.world_rotation()
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.set_world_position(position);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.transform.set_world_rotation(degrees);
    }

    /// Applies a force at the center of mass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Applies a force at a specific point (in world coordinates).
    /// This generates both linear force and torque.
    pub fn apply_force_at_point(&mut self, force: Vec2, point_world: Vec2) {
        self.force += force;
        let radius_vector = point_world - self.position();
        self.torque += radius_vector.cross(force);
    }

    pub fn add_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.linear_velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Scales the linear velocity down so its magnitude does not exceed `max`.
    pub fn clamp_velocity(&mut self, max: f64) {
        let max = max.max(0.0);
        let speed = self.linear_velocity.magnitude();
        if speed > max {
            self.linear_velocity = self.linear_velocity * (max / speed);
        }
    }

    pub fn clamp_angular_velocity(&mut self, max: f64) {
        let max = max.max(0.0);
        self.angular_velocity = self.angular_velocity.clamp(-max, max);
    }

    /// Velocity of the material point at offset `r` from the center of mass.
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.linear_velocity + Vec2::cross_scalar(self.angular_velocity, r)
    }

    /// Applies an impulse at offset `r` from the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * r.cross(impulse);
    }

    /// Should typically be called after integration in each simulation step.
    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Propagates transform changes to the collider's cached world geometry.
    /// Returns whether the geometry was rebuilt.
    pub fn sync(&mut self) -> bool {
        if self.transform.take_dirty() {
            self.collider.mark_dirty();
        }
        self.collider.refresh(&self.transform)
    }
}
