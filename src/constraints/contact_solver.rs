//! Sequential-impulse contact solver: presolve, warm start and iterate.

use crate::collision::Manifold;
use crate::math::Vec2;
use crate::objects::RigidBody;

use super::get_mutable_body_pair;

/// Fraction of the penetration (beyond slop) removed per second of bias.
pub const BAUMGARTE: f64 = 0.2;
/// Penetration allowed without positional correction, in world units.
pub const SLOP: f64 = 0.01;
/// Approach speed above which restitution applies.
pub const RESTITUTION_THRESHOLD: f64 = 1.0;

/// Prepares every contact of `manifold` for this step: lever arms, effective
/// masses, the combined friction and the velocity bias.
pub fn presolve(manifold: &mut Manifold, bodies: &[RigidBody], inv_dt: f64) {
    let body_a = &bodies[manifold.index_a];
    let body_b = &bodies[manifold.index_b];
    let normal = manifold.normal;
    let tangent = normal.rotate_right();
    let position_a = body_a.position();
    let position_b = body_b.position();

    manifold.friction = (body_a.material.friction + body_b.material.friction) * 0.5;
    let restitution = body_a.material.restitution.min(body_b.material.restitution);

    for contact in manifold.contacts_mut() {
        contact.ra = contact.position - position_a;
        contact.rb = contact.position - position_b;

        contact.normal_mass = inverse_effective_mass(body_a, body_b, contact.ra, contact.rb, normal);
        contact.tangent_mass = inverse_effective_mass(body_a, body_b, contact.ra, contact.rb, tangent);

        let relative_velocity = body_b.velocity_at(contact.rb) - body_a.velocity_at(contact.ra);
        let vn = relative_velocity.dot(normal);

        let restitution_bias = if vn < -RESTITUTION_THRESHOLD { restitution * vn } else { 0.0 };
        let position_bias = BAUMGARTE * inv_dt * (-contact.penetration + SLOP).min(0.0);

        let mut velocity_bias = restitution_bias;
        if velocity_bias < position_bias {
            velocity_bias -= position_bias;
        }
        contact.bias = velocity_bias + position_bias;
    }
}

fn inverse_effective_mass(a: &RigidBody, b: &RigidBody, ra: Vec2, rb: Vec2, axis: Vec2) -> f64 {
    let rna = ra.cross(axis);
    let rnb = rb.cross(axis);
    let k = a.inv_mass() + b.inv_mass() + a.inv_inertia() * rna * rna + b.inv_inertia() * rnb * rnb;
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

/// Reapplies last frame's accumulated impulses to seed the iteration.
pub fn warm_start(manifold: &Manifold, bodies: &mut [RigidBody]) {
    let Some((body_a, body_b)) = get_mutable_body_pair(bodies, manifold.index_a, manifold.index_b) else {
        return;
    };
    let normal = manifold.normal;
    let tangent = normal.rotate_right();

    for contact in manifold.contacts() {
        if contact.penetration < 0.0 {
            continue;
        }
        let p = normal * contact.accum_impulse + tangent * contact.accum_friction;
        body_a.apply_impulse(-p, contact.ra);
        body_b.apply_impulse(p, contact.rb);
    }
}

/// One Gauss-Seidel pass over the contacts: friction first, then the normal
/// impulse, each clamped on its running total.
pub fn apply_impulse(manifold: &mut Manifold, bodies: &mut [RigidBody]) {
    let Some((body_a, body_b)) = get_mutable_body_pair(bodies, manifold.index_a, manifold.index_b) else {
        return;
    };
    let normal = manifold.normal;
    let tangent = normal.rotate_right();
    let friction = manifold.friction;

    for contact in manifold.contacts_mut() {
        // Separated contacts only carry their impulses to the next step.
        if contact.penetration < 0.0 {
            continue;
        }

        // Friction, bounded by the current normal impulse.
        let relative_velocity = body_b.velocity_at(contact.rb) - body_a.velocity_at(contact.ra);
        let vt = relative_velocity.dot(tangent);
        let lambda = -vt * contact.tangent_mass;
        let max_friction = contact.accum_impulse * friction;
        let old_friction = contact.accum_friction;
        contact.accum_friction = (old_friction + lambda).clamp(-max_friction, max_friction);
        let p = tangent * (contact.accum_friction - old_friction);
        body_a.apply_impulse(-p, contact.ra);
        body_b.apply_impulse(p, contact.rb);

        // Non-penetration.
        let relative_velocity = body_b.velocity_at(contact.rb) - body_a.velocity_at(contact.ra);
        let vn = relative_velocity.dot(normal);
        let lambda = -(vn + contact.bias) * contact.normal_mass;
        let old_impulse = contact.accum_impulse;
        contact.accum_impulse = (old_impulse + lambda).max(0.0);
        let p = normal * (contact.accum_impulse - old_impulse);
        body_a.apply_impulse(-p, contact.ra);
        body_b.apply_impulse(p, contact.rb);
    }
}

/// Runs presolve, warm start and `iterations` impulse passes over `manifolds`.
/// Trigger manifolds are skipped.
pub fn solve<'a, I>(manifolds: I, bodies: &mut [RigidBody], inv_dt: f64, iterations: usize)
where
    I: IntoIterator<Item = &'a mut Manifold>,
{
    let mut active: Vec<&mut Manifold> =
        manifolds.into_iter().filter(|m| !m.is_trigger && m.is_touching()).collect();

    for manifold in active.iter_mut() {
        presolve(manifold, bodies, inv_dt);
    }
    for manifold in active.iter() {
        warm_start(manifold, bodies);
    }
    for _ in 0..iterations {
        for manifold in active.iter_mut() {
            apply_impulse(manifold, bodies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::collide;
    use crate::common::Material;
    use crate::math::Transform;
    use crate::objects::{BodyHandle, Collider};
    use crate::shapes::{BoxShape, Circle, Shape};
    const EPSILON: f64 = 1e-6;
    /// Residual left by a few Gauss-Seidel passes on a resting box.
    const SOLVER_TOLERANCE: f64 = 1e-3;

    fn body(shape: Shape, material: Material, position: Vec2, is_static: bool) -> RigidBody {
        let collider = Collider::new(shape);
        let transform = Transform::new(position, 0.0);
        if is_static {
            RigidBody::new_static(collider, material, transform).unwrap()
        } else {
            RigidBody::new(collider, material, transform).unwrap()
        }
    }

    fn manifold_for(bodies: &[RigidBody]) -> Manifold {
        let (a, b) = (&bodies[0], &bodies[1]);
        let set = collide(
            a.collider().kind(),
            a.collider().world_shape().unwrap(),
            b.collider().kind(),
            b.collider().world_shape().unwrap(),
        );
        let mut m = Manifold::new(BodyHandle(0), BodyHandle(1));
        m.index_a = 0;
        m.index_b = 1;
        m.update(&set);
        m
    }

    #[test]
    fn test_elastic_circles_exchange_velocities() {
        let bouncy = Material::new(1.0, 0.0, 1.0).unwrap();
        let circle = Shape::Circle(Circle::new(1.0).unwrap());
        let mut bodies = vec![
            body(circle.clone(), bouncy, Vec2::new(-1.0, 0.0), false),
            body(circle, bouncy, Vec2::new(1.0, 0.0), false),
        ];
        bodies[0].set_velocity(Vec2::new(3.0, 0.0));
        bodies[1].set_velocity(Vec2::new(-3.0, 0.0));

        let mut m = manifold_for(&bodies);
        assert_eq!(m.contact_count(), 1);
        solve([&mut m], &mut bodies, 60.0, 8);

        assert!((bodies[0].linear_velocity.x + 3.0).abs() < EPSILON);
        assert!((bodies[1].linear_velocity.x - 3.0).abs() < EPSILON);
        assert!(bodies[0].linear_velocity.y.abs() < EPSILON);
    }

    #[test]
    fn test_slow_approach_does_not_bounce() {
        // Below the restitution threshold the contact is treated as resting.
        let bouncy = Material::new(1.0, 0.0, 1.0).unwrap();
        let circle = Shape::Circle(Circle::new(1.0).unwrap());
        let mut bodies = vec![
            body(circle.clone(), bouncy, Vec2::new(-1.0, 0.0), false),
            body(circle, bouncy, Vec2::new(1.0, 0.0), false),
        ];
        bodies[0].set_velocity(Vec2::new(0.25, 0.0));
        bodies[1].set_velocity(Vec2::new(-0.25, 0.0));

        let mut m = manifold_for(&bodies);
        solve([&mut m], &mut bodies, 60.0, 8);
        assert!(bodies[0].linear_velocity.x.abs() < EPSILON);
        assert!(bodies[1].linear_velocity.x.abs() < EPSILON);
    }

    #[test]
    fn test_static_body_is_unaffected() {
        let material = Material::new(1.0, 0.5, 0.0).unwrap();
        let mut bodies = vec![
            body(Shape::Box(BoxShape::new(1.0, 1.0).unwrap()), material, Vec2::new(0.0, 1.0), false),
            body(Shape::Box(BoxShape::new(10.0, 1.0).unwrap()), material, Vec2::ZERO, true),
        ];
        bodies[0].set_velocity(Vec2::new(0.0, -2.0));
        let mut m = manifold_for(&bodies);
        assert_eq!(m.contact_count(), 2);
        solve([&mut m], &mut bodies, 60.0, 8);

        assert!(bodies[0].linear_velocity.y.abs() < SOLVER_TOLERANCE);
        assert!(bodies[0].linear_velocity.x.abs() < SOLVER_TOLERANCE);
        assert!(bodies[0].angular_velocity.abs() < SOLVER_TOLERANCE);
        assert_eq!(bodies[1].linear_velocity, Vec2::ZERO);
        assert_eq!(bodies[1].angular_velocity, 0.0);
        assert!(m.contacts().iter().all(|c| c.accum_impulse >= 0.0));
    }

    #[test]
    fn test_friction_is_bounded_by_normal_impulse() {
        let material = Material::new(1.0, 0.2, 0.0).unwrap();
        let mut bodies = vec![
            body(Shape::Box(BoxShape::new(1.0, 1.0).unwrap()), material, Vec2::new(0.0, 1.0), false),
            body(Shape::Box(BoxShape::new(10.0, 1.0).unwrap()), material, Vec2::ZERO, true),
        ];
        bodies[0].set_velocity(Vec2::new(5.0, -0.5));
        let mut m = manifold_for(&bodies);
        solve([&mut m], &mut bodies, 60.0, 8);

        for c in m.contacts() {
            assert!(c.accum_friction.abs() <= c.accum_impulse * m.friction + EPSILON);
        }
        // Sliding slowed but not stopped.
        assert!(bodies[0].linear_velocity.x > 0.0);
        assert!(bodies[0].linear_velocity.x < 5.0);
    }

    #[test]
    fn test_warm_start_is_idempotent_at_rest() {
        let material = Material::new(1.0, 0.5, 0.0).unwrap();
        let mut bodies = vec![
            body(Shape::Box(BoxShape::new(1.0, 1.0).unwrap()), material, Vec2::new(0.0, 1.0), false),
            body(Shape::Box(BoxShape::new(10.0, 1.0).unwrap()), material, Vec2::ZERO, true),
        ];
        let dt = 1.0 / 60.0;
        let gravity = Vec2::new(0.0, -9.81);
        let mut m = manifold_for(&bodies);

        let step = |bodies: &mut Vec<RigidBody>, m: &mut Manifold| -> Vec<f64> {
            let velocity = bodies[0].linear_velocity + gravity * dt;
            bodies[0].set_velocity(velocity);
            solve([&mut *m], bodies, 1.0 / dt, 8);
            m.contacts().iter().map(|c| c.accum_impulse).collect()
        };

        // Let the carried impulses settle before comparing consecutive steps.
        let mut previous = step(&mut bodies, &mut m);
        for _ in 0..7 {
            previous = step(&mut bodies, &mut m);
        }
        assert!(previous.iter().sum::<f64>() > 0.0);

        let next = step(&mut bodies, &mut m);
        assert_eq!(previous.len(), next.len());
        for (a, b) in previous.iter().zip(&next) {
            assert!((a - b).abs() < 1e-4);
        }
        assert!(bodies[0].linear_velocity.magnitude() < SOLVER_TOLERANCE);
    }

    #[test]
    fn test_separated_contact_is_carried_but_not_solved() {
        let material = Material::default();
        let circle = Shape::Circle(Circle::new(1.0).unwrap());
        let mut bodies = vec![
            body(circle.clone(), material, Vec2::new(-1.005, 0.0), false),
            body(circle, material, Vec2::new(1.005, 0.0), false),
        ];
        bodies[0].set_velocity(Vec2::new(1.0, 0.0));
        let mut m = manifold_for(&bodies);
        assert_eq!(m.contact_count(), 1);
        assert!((m.contacts()[0].penetration + 0.01).abs() < EPSILON);
        assert!(!m.is_touching());
        m.contacts_mut()[0].accum_impulse = 0.5;

        presolve(&mut m, &bodies, 60.0);
        warm_start(&m, &mut bodies);
        apply_impulse(&mut m, &mut bodies);
        solve([&mut m], &mut bodies, 60.0, 8);

        assert_eq!(bodies[0].linear_velocity, Vec2::new(1.0, 0.0));
        assert_eq!(bodies[1].linear_velocity, Vec2::ZERO);
        assert!((m.contacts()[0].accum_impulse - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_triggers_are_not_solved() {
        let material = Material::default();
        let circle = Shape::Circle(Circle::new(1.0).unwrap());
        let mut bodies = vec![
            body(circle.clone(), material, Vec2::new(-0.5, 0.0), false),
            body(circle, material, Vec2::new(0.5, 0.0), false),
        ];
        bodies[0].set_velocity(Vec2::new(2.0, 0.0));
        let mut m = manifold_for(&bodies);
        m.is_trigger = true;
        solve([&mut m], &mut bodies, 60.0, 8);
        assert_eq!(bodies[0].linear_velocity, Vec2::new(2.0, 0.0));
    }
}
