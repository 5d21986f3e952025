use crate::math::Vec2;
use crate::objects::RigidBody;

/// Semi-implicit Euler, first half: forces and gravity update the velocities,
/// then damping scales them down. Clears the force/torque accumulators.
pub fn integrate_forces(body: &mut RigidBody, gravity: Vec2, dt: f64) {
    if body.is_static() {
        // Static object, do not integrate
        body.clear_accumulators();
        return;
    }

    // v = v + (g + F/m) * dt
    let linear_acceleration = gravity + body.force * body.inv_mass();
    body.linear_velocity += linear_acceleration * dt;
    // omega = omega + (T/I) * dt
    body.angular_velocity += body.torque * body.inv_inertia() * dt;

    body.linear_velocity *= 1.0 / (1.0 + dt * body.material.linear_damping);
    body.angular_velocity *= 1.0 / (1.0 + dt * body.material.angular_damping);

    body.clear_accumulators();
}

/// Semi-implicit Euler, second half: the solved velocities move the body.
pub fn integrate_velocities(body: &mut RigidBody, dt: f64) {
    if body.is_static() {
        return;
    }

    let position = body.position() + body.linear_velocity * dt;
    body.set_position(position);

    // Angular velocity is in rad/s, the transform stores degrees.
    let rotation = body.rotation() + (body.angular_velocity * dt).to_degrees();
    body.set_rotation(wrap_degrees(rotation));
}

/// Wraps an angle in degrees to the range [-180, 180].
fn wrap_degrees(angle: f64) -> f64 {
    let radians = angle.to_radians();
    radians.sin().atan2(radians.cos()).to_degrees()
}
