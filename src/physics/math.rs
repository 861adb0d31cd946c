/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions, velocities, and forces in the simulation plane
pub type Vector = bevy::math::DVec2;

use crate::physics::field::FieldModel;

/// Kinetic energy ½mv²
#[inline]
pub fn kinetic_energy(mass: Scalar, velocity: Vector) -> Scalar {
    0.5 * mass * velocity.length_squared()
}

/// Larmor radius r = m|v| / (|q| |B|)
///
/// Returns `None` when the particle is uncharged or the field vanishes, since
/// the particle then never gyrates.
pub fn gyroradius(charge: Scalar, mass: Scalar, speed: Scalar, bz: Scalar) -> Option<Scalar> {
    if charge == 0.0 || bz == 0.0 {
        return None;
    }
    Some(mass * speed.abs() / (charge.abs() * bz.abs()))
}

/// Check a measured orbit radius against r = mv / (|q|B)
///
/// `true` when the relative error is strictly below `tolerance`.
pub fn validate_circular_motion(
    charge: Scalar,
    mass: Scalar,
    speed: Scalar,
    bz: Scalar,
    radius: Scalar,
    tolerance: Scalar,
) -> bool {
    let Some(expected) = gyroradius(charge, mass, speed, bz) else {
        return false;
    };
    if expected == 0.0 {
        return radius == 0.0;
    }
    ((radius - expected) / expected).abs() < tolerance
}

/// Center of gyration for a particle in a purely perpendicular magnetic field
///
/// For angular frequency ω = qBz/m the particle circles clockwise when ω > 0,
/// and the center sits at x + (vy, -vx)/ω.
pub fn guiding_center(
    position: Vector,
    velocity: Vector,
    charge: Scalar,
    mass: Scalar,
    bz: Scalar,
) -> Option<Vector> {
    if charge == 0.0 || bz == 0.0 {
        return None;
    }
    let omega = charge * bz / mass;
    Some(position + Vector::new(velocity.y, -velocity.x) / omega)
}

/// Classical E×B drift velocity E×B / B² restricted to the plane
pub fn drift_velocity(field: &FieldModel) -> Option<Vector> {
    let bz = field.bz();
    if bz == 0.0 {
        return None;
    }
    let e = field.electric_vector();
    Some(Vector::new(e.y / bz, -e.x / bz))
}
