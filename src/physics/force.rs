//! Planar Lorentz force
//!
//! With the magnetic field restricted to the z axis, F = q(E + v × B)
//! reduces to
//!
//! ```text
//! Fx = q · (Ex + vy · Bz)
//! Fy = q · (Ey − vx · Bz)
//! ```

use crate::physics::field::FieldModel;
use crate::physics::integrators::AccelerationField;
use crate::physics::math::{Scalar, Vector};

/// Instantaneous Lorentz force on a charge moving with `velocity`
///
/// Pure: depends only on its arguments, never on mass or position.
#[inline]
pub fn lorentz_force(charge: Scalar, velocity: Vector, field: &FieldModel) -> Vector {
    let e = field.electric_vector();
    let bz = field.bz();
    Vector::new(
        charge * (e.x + velocity.y * bz),
        charge * (e.y - velocity.x * bz),
    )
}

/// Acceleration seen by one particle, evaluated at trial velocities
///
/// Borrows the field so every stage of every particle in a step reads the
/// same `FieldModel`.
#[derive(Debug, Clone, Copy)]
pub struct LorentzAcceleration<'a> {
    pub charge: Scalar,
    pub mass: Scalar,
    pub field: &'a FieldModel,
}

impl<'a> LorentzAcceleration<'a> {
    pub fn new(charge: Scalar, mass: Scalar, field: &'a FieldModel) -> Self {
        Self {
            charge,
            mass,
            field,
        }
    }
}

impl AccelerationField for LorentzAcceleration<'_> {
    #[inline]
    fn at(&self, velocity: Vector) -> Vector {
        lorentz_force(self.charge, velocity, self.field) / self.mass
    }
}
