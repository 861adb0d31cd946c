//! Numerical integration methods for charged particle motion
//!
//! The Lorentz force depends on velocity but never on position, so the
//! acceleration field an integrator probes is a function of trial velocity.

use crate::components::trail::TrailCapacity;
use crate::physics::components::Particle;
use crate::physics::field::FieldModel;
use crate::physics::force::LorentzAcceleration;
use crate::physics::math::{Scalar, Vector};

pub mod explicit_euler;
pub mod registry;
pub mod runge_kutta;

pub use explicit_euler::ExplicitEuler;
pub use registry::IntegratorRegistry;
pub use runge_kutta::{RungeKuttaFourthOrder, RungeKuttaFourthOrderCoupled};

/// Acceleration as a function of the particle's (trial) velocity
pub trait AccelerationField {
    fn at(&self, velocity: Vector) -> Vector;
}

/// Base trait for all integrators
///
/// Integrators are stateless; each one describes itself so the registry can
/// index it by name and aliases.
pub trait Integrator: Send + Sync {
    fn clone_box(&self) -> Box<dyn Integrator>;

    /// Advance one particle's kinematic state by `dt`
    ///
    /// There is no error path. A zero `dt` leaves the state unchanged and a
    /// negative one runs the scheme backwards.
    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    );

    /// Order of the global truncation error
    fn convergence_order(&self) -> usize;

    fn name(&self) -> &'static str;

    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

impl Clone for Box<dyn Integrator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Integrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Integrator({})", self.name())
    }
}

/// One integrator step for one particle, followed by a trail append
///
/// The particle's charge and mass define the acceleration field; `field` is
/// shared read-only by every particle advanced in the same tick.
pub fn advance_particle(
    integrator: &dyn Integrator,
    particle: &mut Particle,
    field: &FieldModel,
    dt: Scalar,
    capacity: TrailCapacity,
) {
    let acceleration = LorentzAcceleration::new(particle.charge(), particle.mass(), field);
    let (position, velocity) = particle.kinematics_mut();
    integrator.step(position, velocity, &acceleration, dt);

    let new_position = *position;
    particle.trail_mut().push(new_position, capacity);
}
