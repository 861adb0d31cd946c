//! Explicit Euler integration method (forward Euler)
//!
//! Offered for batch simulations that ask for "Euler". Under a pure magnetic
//! field it does not conserve speed: every step multiplies |v| by
//! sqrt(1 + (ω·dt)²), so orbits spiral outward.

use super::{AccelerationField, Integrator};
use crate::physics::math::{Scalar, Vector};

/// Explicit Euler integrator
///
/// ```text
/// x(t+dt) = x(t) + v(t) * dt
/// v(t+dt) = v(t) + a(v(t)) * dt
/// ```
///
/// Position is updated with the velocity from the start of the step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(
        &self,
        position: &mut Vector,
        velocity: &mut Vector,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) {
        let current_velocity = *velocity;
        let acceleration = field.at(current_velocity);

        *position += current_velocity * dt;
        *velocity += acceleration * dt;
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "euler"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["Euler", "explicit_euler", "forward_euler"]
    }
}
