//! Particle state

use crate::components::trail::Trail;
use crate::error::{ValidationError, ensure_finite};
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-unique particle identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleId(String);

impl ParticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ParticleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinematic record for one charged particle
///
/// Charge and mass are fixed at creation. Position, velocity and trail
/// change only through the integrator; `selected` only through selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: ParticleId,
    charge: Scalar,
    mass: Scalar,
    position: Vector,
    velocity: Vector,
    trail: Trail,
    selected: bool,
}

impl Particle {
    /// Validates every input; zero or negative mass is rejected
    pub fn new(
        id: ParticleId,
        charge: Scalar,
        mass: Scalar,
        position: Vector,
        velocity: Vector,
    ) -> Result<Self, ValidationError> {
        let charge = ensure_finite("charge", charge)?;
        let mass = ensure_finite("mass", mass)?;
        if mass <= 0.0 {
            return Err(ValidationError::NonPositiveMass(mass));
        }
        ensure_finite("x", position.x)?;
        ensure_finite("y", position.y)?;
        ensure_finite("vx", velocity.x)?;
        ensure_finite("vy", velocity.y)?;

        Ok(Self {
            id,
            charge,
            mass,
            position,
            velocity,
            trail: Trail::new(),
            selected: false,
        })
    }

    #[inline]
    pub fn id(&self) -> &ParticleId {
        &self.id
    }

    #[inline]
    pub fn charge(&self) -> Scalar {
        self.charge
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    #[inline]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn kinematics_mut(&mut self) -> (&mut Vector, &mut Vector) {
        (&mut self.position, &mut self.velocity)
    }

    pub(crate) fn trail_mut(&mut self) -> &mut Trail {
        &mut self.trail
    }

    pub(crate) fn toggle_selected(&mut self) -> bool {
        self.selected = !self.selected;
        self.selected
    }
}
