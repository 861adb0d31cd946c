//! In-process batch simulation
//!
//! Runs a whole [`SimulationRequest`] from `t0` to `t_final` and returns
//! every intermediate sample, exactly as a simulation service would.

use super::SimulationTransport;
use super::protocol::{
    ParticleSamples, ResponseData, ResponseMeta, SimulationRequest, SimulationResponse,
};
use crate::error::{SimulationError, ValidationError, ensure_finite};
use crate::physics::field::FieldModel;
use crate::physics::force::LorentzAcceleration;
use crate::physics::integrators::{AccelerationField, Integrator, IntegratorRegistry};
use crate::physics::math::{Scalar, Vector};
use crate::scene::FieldsDocument;
use bevy::log::debug;
use std::collections::BTreeMap;

/// Request limits enforced before any integration happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchLimits {
    /// Longest span `t_final - t0` a single request may cover
    pub max_duration: Scalar,
    pub min_dt: Scalar,
    pub max_particles: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_duration: 100.0,
            min_dt: 1e-4,
            max_particles: 100,
        }
    }
}

/// Number of samples from `t0` through `t_final` inclusive, spaced by `dt`
///
/// When `dt` does not divide the span, the last sample is the last multiple
/// of `dt` before `t_final`; no sample lies past `t_final`.
/// The small slack keeps `t_final` itself when `(t_final - t0) / dt` lands a
/// hair below an integer through rounding.
pub fn sample_count(t0: Scalar, t_final: Scalar, dt: Scalar) -> usize {
    ((t_final - t0) / dt + 1e-9).floor() as usize + 1
}

fn check_range(
    name: &'static str,
    value: Scalar,
    min: Scalar,
    max: Scalar,
) -> Result<(), ValidationError> {
    ensure_finite(name, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn validate_request(request: &SimulationRequest, limits: &BatchLimits) -> Result<(), ValidationError> {
    ensure_finite("t0", request.t0)?;
    ensure_finite("t_final", request.t_final)?;
    ensure_finite("dt", request.dt)?;

    let duration = request.t_final - request.t0;
    if duration <= 0.0 || duration > limits.max_duration {
        return Err(ValidationError::OutOfRange {
            name: "t_final - t0",
            value: duration,
            min: 0.0,
            max: limits.max_duration,
        });
    }
    if request.dt < limits.min_dt || request.dt <= 0.0 {
        return Err(ValidationError::OutOfRange {
            name: "dt",
            value: request.dt,
            min: limits.min_dt,
            max: Scalar::INFINITY,
        });
    }
    if request.particles.len() > limits.max_particles {
        return Err(ValidationError::OutOfRange {
            name: "particle count",
            value: request.particles.len() as Scalar,
            min: 0.0,
            max: limits.max_particles as Scalar,
        });
    }

    check_range("E angle", request.fields.electric.angle_deg, 0.0, 360.0)?;
    check_range("B angle", request.fields.magnetic.angle_deg, 0.0, 360.0)?;
    Ok(())
}

/// Integrate every particle of `request` with the named integrator
pub fn simulate_batch(
    request: &SimulationRequest,
    registry: &IntegratorRegistry,
    limits: &BatchLimits,
) -> Result<SimulationResponse, SimulationError> {
    validate_request(request, limits)?;
    let integrator = registry.create(&request.integrator)?;
    let field = FieldModel::try_from(&FieldsDocument::from(&request.fields))?;

    let samples = sample_count(request.t0, request.t_final, request.dt);
    let times: Vec<Scalar> = (0..samples)
        .map(|i| request.t0 + i as Scalar * request.dt)
        .collect();

    debug!(
        "Batch simulation: {} particles, {} samples, integrator {}",
        request.particles.len(),
        samples,
        integrator.name()
    );

    let mut particles = BTreeMap::new();
    for doc in &request.particles {
        let particle = doc.to_particle()?;
        let trajectory = integrate_trajectory(
            integrator.as_ref(),
            &LorentzAcceleration::new(particle.charge(), particle.mass(), &field),
            particle.position(),
            particle.velocity(),
            request.dt,
            samples,
        );
        if particles.insert(doc.id.clone(), trajectory).is_some() {
            return Err(SimulationError::Configuration(format!(
                "duplicate particle id '{}'",
                doc.id
            )));
        }
    }

    Ok(SimulationResponse {
        meta: ResponseMeta {
            t0: request.t0,
            t_final: request.t_final,
            dt: request.dt,
            integrator: request.integrator.clone(),
        },
        data: ResponseData { times, particles },
    })
}

fn integrate_trajectory(
    integrator: &dyn Integrator,
    acceleration: &dyn AccelerationField,
    mut position: Vector,
    mut velocity: Vector,
    dt: Scalar,
    samples: usize,
) -> ParticleSamples {
    let mut trajectory = ParticleSamples::default();
    trajectory.push(position, velocity, acceleration.at(velocity));
    for _ in 1..samples {
        integrator.step(&mut position, &mut velocity, acceleration, dt);
        trajectory.push(position, velocity, acceleration.at(velocity));
    }
    trajectory
}

/// [`SimulationTransport`] that runs the batch on the calling thread
pub struct LocalBatchTransport {
    registry: IntegratorRegistry,
    limits: BatchLimits,
}

impl LocalBatchTransport {
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            registry: IntegratorRegistry::default(),
            limits,
        }
    }
}

impl Default for LocalBatchTransport {
    fn default() -> Self {
        Self::new(BatchLimits::default())
    }
}

impl SimulationTransport for LocalBatchTransport {
    fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse, SimulationError> {
        simulate_batch(request, &self.registry, &self.limits)
    }
}
