//! Simulation session: the particle collection, the field, and the clock
//!
//! All state lives in one owned value. Every tick reads a single
//! `FieldModel` for all particles, so a field change can only take effect
//! between ticks.

use crate::components::trail::TrailCapacity;
use crate::config::SimulationConfig;
use crate::error::{SimulationError, ValidationError, ensure_finite};
use crate::physics::components::{Particle, ParticleId};
use crate::physics::field::{AxisSign, FieldModel};
use crate::physics::integrators::{
    Integrator, IntegratorRegistry, RungeKuttaFourthOrder, advance_particle,
};
use crate::physics::math::{Scalar, Vector};
use crate::physics::resources::SimulationClock;
use crate::remote::{SimulationRequest, SimulationResponse, SimulationTransport, WireFields};
use crate::scene::{FieldsDocument, ParticleDocument, SceneDocument};
use bevy::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Read-only view of one particle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSnapshot {
    pub id: ParticleId,
    pub charge: Scalar,
    pub mass: Scalar,
    pub position: [Scalar; 2],
    pub velocity: [Scalar; 2],
    pub trail: Vec<[Scalar; 2]>,
    pub selected: bool,
}

impl From<&Particle> for ParticleSnapshot {
    fn from(particle: &Particle) -> Self {
        Self {
            id: particle.id().clone(),
            charge: particle.charge(),
            mass: particle.mass(),
            position: particle.position().to_array(),
            velocity: particle.velocity().to_array(),
            trail: particle.trail().iter().map(|p| p.to_array()).collect(),
            selected: particle.is_selected(),
        }
    }
}

/// Read-only view of the whole session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub simulation_time: Scalar,
    pub time_scale: Scalar,
    pub is_playing: bool,
    pub particles: Vec<ParticleSnapshot>,
}

/// Particles, fields and clock of one running simulation
///
/// All mutation goes through methods here. Every particle is advanced with
/// the same field, step and integrator, and the clock moves once per frame
/// after all of them.
#[derive(Resource, Debug)]
pub struct SimulationSession {
    particles: Vec<Particle>,
    field: FieldModel,
    clock: SimulationClock,
    trail_capacity: TrailCapacity,
    spawn_position: Vector,
    integrator: Box<dyn Integrator>,
    next_particle_number: u64,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            field: FieldModel::ZERO,
            clock: SimulationClock::default(),
            trail_capacity: TrailCapacity::default(),
            spawn_position: Vector::ZERO,
            integrator: Box::new(RungeKuttaFourthOrder),
            next_particle_number: 1,
        }
    }
}

impl SimulationSession {
    /// Empty session with the given integrator and default everything else
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        Self {
            integrator,
            ..Self::default()
        }
    }

    /// Build a session from configuration; every value is validated
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let physics = &config.physics;
        let integrator = IntegratorRegistry::default().create(&physics.integrator)?;
        let clock = SimulationClock::new(
            physics.nominal_frame_duration,
            physics.time_scale,
            !physics.start_paused,
        )?;
        let field = physics.field.to_field_model()?;

        ensure_finite("spawn x", physics.spawn_x)?;
        ensure_finite("spawn y", physics.spawn_y)?;

        Ok(Self {
            particles: Vec::new(),
            field,
            clock,
            trail_capacity: config.trails.length,
            spawn_position: physics.spawn_position(),
            integrator,
            next_particle_number: 1,
        })
    }

    // --- particles -------------------------------------------------------

    /// Create a particle at the spawn position and return its id
    pub fn add_particle(
        &mut self,
        charge: Scalar,
        mass: Scalar,
        vx: Scalar,
        vy: Scalar,
    ) -> Result<ParticleId, SimulationError> {
        let id = self.next_free_id();
        let particle = Particle::new(
            id.clone(),
            charge,
            mass,
            self.spawn_position,
            Vector::new(vx, vy),
        )?;

        self.next_particle_number += 1;
        self.particles.push(particle);
        debug!("Added particle {id} (q={charge}, m={mass}, v=({vx}, {vy}))");
        Ok(id)
    }

    fn next_free_id(&self) -> ParticleId {
        let mut number = self.next_particle_number;
        loop {
            let candidate = ParticleId::new(format!("p{number}"));
            if !self.particles.iter().any(|p| p.id() == &candidate) {
                return candidate;
            }
            number += 1;
        }
    }

    /// Drop every particle; ids already handed out stay used
    pub fn remove_all_particles(&mut self) {
        debug!("Removing {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Toggle the `selected` flag and return its new value
    pub fn select_particle(&mut self, id: &str) -> Result<bool, SimulationError> {
        self.particles
            .iter_mut()
            .find(|p| p.id().as_str() == id)
            .map(Particle::toggle_selected)
            .ok_or_else(|| ValidationError::UnknownParticle(id.to_string()).into())
    }

    /// Particles in creation order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, id: &str) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id().as_str() == id)
    }

    // --- configuration ---------------------------------------------------

    /// Replace the field from user-facing parameters
    ///
    /// `electric_angle_deg` is measured counter-clockwise from +x. On error
    /// the previous field is kept.
    pub fn set_field(
        &mut self,
        electric_magnitude: Scalar,
        electric_angle_deg: Scalar,
        magnetic_magnitude: Scalar,
        magnetic_axis: AxisSign,
    ) -> Result<(), SimulationError> {
        self.field = FieldModel::new(
            electric_magnitude,
            electric_angle_deg,
            magnetic_magnitude,
            magnetic_axis,
        )?;
        Ok(())
    }

    /// Replace the field wholesale
    pub fn set_field_model(&mut self, field: FieldModel) {
        self.field = field;
    }

    pub fn field(&self) -> &FieldModel {
        &self.field
    }

    /// Takes effect from the next frame; must be finite and positive
    pub fn set_time_scale(&mut self, scale: Scalar) -> Result<(), SimulationError> {
        self.clock.set_time_scale(scale)?;
        Ok(())
    }

    /// Change the trail capacity; existing trails shrink immediately
    pub fn set_trail_capacity(&mut self, capacity: TrailCapacity) {
        self.trail_capacity = capacity;
        for particle in &mut self.particles {
            particle.trail_mut().enforce_capacity(capacity);
        }
    }

    pub fn trail_capacity(&self) -> TrailCapacity {
        self.trail_capacity
    }

    /// Use `integrator` for every later frame
    pub fn set_integrator(&mut self, integrator: Box<dyn Integrator>) {
        debug!("Switching integrator to {}", integrator.name());
        self.integrator = integrator;
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Total simulated time since start or last reset
    pub fn simulation_time(&self) -> Scalar {
        self.clock.simulation_time()
    }

    // --- playback --------------------------------------------------------

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Flip playback and return whether the session is now playing
    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Advance one frame if playing; otherwise do nothing
    pub fn tick(&mut self) {
        if self.clock.is_playing() {
            self.advance_frame();
        }
    }

    /// Advance exactly one frame regardless of playback state
    pub fn step_once(&mut self) {
        self.advance_frame();
    }

    fn advance_frame(&mut self) {
        let dt = self.clock.dt();
        let field = &self.field;
        let integrator = self.integrator.as_ref();
        for particle in &mut self.particles {
            advance_particle(integrator, particle, field, dt, self.trail_capacity);
        }
        self.clock.advance(dt);
    }

    /// Zero the clock and clear every trail; kinematics and fields are kept
    pub fn reset(&mut self) {
        self.clock.reset();
        for particle in &mut self.particles {
            particle.trail_mut().clear();
        }
    }

    /// Copy of everything observable, for rendering or comparison
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            simulation_time: self.clock.simulation_time(),
            time_scale: self.clock.time_scale(),
            is_playing: self.clock.is_playing(),
            particles: self.particles.iter().map(ParticleSnapshot::from).collect(),
        }
    }

    // --- scenes ----------------------------------------------------------

    /// Export fields, particles and clock settings; trails are not saved
    pub fn to_scene(&self) -> SceneDocument {
        SceneDocument {
            fields: FieldsDocument::from(&self.field),
            particles: self.particles.iter().map(ParticleDocument::from).collect(),
            simulation_time: self.clock.simulation_time(),
            time_scale: self.clock.time_scale(),
            trail_length: self.trail_capacity,
        }
    }

    /// Replace particles, fields and clock settings from a scene
    ///
    /// Everything is validated first; on any error the session is unchanged.
    pub fn load_scene(&mut self, scene: &SceneDocument) -> Result<(), SimulationError> {
        let invalid = |what: String| SimulationError::Configuration(what);

        let field =
            FieldModel::try_from(&scene.fields).map_err(|e| invalid(format!("fields: {e}")))?;

        let mut clock = self.clock.clone();
        clock
            .set_time_scale(scene.time_scale)
            .map_err(|e| invalid(e.to_string()))?;
        if !scene.simulation_time.is_finite() || scene.simulation_time < 0.0 {
            return Err(invalid(format!(
                "simulation time must be finite and non-negative, got {}",
                scene.simulation_time
            )));
        }
        clock.restore(scene.simulation_time);

        let mut seen = HashSet::new();
        let mut particles = Vec::with_capacity(scene.particles.len());
        for doc in &scene.particles {
            if !seen.insert(doc.id.clone()) {
                return Err(invalid(format!("duplicate particle id '{}'", doc.id)));
            }
            let particle = doc
                .to_particle()
                .map_err(|e| invalid(format!("particle '{}': {e}", doc.id)))?;
            particles.push(particle);
        }

        info!(
            "Loaded scene with {} particles at t = {}",
            particles.len(),
            scene.simulation_time
        );
        self.field = field;
        self.clock = clock;
        self.trail_capacity = scene.trail_length;
        self.particles = particles;
        Ok(())
    }

    // --- batch simulation ------------------------------------------------

    /// Describe the current state as a batch request spanning `duration`
    ///
    /// The request starts at the current simulation time. The electric field
    /// direction is wrapped into [0, 360) degrees; it describes the same field.
    pub fn remote_request(
        &self,
        duration: Scalar,
        dt: Scalar,
        integrator: &str,
    ) -> SimulationRequest {
        let t0 = self.clock.simulation_time();
        let mut fields = WireFields::from(&FieldsDocument::from(&self.field));
        // Batch runs only accept angles in [0, 360]
        fields.electric.angle_deg = fields.electric.angle_deg.rem_euclid(360.0);
        SimulationRequest {
            fields,
            particles: self.particles.iter().map(ParticleDocument::from).collect(),
            t0,
            t_final: t0 + duration,
            dt,
            integrator: integrator.to_string(),
        }
    }

    /// Adopt batch results: last sample becomes the state, samples become the trail
    ///
    /// Every particle must have a complete, consistent entry or nothing is applied.
    pub fn apply_remote_results(
        &mut self,
        response: &SimulationResponse,
    ) -> Result<(), SimulationError> {
        let mut finals = Vec::with_capacity(self.particles.len());
        for particle in &self.particles {
            let samples = response.data.particles.get(particle.id()).ok_or_else(|| {
                SimulationError::Configuration(format!(
                    "results are missing particle '{}'",
                    particle.id()
                ))
            })?;
            let state = samples
                .consistent_len()
                .and_then(|_| samples.last_state())
                .filter(|(position, velocity)| position.is_finite() && velocity.is_finite())
                .ok_or_else(|| {
                    SimulationError::Configuration(format!(
                        "results for particle '{}' are empty or inconsistent",
                        particle.id()
                    ))
                })?;
            finals.push((samples, state));
        }

        let capacity = self.trail_capacity;
        for (particle, (samples, (position, velocity))) in self.particles.iter_mut().zip(finals) {
            let (p, v) = particle.kinematics_mut();
            *p = position;
            *v = velocity;
            particle.trail_mut().replace(samples.positions(), capacity);
        }
        Ok(())
    }

    /// Advance by `duration` through a batch transport instead of local ticks
    ///
    /// On failure the session is untouched and the error is returned so the
    /// caller can keep stepping locally.
    pub fn advance_remote(
        &mut self,
        transport: &dyn SimulationTransport,
        duration: Scalar,
        dt: Scalar,
        integrator: &str,
    ) -> Result<(), SimulationError> {
        let request = self.remote_request(duration, dt, integrator);
        let response = match transport.simulate(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!("Batch simulation failed: {e}. Continuing with local stepping.");
                return Err(e);
            }
        };

        self.apply_remote_results(&response)?;
        if let Some(&end) = response.data.times.last() {
            let current = self.clock.simulation_time();
            if end.is_finite() && end > current {
                self.clock.advance(end - current);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_field(e: Scalar, angle: Scalar, b: Scalar) -> SimulationSession {
        let mut session = SimulationSession::default();
        session
            .set_field(e, angle, b, AxisSign::OutOfPlane)
            .unwrap();
        session
    }

    #[test]
    fn test_add_particle_assigns_sequential_ids() {
        let mut session = SimulationSession::default();
        let a = session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();
        let b = session.add_particle(-1.0, 2.0, 1.0, 0.0).unwrap();

        assert_eq!(a.as_str(), "p1");
        assert_eq!(b.as_str(), "p2");
        assert_eq!(session.particles().len(), 2);
        assert_eq!(session.particle("p2").unwrap().mass(), 2.0);
    }

    #[test]
    fn test_ids_are_not_reused_after_clear() {
        let mut session = SimulationSession::default();
        session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();
        session.remove_all_particles();
        let id = session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(id.as_str(), "p2");
    }

    #[test]
    fn test_add_particle_rejects_bad_mass_without_side_effects() {
        let mut session = SimulationSession::default();
        let err = session.add_particle(1.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            SimulationError::Validation(ValidationError::NonPositiveMass(0.0))
        );
        assert!(session.particles().is_empty());

        // The failed attempt does not burn an id
        let id = session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(id.as_str(), "p1");
    }

    #[test]
    fn test_select_particle_toggles() {
        let mut session = SimulationSession::default();
        let id = session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();

        assert_eq!(session.select_particle(id.as_str()), Ok(true));
        assert_eq!(session.select_particle(id.as_str()), Ok(false));
        assert_eq!(
            session.select_particle("p99"),
            Err(SimulationError::Validation(ValidationError::UnknownParticle(
                "p99".into()
            )))
        );
    }

    #[test]
    fn test_set_field_rejects_without_applying() {
        let mut session = session_with_field(1.0, 0.0, 1.0);
        let before = *session.field();

        assert!(
            session
                .set_field(-1.0, 0.0, 1.0, AxisSign::OutOfPlane)
                .is_err()
        );
        assert_eq!(*session.field(), before);
    }

    #[test]
    fn test_tick_respects_pause_but_step_once_does_not() {
        let mut session = session_with_field(0.0, 0.0, 0.0);
        session.add_particle(1.0, 1.0, 1.0, 0.0).unwrap();

        session.pause();
        session.tick();
        assert_eq!(session.simulation_time(), 0.0);
        assert_eq!(session.particles()[0].position(), Vector::ZERO);

        session.step_once();
        assert!(!session.is_playing());
        assert_eq!(session.simulation_time(), 1.0 / 60.0);
        assert_eq!(session.particles()[0].position(), Vector::new(1.0 / 60.0, 0.0));
        assert_eq!(session.particles()[0].trail().len(), 1);
    }

    #[test]
    fn test_time_scale_stretches_dt() {
        let mut session = session_with_field(0.0, 0.0, 0.0);
        session.add_particle(1.0, 1.0, 1.0, 0.0).unwrap();
        session.set_time_scale(3.0).unwrap();
        assert!(session.set_time_scale(0.0).is_err());

        session.tick();

        let dt = session.clock().dt();
        assert!((dt - 0.05).abs() < 1e-15);
        assert_eq!(session.simulation_time(), dt);
        assert_eq!(session.particles()[0].position().x, dt);
    }

    #[test]
    fn test_reset_clears_trails_and_time_only() {
        let mut session = session_with_field(0.5, 30.0, 1.0);
        session.add_particle(1.0, 1.0, 1.0, 0.5).unwrap();
        for _ in 0..10 {
            session.tick();
        }
        let before = session.particles()[0].clone();

        session.reset();

        let after = &session.particles()[0];
        assert_eq!(session.simulation_time(), 0.0);
        assert!(after.trail().is_empty());
        assert_eq!(after.position(), before.position());
        assert_eq!(after.velocity(), before.velocity());
        assert_eq!(after.charge(), before.charge());
        assert_eq!(after.mass(), before.mass());
    }

    #[test]
    fn test_shrinking_trail_capacity_applies_immediately() {
        let mut session = session_with_field(0.0, 0.0, 1.0);
        session.set_trail_capacity(TrailCapacity::Unbounded);
        session.add_particle(1.0, 1.0, 1.0, 0.0).unwrap();
        for _ in 0..20 {
            session.tick();
        }
        assert_eq!(session.particles()[0].trail().len(), 20);

        session.set_trail_capacity(TrailCapacity::bounded(5).unwrap());
        assert_eq!(session.particles()[0].trail().len(), 5);
        assert_eq!(
            session.particles()[0].trail().latest(),
            Some(session.particles()[0].position())
        );
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = session_with_field(0.0, 0.0, 1.0);
        let id = session.add_particle(2.0, 3.0, 1.0, -1.0).unwrap();
        session.select_particle(id.as_str()).unwrap();
        session.tick();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.simulation_time, 1.0 / 60.0);
        assert_eq!(snapshot.particles.len(), 1);
        let particle = &snapshot.particles[0];
        assert_eq!(particle.id, id);
        assert_eq!(particle.charge, 2.0);
        assert_eq!(particle.mass, 3.0);
        assert!(particle.selected);
        assert_eq!(particle.trail.len(), 1);
        assert_eq!(particle.trail[0], particle.position);
    }

    #[test]
    fn test_from_config_rejects_unknown_integrator() {
        let mut config = SimulationConfig::default();
        config.physics.integrator = "leapfrog".into();
        assert!(matches!(
            SimulationSession::from_config(&config),
            Err(SimulationError::Validation(ValidationError::UnknownIntegrator(_)))
        ));
    }

    #[test]
    fn test_from_config_applies_settings() {
        let mut config = SimulationConfig::default();
        config.physics.start_paused = true;
        config.physics.spawn_x = 1.5;
        config.physics.time_scale = 2.0;

        let mut session = SimulationSession::from_config(&config).unwrap();
        assert!(!session.is_playing());
        assert_eq!(session.clock().time_scale(), 2.0);
        assert_eq!(session.field().bz(), 1.0);

        session.add_particle(1.0, 1.0, 0.0, 0.0).unwrap();
        assert_eq!(session.particles()[0].position(), Vector::new(1.5, 0.0));
    }
}
