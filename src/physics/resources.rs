//! Simulation clock

use crate::error::{ValidationError, ensure_finite};
use crate::physics::math::Scalar;

/// Default nominal frame duration (60 Hz)
pub const DEFAULT_FRAME_DURATION: Scalar = 1.0 / 60.0;

/// Elapsed simulation time, playback state, and the per-tick step size
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    simulation_time: Scalar,
    time_scale: Scalar,
    nominal_frame_duration: Scalar,
    playing: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            simulation_time: 0.0,
            time_scale: 1.0,
            nominal_frame_duration: DEFAULT_FRAME_DURATION,
            playing: true,
        }
    }
}

impl SimulationClock {
    pub fn new(
        nominal_frame_duration: Scalar,
        time_scale: Scalar,
        playing: bool,
    ) -> Result<Self, ValidationError> {
        let mut clock = Self {
            playing,
            ..Self::default()
        };
        clock.set_nominal_frame_duration(nominal_frame_duration)?;
        clock.set_time_scale(time_scale)?;
        Ok(clock)
    }

    /// Step size applied per tick: nominal frame duration scaled by time scale
    #[inline]
    pub fn dt(&self) -> Scalar {
        self.nominal_frame_duration * self.time_scale
    }

    #[inline]
    pub fn simulation_time(&self) -> Scalar {
        self.simulation_time
    }

    #[inline]
    pub fn time_scale(&self) -> Scalar {
        self.time_scale
    }

    #[inline]
    pub fn nominal_frame_duration(&self) -> Scalar {
        self.nominal_frame_duration
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Returns whether the clock is playing afterwards
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn set_time_scale(&mut self, scale: Scalar) -> Result<(), ValidationError> {
        let scale = ensure_finite("time scale", scale)?;
        if scale <= 0.0 {
            return Err(ValidationError::NonPositiveTimeScale(scale));
        }
        self.time_scale = scale;
        Ok(())
    }

    pub fn set_nominal_frame_duration(&mut self, duration: Scalar) -> Result<(), ValidationError> {
        let duration = ensure_finite("frame duration", duration)?;
        if duration <= 0.0 {
            return Err(ValidationError::NonPositiveFrameDuration(duration));
        }
        self.nominal_frame_duration = duration;
        Ok(())
    }

    pub(crate) fn advance(&mut self, dt: Scalar) {
        self.simulation_time += dt;
    }

    /// Restore a persisted time, e.g. from a scene file
    pub(crate) fn restore(&mut self, simulation_time: Scalar) {
        self.simulation_time = simulation_time;
    }

    /// Back to zero; the only way simulation time ever decreases
    pub fn reset(&mut self) {
        self.simulation_time = 0.0;
    }
}
