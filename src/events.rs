//! Centralized event definitions
//!
//! Every user action on a running simulation arrives as a
//! [`SimulationCommand`]. Commands are applied between ticks, so a tick
//! never observes a half-applied change.

use crate::components::TrailCapacity;
use crate::physics::field::AxisSign;
use crate::physics::math::Scalar;
use bevy::prelude::*;

// Unified simulation command pattern
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SimulationCommand {
    AddParticle {
        charge: Scalar,
        mass: Scalar,
        vx: Scalar,
        vy: Scalar,
    },
    RemoveAllParticles,
    SelectParticle(String),
    SetField {
        electric_magnitude: Scalar,
        electric_angle_deg: Scalar,
        magnetic_magnitude: Scalar,
        magnetic_axis: AxisSign,
    },
    SetTimeScale(Scalar),
    SetTrailCapacity(TrailCapacity),
    SetIntegrator(String),
    TogglePause,
    StepOnce,
    Reset,
}
