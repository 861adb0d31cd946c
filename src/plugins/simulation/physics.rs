use crate::physics::session::SimulationSession;
use bevy::prelude::*;

/// One frame of simulation; a paused session ignores it
pub fn advance_simulation(mut session: ResMut<SimulationSession>) {
    session.tick();
}
