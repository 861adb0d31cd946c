//! Handlers for [`SimulationCommand`] events
//!
//! A command that fails validation is logged and dropped; the session is
//! left exactly as it was.

use crate::prelude::*;

pub fn handle_simulation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut session: ResMut<SimulationSession>,
    registry: Res<IntegratorRegistry>,
) {
    for command in commands_reader.read() {
        if let Err(e) = apply_command(&mut session, &registry, command) {
            warn!("Rejected {command:?}: {e}");
        }
    }
}

fn apply_command(
    session: &mut SimulationSession,
    registry: &IntegratorRegistry,
    command: &SimulationCommand,
) -> Result<(), SimulationError> {
    match command {
        SimulationCommand::AddParticle {
            charge,
            mass,
            vx,
            vy,
        } => {
            let id = session.add_particle(*charge, *mass, *vx, *vy)?;
            info!("Spawned particle {id}");
        }
        SimulationCommand::RemoveAllParticles => session.remove_all_particles(),
        SimulationCommand::SelectParticle(id) => {
            session.select_particle(id)?;
        }
        SimulationCommand::SetField {
            electric_magnitude,
            electric_angle_deg,
            magnetic_magnitude,
            magnetic_axis,
        } => session.set_field(
            *electric_magnitude,
            *electric_angle_deg,
            *magnetic_magnitude,
            *magnetic_axis,
        )?,
        SimulationCommand::SetTimeScale(scale) => session.set_time_scale(*scale)?,
        SimulationCommand::SetTrailCapacity(capacity) => session.set_trail_capacity(*capacity),
        SimulationCommand::SetIntegrator(name) => {
            let integrator = registry.create(name)?;
            session.set_integrator(integrator);
        }
        SimulationCommand::TogglePause => {
            let playing = session.toggle_pause();
            info!("Simulation {}", if playing { "resumed" } else { "paused" });
        }
        SimulationCommand::StepOnce => session.step_once(),
        SimulationCommand::Reset => session.reset(),
    }
    Ok(())
}
