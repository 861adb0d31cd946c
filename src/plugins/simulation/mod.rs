//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the [`SimulationSession`] resource and drives it once per `Update`
//! frame: queued [`SimulationCommand`]s are applied first, then the session
//! ticks.

use crate::prelude::*;

mod actions;
mod physics;

use actions::handle_simulation_commands;
use physics::advance_simulation;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Physics,
}

#[derive(Default)]
pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    /// Plugin that reads the user's configuration when built
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let session = SimulationSession::from_config(&config).unwrap_or_else(|e| {
            error!("Invalid simulation configuration: {e}. Using defaults.");
            SimulationSession::default()
        });

        app.insert_resource(config);
        app.insert_resource(session);
        app.init_resource::<IntegratorRegistry>();

        app.add_event::<SimulationCommand>();

        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Physics).chain(),
        );

        app.add_systems(
            Update,
            handle_simulation_commands.in_set(SimulationSet::Input),
        );
        app.add_systems(Update, advance_simulation.in_set(SimulationSet::Physics));
    }
}
