//! Test utilities for plugin testing

use bevy::prelude::*;

use crate::events::SimulationCommand;

/// Creates a minimal test app with core Bevy plugins needed for testing
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);

    // Add events used by plugins
    app.add_event::<SimulationCommand>();

    app
}
