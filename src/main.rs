use bevy::log::{Level, LogPlugin};
use chargedrift::cli::{Args, handle_list_integrators, load_and_apply_config};
use chargedrift::plugins::simulation::SimulationPlugin;
use chargedrift::prelude::*;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_integrators {
        handle_list_integrators();
        return ExitCode::SUCCESS;
    }

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        LogPlugin {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ..default()
        },
        SimulationPlugin::with_config(config.clone()),
    ));
    app.finish();
    app.cleanup();

    if let Some(path) = &args.scene {
        let loaded = SceneDocument::load(path).and_then(|scene| {
            app.world_mut()
                .resource_mut::<SimulationSession>()
                .load_scene(&scene)
        });
        if let Err(e) = loaded {
            eprintln!("Error: failed to load scene {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    for particle in &args.particles {
        let added = app
            .world_mut()
            .resource_mut::<SimulationSession>()
            .add_particle(particle.charge, particle.mass, particle.vx, particle.vy);
        if let Err(e) = added {
            eprintln!("Error: invalid particle {particle:?}: {e}");
            return ExitCode::FAILURE;
        }
    }

    for _ in 0..args.frames {
        app.update();
    }

    let mut session = app.world_mut().resource_mut::<SimulationSession>();

    if let Some(seconds) = args.batch_seconds {
        let transport = LocalBatchTransport::new(config.remote.limits());
        match session.advance_remote(
            &transport,
            seconds,
            config.remote.dt,
            &config.remote.integrator,
        ) {
            Ok(()) => info!(
                "Batch simulation advanced to t = {}",
                session.simulation_time()
            ),
            Err(e) => error!("Batch simulation rejected: {e}"),
        }
    }

    if let Some(path) = &args.export {
        if let Err(e) = session.to_scene().save(path) {
            eprintln!("Error: failed to export scene to {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        info!("Exported scene to {}", path.display());
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}
