//! Command line interface for Chargedrift

use clap::Parser;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::components::TrailCapacity;
use crate::config::SimulationConfig;
use crate::physics::field::AxisSign;
use crate::physics::integrators::IntegratorRegistry;
use crate::physics::math::Scalar;
use crate::physics::session::SimulationSession;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// Invalid integrator name provided
    InvalidIntegrator(String),
    /// Overrides produced a configuration the session rejects
    InvalidConfig(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidIntegrator(msg) => write!(f, "Invalid integrator: {msg}"),
            CliError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Initial state of a particle given on the command line as `q,m,vx,vy`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    pub charge: Scalar,
    pub mass: Scalar,
    pub vx: Scalar,
    pub vy: Scalar,
}

impl FromStr for ParticleSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<Scalar>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid number in '{s}': {e}"))?;

        match values.as_slice() {
            &[charge, mass, vx, vy] => Ok(Self {
                charge,
                mass,
                vx,
                vy,
            }),
            _ => Err(format!(
                "expected four comma-separated values q,m,vx,vy, got '{s}'"
            )),
        }
    }
}

/// Chargedrift - charged particles in uniform electric and magnetic fields
#[derive(Parser, Debug)]
#[command(version, long_version = long_version(), about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scene file (JSON) to start from
    #[arg(long, value_name = "FILE")]
    pub scene: Option<PathBuf>,

    /// Add a particle at the spawn point as q,m,vx,vy (repeatable)
    #[arg(long = "particle", value_name = "Q,M,VX,VY", allow_hyphen_values = true)]
    pub particles: Vec<ParticleSpec>,

    /// Number of frames to simulate
    #[arg(short = 'f', long, value_name = "COUNT", default_value_t = 600)]
    pub frames: u32,

    /// Time scale (overrides config file)
    #[arg(short = 't', long, value_name = "SCALE")]
    pub time_scale: Option<Scalar>,

    /// Trail length as a point count or "unbounded" (overrides config file)
    #[arg(long, value_name = "LENGTH")]
    pub trail_length: Option<TrailCapacity>,

    /// Integrator type (e.g., rk4, rk4_coupled, euler)
    #[arg(short = 'i', long, value_name = "TYPE")]
    pub integrator: Option<String>,

    /// Electric field magnitude
    #[arg(long, value_name = "MAGNITUDE")]
    pub electric: Option<Scalar>,

    /// Electric field direction in degrees, counter-clockwise from +x
    #[arg(long, value_name = "DEGREES", allow_hyphen_values = true)]
    pub electric_angle: Option<Scalar>,

    /// Magnetic field magnitude
    #[arg(long, value_name = "MAGNITUDE")]
    pub magnetic: Option<Scalar>,

    /// Point the magnetic field into the plane instead of out of it
    #[arg(long)]
    pub into_plane: bool,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// After the frames, advance this many seconds through the batch simulator
    #[arg(long, value_name = "SECONDS")]
    pub batch_seconds: Option<Scalar>,

    /// Write the final state as a scene file (JSON)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List available integrators and exit
    #[arg(long)]
    pub list_integrators: bool,
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")")
}

/// Handles the --list-integrators flag by printing available integrators and exiting
pub fn handle_list_integrators() {
    let registry = IntegratorRegistry::new().with_standard_integrators();
    println!("Available integrators:");
    for name in registry.list_available() {
        println!("  - {name}");
    }

    let aliases = registry.list_aliases();
    if !aliases.is_empty() {
        println!("\nAliases:");
        for (alias, target) in aliases {
            println!("  - {alias} -> {target}");
        }
    }
}

fn load_config_file(path: &Path) -> Result<SimulationConfig, CliError> {
    if !path.exists() {
        return Err(CliError::ConfigLoad(format!(
            "{} does not exist",
            path.display()
        )));
    }
    SimulationConfig::load_layered(Some(path)).map_err(|e| CliError::ConfigLoad(e.to_string()))
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {}", config_path.display());
        load_config_file(config_path)?
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(scale) = args.time_scale {
        config.physics.time_scale = scale;
    }

    if let Some(length) = args.trail_length {
        config.trails.length = length;
    }

    if let Some(integrator_type) = &args.integrator {
        let registry = IntegratorRegistry::new().with_standard_integrators();
        registry
            .create(integrator_type)
            .map_err(|err| CliError::InvalidIntegrator(err.to_string()))?;

        println!("Using integrator: {integrator_type}");
        config.physics.integrator = integrator_type.clone();
    }

    let field = &mut config.physics.field;
    if let Some(magnitude) = args.electric {
        field.electric_magnitude = magnitude;
    }
    if let Some(angle) = args.electric_angle {
        field.electric_angle_deg = angle;
    }
    if let Some(magnitude) = args.magnetic {
        field.magnetic_magnitude = magnitude;
    }
    if args.into_plane {
        field.magnetic_axis = AxisSign::IntoPlane;
    }

    if args.paused {
        config.physics.start_paused = true;
    }

    SimulationSession::from_config(&config).map_err(|e| CliError::InvalidConfig(e.to_string()))?;

    Ok(config)
}
