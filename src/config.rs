use crate::components::trail::TrailCapacity;
use crate::error::ValidationError;
use crate::physics::field::{AxisSign, FieldModel};
use crate::physics::math::{Scalar, Vector};
use crate::physics::resources::DEFAULT_FRAME_DURATION;
use crate::remote::BatchLimits;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `CHARGEDRIFT__PHYSICS__TIME_SCALE=2`
pub const ENV_PREFIX: &str = "CHARGEDRIFT";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub trails: TrailConfig,
    pub remote: RemoteConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Seconds of simulation time per tick at time scale 1
    pub nominal_frame_duration: Scalar,
    pub time_scale: Scalar,
    pub integrator: String,
    pub start_paused: bool,
    /// Where new particles appear
    pub spawn_x: Scalar,
    pub spawn_y: Scalar,
    pub field: FieldConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            nominal_frame_duration: DEFAULT_FRAME_DURATION,
            time_scale: 1.0,
            integrator: "rk4".to_string(),
            start_paused: false,
            spawn_x: 0.0,
            spawn_y: 0.0,
            field: FieldConfig::default(),
        }
    }
}

impl PhysicsConfig {
    pub fn spawn_position(&self) -> Vector {
        Vector::new(self.spawn_x, self.spawn_y)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub electric_magnitude: Scalar,
    pub electric_angle_deg: Scalar,
    pub magnetic_magnitude: Scalar,
    /// +1 out of the plane, -1 into it
    pub magnetic_axis: AxisSign,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            electric_magnitude: 0.0,
            electric_angle_deg: 0.0,
            magnetic_magnitude: 1.0,
            magnetic_axis: AxisSign::OutOfPlane,
        }
    }
}

impl FieldConfig {
    pub fn to_field_model(&self) -> Result<FieldModel, ValidationError> {
        FieldModel::new(
            self.electric_magnitude,
            self.electric_angle_deg,
            self.magnetic_magnitude,
            self.magnetic_axis,
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    /// Positive count, or "unbounded"
    pub length: TrailCapacity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    pub integrator: String,
    pub dt: Scalar,
    pub max_duration: Scalar,
    pub min_dt: Scalar,
    pub max_particles: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let limits = BatchLimits::default();
        Self {
            integrator: "RK4".to_string(),
            dt: 0.01,
            max_duration: limits.max_duration,
            min_dt: limits.min_dt,
            max_particles: limits.max_particles,
        }
    }
}

impl RemoteConfig {
    pub fn limits(&self) -> BatchLimits {
        BatchLimits {
            max_duration: self.max_duration,
            min_dt: self.min_dt,
            max_particles: self.max_particles,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a file, falling back to defaults if the file doesn't exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!(
                        "Failed to parse config file {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("Config file {} not found. Using defaults.", path.display());
                Self::default()
            }
        }
    }

    /// Location of the per-user configuration file, if the platform has one
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "chargedrift", "chargedrift")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Defaults, then an optional TOML file, then `CHARGEDRIFT__*` environment overrides
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        Self::load_layered_with(path, Self::environment())
    }

    /// `CHARGEDRIFT__SECTION__KEY` maps to `section.key`
    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered_with(
        path: Option<&Path>,
        environment: ::config::Environment,
    ) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }
        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Load the user's configuration, falling back to defaults on any error
    pub fn load_from_user_config() -> Self {
        let path = Self::user_config_path();
        match Self::load_layered(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load user configuration: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
