//! Chargedrift prelude module
//!
//! Re-exports the types most call sites need, to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

pub use crate::physics::math::{Scalar, Vector};

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - Errors
pub use crate::error::{SimulationError, ValidationError};

// Internal re-exports - Physics
pub use crate::components::{Trail, TrailCapacity};
pub use crate::physics::components::{Particle, ParticleId};
pub use crate::physics::field::{AxisSign, FieldModel};
pub use crate::physics::integrators::{Integrator, IntegratorRegistry};
pub use crate::physics::resources::SimulationClock;
pub use crate::physics::session::{SessionSnapshot, SimulationSession};

// Internal re-exports - Scenes and batch runs
pub use crate::remote::{LocalBatchTransport, SimulationTransport};
pub use crate::scene::SceneDocument;

// Internal re-exports - Events
pub use crate::events::SimulationCommand;
