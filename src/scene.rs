//! Scene documents
//!
//! A scene captures fields, particles and clock settings so a session can be
//! saved and rebuilt. Trails are deliberately absent: rebuilt particles start
//! with empty trails.
//!
//! ```json
//! {
//!   "fields": { "E": {"magnitude": 1.0, "angleDeg": 90.0},
//!               "B": {"magnitude": 1.0, "angleDeg": 0.0} },
//!   "particles": [ {"id": "p1", "q": 1.0, "m": 1.0, "x": 0.0, "y": 0.0, "vx": 2.0, "vy": 0.0} ],
//!   "simulationTime": 0.0,
//!   "timeScale": 1.0,
//!   "trailLength": 500
//! }
//! ```

use crate::components::trail::TrailCapacity;
use crate::error::{SimulationError, ValidationError, ensure_magnitude};
use crate::physics::components::{Particle, ParticleId};
use crate::physics::field::{AxisSign, FieldModel};
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Magnitude and direction of one field
///
/// For the magnetic field the angle is measured from the out-of-plane axis,
/// so only its cosine matters: Bz = magnitude · cos(angle).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldParams {
    pub magnitude: Scalar,
    #[serde(rename = "angleDeg", alias = "angle_deg")]
    pub angle_deg: Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldsDocument {
    #[serde(rename = "E")]
    pub electric: FieldParams,
    #[serde(rename = "B")]
    pub magnetic: FieldParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleDocument {
    pub id: ParticleId,
    pub q: Scalar,
    pub m: Scalar,
    pub x: Scalar,
    pub y: Scalar,
    pub vx: Scalar,
    pub vy: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub fields: FieldsDocument,
    pub particles: Vec<ParticleDocument>,
    pub simulation_time: Scalar,
    pub time_scale: Scalar,
    pub trail_length: TrailCapacity,
}

impl TryFrom<&FieldsDocument> for FieldModel {
    type Error = ValidationError;

    fn try_from(doc: &FieldsDocument) -> Result<Self, Self::Error> {
        let magnitude = ensure_magnitude("magnetic field magnitude", doc.magnetic.magnitude)?;
        let bz = magnitude * libm::cos(doc.magnetic.angle_deg.to_radians());
        FieldModel::with_signed_bz(doc.electric.magnitude, doc.electric.angle_deg, bz)
    }
}

impl From<&FieldModel> for FieldsDocument {
    fn from(field: &FieldModel) -> Self {
        let electric = field.electric();
        let magnetic = field.magnetic();
        Self {
            electric: FieldParams {
                magnitude: electric.magnitude,
                angle_deg: electric.angle_deg,
            },
            magnetic: FieldParams {
                magnitude: magnetic.magnitude,
                angle_deg: match magnetic.axis {
                    AxisSign::OutOfPlane => 0.0,
                    AxisSign::IntoPlane => 180.0,
                },
            },
        }
    }
}

impl From<&Particle> for ParticleDocument {
    fn from(particle: &Particle) -> Self {
        let position = particle.position();
        let velocity = particle.velocity();
        Self {
            id: particle.id().clone(),
            q: particle.charge(),
            m: particle.mass(),
            x: position.x,
            y: position.y,
            vx: velocity.x,
            vy: velocity.y,
        }
    }
}

impl ParticleDocument {
    /// A fresh particle with an empty trail
    pub fn to_particle(&self) -> Result<Particle, ValidationError> {
        Particle::new(
            self.id.clone(),
            self.q,
            self.m,
            Vector::new(self.x, self.y),
            Vector::new(self.vx, self.vy),
        )
    }
}

impl SceneDocument {
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json)
            .map_err(|e| SimulationError::Configuration(format!("malformed scene: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::Configuration(format!("failed to encode scene: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        let path = path.as_ref();
        let content = self.to_json_pretty()?;
        std::fs::write(path, content).map_err(|e| {
            SimulationError::Configuration(format!("failed to write {}: {e}", path.display()))
        })
    }
}
