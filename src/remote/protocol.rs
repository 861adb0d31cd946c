//! Wire format for batch ("remote") simulations
//!
//! Request and response documents follow the simulation service's JSON
//! layout: snake_case keys, per-particle results as parallel arrays.

use crate::physics::components::ParticleId;
use crate::physics::math::{Scalar, Vector};
use crate::scene::{FieldParams, FieldsDocument, ParticleDocument};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_BATCH_INTEGRATOR: &str = "RK4";

fn default_integrator() -> String {
    DEFAULT_BATCH_INTEGRATOR.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireFieldParams {
    pub magnitude: Scalar,
    #[serde(alias = "angleDeg")]
    pub angle_deg: Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireFields {
    #[serde(rename = "E")]
    pub electric: WireFieldParams,
    #[serde(rename = "B")]
    pub magnetic: WireFieldParams,
}

impl From<&FieldsDocument> for WireFields {
    fn from(doc: &FieldsDocument) -> Self {
        let convert = |params: &FieldParams| WireFieldParams {
            magnitude: params.magnitude,
            angle_deg: params.angle_deg,
        };
        Self {
            electric: convert(&doc.electric),
            magnetic: convert(&doc.magnetic),
        }
    }
}

impl From<&WireFields> for FieldsDocument {
    fn from(wire: &WireFields) -> Self {
        let convert = |params: &WireFieldParams| FieldParams {
            magnitude: params.magnitude,
            angle_deg: params.angle_deg,
        };
        Self {
            electric: convert(&wire.electric),
            magnetic: convert(&wire.magnetic),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub fields: WireFields,
    pub particles: Vec<ParticleDocument>,
    #[serde(default)]
    pub t0: Scalar,
    pub t_final: Scalar,
    pub dt: Scalar,
    #[serde(default = "default_integrator")]
    pub integrator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub t0: Scalar,
    pub t_final: Scalar,
    pub dt: Scalar,
    pub integrator: String,
}

/// Per-particle samples, one entry per returned time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleSamples {
    pub x: Vec<Scalar>,
    pub y: Vec<Scalar>,
    pub vx: Vec<Scalar>,
    pub vy: Vec<Scalar>,
    #[serde(default)]
    pub ax: Vec<Scalar>,
    #[serde(default)]
    pub ay: Vec<Scalar>,
}

impl ParticleSamples {
    /// Sample count when the kinematic arrays agree, `None` otherwise
    pub fn consistent_len(&self) -> Option<usize> {
        let len = self.x.len();
        (self.y.len() == len && self.vx.len() == len && self.vy.len() == len).then_some(len)
    }

    pub fn push(&mut self, position: Vector, velocity: Vector, acceleration: Vector) {
        self.x.push(position.x);
        self.y.push(position.y);
        self.vx.push(velocity.x);
        self.vy.push(velocity.y);
        self.ax.push(acceleration.x);
        self.ay.push(acceleration.y);
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| Vector::new(x, y))
    }

    /// Final (position, velocity)
    pub fn last_state(&self) -> Option<(Vector, Vector)> {
        Some((
            Vector::new(*self.x.last()?, *self.y.last()?),
            Vector::new(*self.vx.last()?, *self.vy.last()?),
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub times: Vec<Scalar>,
    pub particles: BTreeMap<ParticleId, ParticleSamples>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub meta: ResponseMeta,
    pub data: ResponseData,
}
