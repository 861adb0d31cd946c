//! Batch simulation behind a transport
//!
//! A session can hand its whole state to a [`SimulationTransport`] and take
//! back a sampled trajectory instead of stepping locally. Transports that
//! talk to a remote service report connectivity problems as
//! [`SimulationError::Transient`]; the session then keeps its state and the
//! caller goes on stepping locally.

pub mod batch;
pub mod protocol;

pub use batch::{BatchLimits, LocalBatchTransport, sample_count, simulate_batch};
pub use protocol::{
    ParticleSamples, ResponseData, ResponseMeta, SimulationRequest, SimulationResponse,
    WireFieldParams, WireFields,
};

use crate::error::SimulationError;

pub trait SimulationTransport {
    fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResponse, SimulationError>;
}
