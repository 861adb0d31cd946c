//! Charged-particle dynamics in a uniform planar field

pub mod components;
pub mod field;
pub mod force;
pub mod integrators;
pub mod math;
pub mod resources;
pub mod session;
