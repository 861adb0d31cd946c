//! Chargedrift library
//!
//! Charged particles in uniform electric and magnetic fields, integrated
//! frame by frame. The binary is a thin driver over this library so that
//! everything can be exercised from integration tests.

pub mod cli;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod remote;
pub mod scene;

// Test utilities are public for integration tests
pub mod test_utils;
