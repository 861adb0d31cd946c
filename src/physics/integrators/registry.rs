//! Name-based lookup for integrators
//!
//! Every integrator reports its own canonical name and aliases; the registry
//! indexes it under all of them. Configuration files, the command line and
//! batch requests all resolve integrators through here.

use super::Integrator;
use crate::error::ValidationError;
use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Integrators indexed by canonical name and alias
///
/// [`create`](Self::create) hands out a fresh boxed copy each time, so
/// callers never share integrator state through the registry.
#[derive(Resource)]
pub struct IntegratorRegistry {
    /// Canonical names and aliases, each mapped to a prototype instance
    integrators: HashMap<String, Box<dyn Integrator>>,
}

impl IntegratorRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            integrators: HashMap::new(),
        }
    }

    /// Register the integrators that ship with the crate
    pub fn with_standard_integrators(mut self) -> Self {
        use super::{ExplicitEuler, RungeKuttaFourthOrder, RungeKuttaFourthOrderCoupled};

        self.register_integrator(Box::new(RungeKuttaFourthOrder));
        self.register_integrator(Box::new(RungeKuttaFourthOrderCoupled));
        self.register_integrator(Box::new(ExplicitEuler));

        self
    }

    /// Builder form of [`register_integrator`](Self::register_integrator)
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.register_integrator(integrator);
        self
    }

    /// Index `integrator` under its name and every alias
    ///
    /// A later registration replaces an earlier one that claimed the same
    /// name or alias.
    pub fn register_integrator(&mut self, integrator: Box<dyn Integrator>) {
        for alias in integrator.aliases() {
            self.integrators
                .insert(alias.to_string(), integrator.clone_box());
        }
        self.integrators
            .insert(integrator.name().to_string(), integrator);
    }

    /// Instantiate the integrator registered under `name` (case-sensitive)
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownIntegrator`] when nothing is registered under
    /// `name`; the message lists the names and aliases that are.
    pub fn create(&self, name: &str) -> Result<Box<dyn Integrator>, ValidationError> {
        self.integrators
            .get(name)
            .map(|integrator| integrator.clone_box())
            .ok_or_else(|| {
                let aliases: Vec<String> =
                    self.list_aliases().into_iter().map(|(alias, _)| alias).collect();
                ValidationError::UnknownIntegrator(format!(
                    "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                    name,
                    self.list_available().join(", "),
                    aliases.join(", ")
                ))
            })
    }

    /// Sorted canonical names
    pub fn list_available(&self) -> Vec<String> {
        self.integrators
            .values()
            .map(|integrator| integrator.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted (alias, canonical name) pairs
    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .integrators
            .iter()
            .filter(|(key, integrator)| key.as_str() != integrator.name())
            .map(|(key, integrator)| (key.clone(), integrator.name().to_string()))
            .collect();

        aliases.sort();
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}
