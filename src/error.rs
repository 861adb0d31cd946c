//! Error types for the simulation core
//!
//! Numeric integration itself has no error path. Everything that can fail is
//! checked at the boundary (particle creation, field and clock setters, scene
//! import, remote transport) before any state is touched.

use crate::physics::math::Scalar;
use std::fmt;

/// A value was rejected before it could enter the session
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Particle mass must be strictly positive
    NonPositiveMass(Scalar),
    /// A numeric input was NaN or infinite
    NonFinite { name: &'static str, value: Scalar },
    /// Field magnitudes are non-negative; direction is carried separately
    NegativeMagnitude { name: &'static str, value: Scalar },
    /// Time scale must be strictly positive
    NonPositiveTimeScale(Scalar),
    /// Nominal frame duration must be strictly positive
    NonPositiveFrameDuration(Scalar),
    /// A value fell outside its allowed range
    OutOfRange {
        name: &'static str,
        value: Scalar,
        min: Scalar,
        max: Scalar,
    },
    /// No particle with this id exists in the session
    UnknownParticle(String),
    /// No integrator is registered under this name
    UnknownIntegrator(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveMass(mass) => {
                write!(f, "mass must be positive, got {mass}")
            }
            ValidationError::NonFinite { name, value } => {
                write!(f, "{name} must be finite, got {value}")
            }
            ValidationError::NegativeMagnitude { name, value } => {
                write!(f, "{name} must be non-negative, got {value}")
            }
            ValidationError::NonPositiveTimeScale(scale) => {
                write!(f, "time scale must be positive, got {scale}")
            }
            ValidationError::NonPositiveFrameDuration(duration) => {
                write!(f, "frame duration must be positive, got {duration}")
            }
            ValidationError::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "{name} must be within [{min}, {max}], got {value}"),
            ValidationError::UnknownParticle(id) => write!(f, "unknown particle: '{id}'"),
            ValidationError::UnknownIntegrator(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Top-level error for every fallible session operation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Bad input at an entry point; nothing was applied
    Validation(ValidationError),
    /// A scene or result document was malformed; the import was abandoned
    Configuration(String),
    /// The remote simulation endpoint could not be used; local stepping still works
    Transient(String),
}

impl SimulationError {
    /// Whether the caller should fall back to local stepping and carry on
    pub fn is_transient(&self) -> bool {
        matches!(self, SimulationError::Transient(_))
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Validation(err) => write!(f, "Invalid input: {err}"),
            SimulationError::Configuration(msg) => write!(f, "Invalid configuration: {msg}"),
            SimulationError::Transient(msg) => {
                write!(f, "Remote simulation unavailable: {msg}")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for SimulationError {
    fn from(err: ValidationError) -> Self {
        SimulationError::Validation(err)
    }
}

/// Reject NaN and infinities under a readable name
pub(crate) fn ensure_finite(name: &'static str, value: Scalar) -> Result<Scalar, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { name, value })
    }
}

/// Finite and non-negative
pub(crate) fn ensure_magnitude(
    name: &'static str,
    value: Scalar,
) -> Result<Scalar, ValidationError> {
    let value = ensure_finite(name, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeMagnitude { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_simulation_error() {
        let err: SimulationError = ValidationError::NonPositiveMass(0.0).into();
        assert_eq!(
            err,
            SimulationError::Validation(ValidationError::NonPositiveMass(0.0))
        );
        assert!(!err.is_transient());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_messages() {
        let err = SimulationError::Transient("connection refused".into());
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Remote simulation unavailable: connection refused"
        );

        let err = ValidationError::NonFinite {
            name: "charge",
            value: Scalar::NAN,
        };
        assert_eq!(err.to_string(), "charge must be finite, got NaN");
    }

    #[test]
    fn test_ensure_magnitude() {
        assert_eq!(ensure_magnitude("E", 2.5), Ok(2.5));
        assert_eq!(ensure_magnitude("E", 0.0), Ok(0.0));
        assert!(matches!(
            ensure_magnitude("E", -1.0),
            Err(ValidationError::NegativeMagnitude { .. })
        ));
        assert!(matches!(
            ensure_magnitude("E", Scalar::INFINITY),
            Err(ValidationError::NonFinite { .. })
        ));
    }
}
