//! Uniform electric and magnetic field description
//!
//! The electric field lies in the simulation plane and is stored as a
//! magnitude plus a direction in degrees. The magnetic field is always
//! perpendicular to the plane; only its magnitude and which way it points
//! are stored.

use crate::error::{ValidationError, ensure_finite, ensure_magnitude};
use crate::physics::math::{Scalar, Vector};
use serde::{Deserialize, Serialize};

/// Which way the magnetic field crosses the simulation plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum AxisSign {
    /// Pointing toward the viewer (+z)
    #[default]
    OutOfPlane,
    /// Pointing away from the viewer (-z)
    IntoPlane,
}

impl AxisSign {
    #[inline]
    pub fn signum(self) -> Scalar {
        match self {
            AxisSign::OutOfPlane => 1.0,
            AxisSign::IntoPlane => -1.0,
        }
    }

    /// Sign of a signed z component; zero counts as out of plane
    pub fn of(bz: Scalar) -> Self {
        if bz < 0.0 {
            AxisSign::IntoPlane
        } else {
            AxisSign::OutOfPlane
        }
    }
}

impl TryFrom<i8> for AxisSign {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AxisSign::OutOfPlane),
            -1 => Ok(AxisSign::IntoPlane),
            other => Err(format!("axis sign must be +1 or -1, got {other}")),
        }
    }
}

impl From<AxisSign> for i8 {
    fn from(sign: AxisSign) -> Self {
        match sign {
            AxisSign::OutOfPlane => 1,
            AxisSign::IntoPlane => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElectricField {
    pub magnitude: Scalar,
    pub angle_deg: Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MagneticField {
    pub magnitude: Scalar,
    pub axis: AxisSign,
}

/// Immutable field configuration read by every particle update in a step
///
/// A `FieldModel` is only ever replaced wholesale. The Cartesian electric
/// components are resolved once at construction so every stage of every
/// particle update sees exactly the same numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldModel {
    electric: ElectricField,
    magnetic: MagneticField,
    electric_components: Vector,
}

impl FieldModel {
    /// Field-free space
    pub const ZERO: Self = Self {
        electric: ElectricField {
            magnitude: 0.0,
            angle_deg: 0.0,
        },
        magnetic: MagneticField {
            magnitude: 0.0,
            axis: AxisSign::OutOfPlane,
        },
        electric_components: Vector::ZERO,
    };

    pub fn new(
        electric_magnitude: Scalar,
        electric_angle_deg: Scalar,
        magnetic_magnitude: Scalar,
        magnetic_axis: AxisSign,
    ) -> Result<Self, ValidationError> {
        let electric_magnitude = ensure_magnitude("electric field magnitude", electric_magnitude)?;
        let electric_angle_deg = ensure_finite("electric field angle", electric_angle_deg)?;
        let magnetic_magnitude = ensure_magnitude("magnetic field magnitude", magnetic_magnitude)?;

        let theta = electric_angle_deg.to_radians();
        let electric_components = Vector::new(
            electric_magnitude * libm::cos(theta),
            electric_magnitude * libm::sin(theta),
        );

        Ok(Self {
            electric: ElectricField {
                magnitude: electric_magnitude,
                angle_deg: electric_angle_deg,
            },
            magnetic: MagneticField {
                magnitude: magnetic_magnitude,
                axis: magnetic_axis,
            },
            electric_components,
        })
    }

    /// Build from a signed out-of-plane component instead of magnitude and sign
    pub fn with_signed_bz(
        electric_magnitude: Scalar,
        electric_angle_deg: Scalar,
        bz: Scalar,
    ) -> Result<Self, ValidationError> {
        let bz = ensure_finite("magnetic field", bz)?;
        Self::new(electric_magnitude, electric_angle_deg, bz.abs(), AxisSign::of(bz))
    }

    #[inline]
    pub fn electric(&self) -> ElectricField {
        self.electric
    }

    #[inline]
    pub fn magnetic(&self) -> MagneticField {
        self.magnetic
    }

    /// (Ex, Ey) = |E|·(cos θ, sin θ)
    #[inline]
    pub fn electric_vector(&self) -> Vector {
        self.electric_components
    }

    /// Signed out-of-plane magnetic component Bz = sign·|B|
    #[inline]
    pub fn bz(&self) -> Scalar {
        self.magnetic.axis.signum() * self.magnetic.magnitude
    }
}
