//! Elevation of a target seen from a reference position
//!
//! Both positions are vectors from the body center in one frame. The base
//! angle is measured between the line of sight and the nadir direction
//! (`-reference`):
//!
//! ```text
//! los   = target - reference
//! θ     = acos( clamp( (-reference · los) / (|reference| |los|), -1, 1 ) )
//! ```
//!
//! A target straight below the reference is at 0°, straight above at 180°.
//! [`ElevationConvention::Horizon`] shifts this by -90° so the plane normal to
//! the geocentric radial is 0°.
//!
//! For a ground site this is not the topocentric altitude: that is taken from
//! the geodetic normal, which tilts away from the radial by up to about 0.19°
//! at mid-latitudes. Objects near a band edge can land on either side of it.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{OrbitalError, Result};

/// How the nadir angle is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationConvention {
    /// Angle from nadir, in [0, 180]
    #[default]
    Nadir,
    /// Angle above the local horizontal plane, in [-90, 90]
    Horizon,
}

impl ElevationConvention {
    /// Express a nadir angle (degrees) in this convention
    pub fn apply(self, nadir_angle_deg: f64) -> f64 {
        match self {
            Self::Nadir => nadir_angle_deg,
            Self::Horizon => nadir_angle_deg - 90.0,
        }
    }
}

/// Nadir-referenced angle of `target` seen from `reference`, degrees in [0, 180]
pub fn elevation(reference: &Vector3<f64>, target: &Vector3<f64>) -> Result<f64> {
    let line_of_sight = target - reference;
    nadir_angle(reference, &line_of_sight)
}

fn nadir_angle(reference: &Vector3<f64>, line_of_sight: &Vector3<f64>) -> Result<f64> {
    let reference_norm = reference.norm();
    let range = line_of_sight.norm();

    if !(reference_norm > 0.0) {
        return Err(OrbitalError::DegenerateGeometry(
            "reference position is at the body center".to_string(),
        ));
    }
    if !(range > 0.0) {
        return Err(OrbitalError::DegenerateGeometry(
            "target coincides with reference".to_string(),
        ));
    }

    let cos_angle = (-reference).dot(line_of_sight) / (reference_norm * range);
    if !cos_angle.is_finite() {
        return Err(OrbitalError::DegenerateGeometry(format!(
            "non-finite direction cosine {cos_angle}"
        )));
    }

    Ok(cos_angle.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Elevation and range of one target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOfSight {
    pub elevation_deg: f64,
    pub range_km: f64,
}

impl LineOfSight {
    pub fn between(
        reference: &Vector3<f64>,
        target: &Vector3<f64>,
        convention: ElevationConvention,
    ) -> Result<Self> {
        let line_of_sight = target - reference;
        let angle = nadir_angle(reference, &line_of_sight)?;
        Ok(Self {
            elevation_deg: convention.apply(angle),
            range_km: line_of_sight.norm(),
        })
    }
}
