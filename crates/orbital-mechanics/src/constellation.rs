//! Constellation synthesis
//!
//! A single orbital shell of `N` objects sharing altitude, inclination, epoch
//! and mean motion, phased evenly in mean anomaly:
//!
//! ```text
//! a  = R + h
//! n  = sqrt(GM / a³) · 86400 / 2π      [rev/day]
//! Mᵢ = i · 360 / N                      i ∈ [0, N)
//! ```

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::CatalogEntry;
use crate::tle::{encode, OrbitalElementSet, TleRecord};
use crate::{OrbitalError, Result, SECONDS_PER_DAY};

/// Gravitational parameter and mean radius of the central body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryBody {
    /// GM in km³/s²
    pub gm_km3_s2: f64,
    pub radius_km: f64,
}

impl PlanetaryBody {
    pub const EARTH: PlanetaryBody = PlanetaryBody {
        gm_km3_s2: 398_600.4418,
        radius_km: 6378.0,
    };

    /// Semi-major axis of a circular orbit at `altitude_km`
    pub fn semi_major_axis_km(&self, altitude_km: f64) -> Result<f64> {
        if !altitude_km.is_finite() {
            return Err(OrbitalError::InvalidInput(format!(
                "altitude {altitude_km} is not finite"
            )));
        }
        if altitude_km <= -self.radius_km {
            return Err(OrbitalError::InvalidInput(format!(
                "altitude {altitude_km} km puts the orbit at or below the body center (radius {} km)",
                self.radius_km
            )));
        }
        Ok(self.radius_km + altitude_km)
    }

    /// Two-body mean motion in revolutions per day
    pub fn mean_motion_rev_per_day(&self, semi_major_axis_km: f64) -> Result<f64> {
        if !(semi_major_axis_km > 0.0) || !(self.gm_km3_s2 > 0.0) {
            return Err(OrbitalError::InvalidInput(format!(
                "semi-major axis {semi_major_axis_km} km and GM {} must be positive",
                self.gm_km3_s2
            )));
        }
        let n_rad_s = (self.gm_km3_s2 / semi_major_axis_km.powi(3)).sqrt();
        let rev_day = n_rad_s * SECONDS_PER_DAY / (2.0 * PI);
        if !rev_day.is_finite() || rev_day <= 0.0 {
            return Err(OrbitalError::InvalidInput(format!(
                "mean motion {rev_day} for semi-major axis {semi_major_axis_km} km"
            )));
        }
        Ok(rev_day)
    }

    /// Orbital period in seconds
    pub fn period_s(&self, semi_major_axis_km: f64) -> Result<f64> {
        Ok(SECONDS_PER_DAY / self.mean_motion_rev_per_day(semi_major_axis_km)?)
    }
}

impl Default for PlanetaryBody {
    fn default() -> Self {
        Self::EARTH
    }
}

/// Per-constellation settings shared by every member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    /// Members are named `<prefix>-<i+1>`
    pub prefix: String,
    pub base_catalog_number: u32,
    pub revolution_number: u32,
    pub raan_deg: f64,
    pub arg_periapsis_deg: f64,
    pub eccentricity: f64,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            prefix: "SAT".to_string(),
            base_catalog_number: 10001,
            revolution_number: 1,
            raan_deg: 0.0,
            arg_periapsis_deg: 0.0,
            eccentricity: 0.0,
        }
    }
}

/// One synthesized object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstellationMember {
    pub name: String,
    pub elements: OrbitalElementSet,
    pub record: TleRecord,
}

/// Ordered synthesized objects; index `i` is the `i`-th phase slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constellation {
    members: Vec<ConstellationMember>,
}

impl Constellation {
    pub fn members(&self) -> &[ConstellationMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstellationMember> {
        self.members.iter()
    }

    /// Catalog view, consumable by a position oracle
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.members
            .iter()
            .map(|m| CatalogEntry::new(m.name.clone(), m.record.clone()))
            .collect()
    }

    /// Three-line element text, one object after another
    pub fn to_tle_text(&self) -> String {
        crate::catalog::format_catalog(&self.catalog())
    }
}

/// Synthesize `count` evenly phased objects in one shell
pub fn synthesize(
    count: usize,
    altitude_km: f64,
    inclination_deg: f64,
    body: &PlanetaryBody,
    epoch: DateTime<Utc>,
    config: &ConstellationConfig,
) -> Result<Constellation> {
    if count == 0 {
        return Err(OrbitalError::InvalidInput(
            "constellation needs at least one object".to_string(),
        ));
    }
    let last_catalog_number = u64::from(config.base_catalog_number) + count as u64 - 1;
    if last_catalog_number > u64::from(u32::MAX) {
        return Err(OrbitalError::InvalidInput(format!(
            "{count} objects from catalog number {} overflow",
            config.base_catalog_number
        )));
    }

    let semi_major_axis_km = body.semi_major_axis_km(altitude_km)?;
    let mean_motion = body.mean_motion_rev_per_day(semi_major_axis_km)?;
    let spacing_deg = 360.0 / count as f64;

    info!(
        "Synthesizing {} objects: a={:.3} km, n={:.8} rev/day, i={:.4}°",
        count, semi_major_axis_km, mean_motion, inclination_deg
    );

    let mut members = Vec::with_capacity(count);
    for i in 0..count {
        let elements = OrbitalElementSet {
            semi_major_axis_km,
            inclination_deg,
            eccentricity: config.eccentricity,
            raan_deg: config.raan_deg,
            arg_periapsis_deg: config.arg_periapsis_deg,
            mean_anomaly_deg: i as f64 * spacing_deg,
            mean_motion,
            epoch,
            catalog_number: config.base_catalog_number + i as u32,
            revolution_number: config.revolution_number,
        };
        let record = encode(&elements)?;
        let name = format!("{}-{}", config.prefix, i + 1);

        debug!("{}: M={:.4}°, #{}", name, elements.mean_anomaly_deg, elements.catalog_number);
        members.push(ConstellationMember {
            name,
            elements,
            record,
        });
    }

    Ok(Constellation { members })
}
