//! Orbital Mechanics Library
//!
//! Two-line element encoding, evenly phased constellation synthesis, SGP4
//! position oracles, frame transforms, elevation geometry and ground tracks.
//!
//! Everything here is a pure function or an immutable value type. The only
//! seam is [`propagation::PositionOracle`], which turns a catalog entry and an
//! instant into a position vector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod codec;
pub mod constellation;
pub mod elevation;
pub mod ground_track;
pub mod propagation;
pub mod tle;
pub mod transforms;

pub use catalog::{format_catalog, parse_catalog, CatalogEntry};
pub use constellation::{synthesize, Constellation, ConstellationConfig, PlanetaryBody};
pub use elevation::{elevation, ElevationConvention, LineOfSight};
pub use ground_track::{ground_track, normalize_longitudes, normalized, subpoints, GroundTrackSample};
pub use propagation::{Ephemeris, Frame, PositionOracle, Sgp4Oracle};
pub use tle::{encode, OrbitalElementSet, TleRecord};

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
    #[error("Position oracle failed for {object} at {instant}: {reason}")]
    Oracle {
        object: String,
        instant: DateTime<Utc>,
        reason: String,
    },
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

/// Geodetic position on the WGS84 ellipsoid (degrees, kilometers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

impl GeodeticPosition {
    pub fn new(latitude: f64, longitude: f64, altitude_km: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(OrbitalError::InvalidInput(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(OrbitalError::InvalidInput(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        if !altitude_km.is_finite() {
            return Err(OrbitalError::InvalidInput(format!(
                "altitude {altitude_km} is not finite"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude_km,
        })
    }

    pub fn on_surface(latitude: f64, longitude: f64) -> Result<Self> {
        Self::new(latitude, longitude, 0.0)
    }
}
