//! Constellation Tool
//!
//! Command-line front end over the orbital libraries:
//!
//! | command      | output                                   |
//! |--------------|------------------------------------------|
//! | `synthesize` | element-set text (or JSON) of one shell  |
//! | `scan`       | visible count per instant from a site    |
//! | `relay`      | visible objects per instant from a satellite |
//! | `route`      | position series of one object            |
//! | `track`      | continuous ground track of one object    |
//! | `snapshot`   | sub-satellite points at one instant      |
//! | `summary`    | visible count per instant of a relay report |
//!
//! Defaults come from [`ToolConfig`], optionally loaded from a JSON file;
//! command-line flags override them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orbital_mechanics::{ConstellationConfig, ElevationConvention, OrbitalError, PlanetaryBody};
use visibility_scanner::{ElevationRange, FailurePolicy, ScanConfig, ScanError, TimeGrid};

pub mod commands;
pub mod loader;

/// Default elevation band (degrees)
pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 20.0;
pub const DEFAULT_MAX_ELEVATION_DEG: f64 = 90.0;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Orbital(#[from] OrbitalError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Catalog is empty")]
    EmptyCatalog,
    #[error("No object named '{0}' in catalog")]
    UnknownObject(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

/// Tool-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub body: PlanetaryBody,
    pub constellation: ConstellationConfig,
    pub min_elevation_deg: f64,
    pub max_elevation_deg: f64,
    /// Unset: `scan` reports horizon elevation, `relay` the nadir angle
    pub convention: Option<ElevationConvention>,
    pub failure_policy: FailurePolicy,
    pub step_seconds: i64,
    pub samples: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            body: PlanetaryBody::EARTH,
            constellation: ConstellationConfig::default(),
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            max_elevation_deg: DEFAULT_MAX_ELEVATION_DEG,
            convention: None,
            failure_policy: FailurePolicy::Skip,
            step_seconds: 60,
            samples: visibility_scanner::time_grid::MINUTES_PER_DAY,
        }
    }
}

impl ToolConfig {
    pub fn elevation_range(&self) -> Result<ElevationRange> {
        Ok(ElevationRange::new(self.min_elevation_deg, self.max_elevation_deg)?)
    }

    pub fn scan_config(&self, fallback: ElevationConvention) -> ScanConfig {
        ScanConfig {
            convention: self.convention.unwrap_or(fallback),
            failure_policy: self.failure_policy,
        }
    }

    /// `samples` instants spaced `step_seconds` apart from `start`
    pub fn grid(&self, start: DateTime<Utc>) -> Result<TimeGrid> {
        let step = Duration::try_seconds(self.step_seconds).ok_or_else(|| {
            OrbitalError::InvalidInput(format!("step of {} s is out of range", self.step_seconds))
        })?;
        Ok(TimeGrid::new(start, step, self.samples)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.samples, 1440);
        assert_eq!(config.step_seconds, 60);
        assert_eq!(config.elevation_range().unwrap().min_deg, 20.0);
        assert_eq!(
            config.scan_config(ElevationConvention::Horizon).convention,
            ElevationConvention::Horizon
        );
    }

    #[test]
    fn test_explicit_convention_wins() {
        let config = ToolConfig {
            convention: Some(ElevationConvention::Nadir),
            ..Default::default()
        };
        assert_eq!(
            config.scan_config(ElevationConvention::Horizon).convention,
            ElevationConvention::Nadir
        );
    }

    #[test]
    fn test_grid_from_config() {
        let config = ToolConfig {
            step_seconds: 300,
            samples: 12,
            ..Default::default()
        };
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let grid = config.grid(start).unwrap();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.instant(11), Some(start + Duration::minutes(55)));

        let bad = ToolConfig {
            step_seconds: 0,
            ..Default::default()
        };
        assert!(bad.grid(start).is_err());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = ToolConfig {
            min_elevation_deg: 80.0,
            max_elevation_deg: 10.0,
            ..Default::default()
        };
        assert!(config.elevation_range().is_err());
    }
}
