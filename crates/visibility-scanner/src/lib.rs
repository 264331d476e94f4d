//! Visibility Scanner
//!
//! Sweeps a catalog over a time grid and reports which objects sit inside an
//! elevation band as seen from an observer.
//!
//! - [`time_grid`]: evenly spaced UTC instants
//! - [`observer`]: ground site, fixed vector or moving catalog object
//! - [`scanner`]: aggregate and per-object scans, position routes
//! - [`report`]: CSV and JSON writers

use orbital_mechanics::OrbitalError;
use thiserror::Error;

pub mod observer;
pub mod report;
pub mod scanner;
pub mod time_grid;

pub use observer::Observer;
pub use scanner::{
    route, scan_aggregate, scan_detail, visible_counts, AggregateRecord, DetailRecord,
    ElevationRange, FailurePolicy, RouteSample, ScanConfig, ScanReport,
};
pub use time_grid::TimeGrid;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Orbital(#[from] OrbitalError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
