//! Elevation-band visibility scans
//!
//! For every grid instant the observer is resolved first, then every catalog
//! object is resolved through the oracle and kept when its elevation lies in
//! the inclusive band `[min, max]`. Records come out in grid order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use orbital_mechanics::{CatalogEntry, ElevationConvention, LineOfSight, OrbitalError, PositionOracle};

use crate::observer::Observer;
use crate::time_grid::TimeGrid;
use crate::Result;

/// Inclusive elevation band in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationRange {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl ElevationRange {
    pub fn new(min_deg: f64, max_deg: f64) -> Result<Self> {
        let range = Self { min_deg, max_deg };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> std::result::Result<(), OrbitalError> {
        if !self.min_deg.is_finite() || !self.max_deg.is_finite() {
            return Err(OrbitalError::InvalidInput(format!(
                "elevation bounds must be finite, got [{}, {}]",
                self.min_deg, self.max_deg
            )));
        }
        if self.min_deg > self.max_deg {
            return Err(OrbitalError::InvalidInput(format!(
                "minimum elevation {} exceeds maximum {}",
                self.min_deg, self.max_deg
            )));
        }
        Ok(())
    }

    pub fn contains(&self, elevation_deg: f64) -> bool {
        elevation_deg >= self.min_deg && elevation_deg <= self.max_deg
    }
}

/// What to do when one (object, instant) pair cannot be evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the pair out and count it
    #[default]
    Skip,
    /// Stop the scan with the first error
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub convention: ElevationConvention,
    pub failure_policy: FailurePolicy,
}

/// Visible objects at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub timestamp: DateTime<Utc>,
    pub visible_count: usize,
    /// Names in catalog order
    pub visible: Vec<String>,
    /// Pairs left out at this instant
    pub omitted: usize,
}

/// One visible object at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    /// Target position in the oracle frame (km)
    pub position: Vector3<f64>,
    pub elevation_deg: f64,
    /// Line-of-sight distance (km)
    pub range_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport<T> {
    pub records: Vec<T>,
    /// Total pairs left out under [`FailurePolicy::Skip`]
    pub omissions: usize,
}

/// One position of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSample {
    pub timestamp: DateTime<Utc>,
    pub position: Vector3<f64>,
}

struct Sighting<'a> {
    entry: &'a CatalogEntry,
    position: Vector3<f64>,
    line_of_sight: LineOfSight,
}

fn omit(policy: FailurePolicy, error: OrbitalError, pairs: usize) -> Result<usize> {
    match policy {
        FailurePolicy::Abort => Err(error.into()),
        FailurePolicy::Skip => {
            warn!("Omitting {} pair(s): {}", pairs, error);
            Ok(pairs)
        }
    }
}

/// Walk the grid, handing each instant's sightings and omission count to `emit`
fn sweep<'a, O, F>(
    observer: &Observer,
    catalog: &'a [CatalogEntry],
    grid: &TimeGrid,
    range: &ElevationRange,
    oracle: &O,
    config: &ScanConfig,
    mut emit: F,
) -> Result<usize>
where
    O: PositionOracle,
    F: FnMut(DateTime<Utc>, Vec<Sighting<'a>>, usize),
{
    range.validate()?;

    let targets: Vec<&CatalogEntry> = catalog.iter().filter(|e| !observer.is_self(e)).collect();

    info!(
        "Scanning {} objects over {} instants from {} (band [{}, {}], {:?})",
        targets.len(),
        grid.len(),
        observer.label(),
        range.min_deg,
        range.max_deg,
        config.convention
    );

    let mut omissions = 0;
    for instant in grid {
        let reference = match observer.reference_at(oracle, instant) {
            Ok(reference) => reference,
            Err(e) => {
                let omitted = omit(config.failure_policy, e, targets.len())?;
                omissions += omitted;
                emit(instant, Vec::new(), omitted);
                continue;
            }
        };

        let mut sightings = Vec::new();
        let mut omitted = 0;
        for entry in targets.iter().copied() {
            let evaluated = oracle.position_at(entry, instant).and_then(|position| {
                LineOfSight::between(&reference, &position, config.convention)
                    .map(|line_of_sight| (position, line_of_sight))
            });

            match evaluated {
                Ok((position, line_of_sight)) => {
                    if range.contains(line_of_sight.elevation_deg) {
                        sightings.push(Sighting {
                            entry,
                            position,
                            line_of_sight,
                        });
                    }
                }
                Err(e) => omitted += omit(config.failure_policy, e, 1)?,
            }
        }

        debug!("{}: {} visible, {} omitted", instant, sightings.len(), omitted);
        omissions += omitted;
        emit(instant, sightings, omitted);
    }

    info!("Scan finished with {} omissions", omissions);
    Ok(omissions)
}

/// Visible count and names per grid instant
pub fn scan_aggregate<O: PositionOracle>(
    observer: &Observer,
    catalog: &[CatalogEntry],
    grid: &TimeGrid,
    range: &ElevationRange,
    oracle: &O,
    config: &ScanConfig,
) -> Result<ScanReport<AggregateRecord>> {
    let mut records = Vec::with_capacity(grid.len());
    let omissions = sweep(observer, catalog, grid, range, oracle, config, |timestamp, sightings, omitted| {
        records.push(AggregateRecord {
            timestamp,
            visible_count: sightings.len(),
            visible: sightings.iter().map(|s| s.entry.name.clone()).collect(),
            omitted,
        });
    })?;
    Ok(ScanReport { records, omissions })
}

/// One record per visible (instant, object) pair
pub fn scan_detail<O: PositionOracle>(
    observer: &Observer,
    catalog: &[CatalogEntry],
    grid: &TimeGrid,
    range: &ElevationRange,
    oracle: &O,
    config: &ScanConfig,
) -> Result<ScanReport<DetailRecord>> {
    let mut records = Vec::new();
    let omissions = sweep(observer, catalog, grid, range, oracle, config, |timestamp, sightings, _| {
        records.extend(sightings.into_iter().map(|s| DetailRecord {
            timestamp,
            name: s.entry.name.clone(),
            position: s.position,
            elevation_deg: s.line_of_sight.elevation_deg,
            range_km: s.line_of_sight.range_km,
        }));
    })?;
    Ok(ScanReport { records, omissions })
}

/// Visible objects per instant, chronological
///
/// Instants without any detail record do not appear.
pub fn visible_counts(records: &[DetailRecord]) -> Vec<(DateTime<Utc>, usize)> {
    let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.timestamp).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Position series of one object over the grid
pub fn route<O: PositionOracle>(
    oracle: &O,
    entry: &CatalogEntry,
    grid: &TimeGrid,
) -> Result<Vec<RouteSample>> {
    let samples = grid
        .iter()
        .map(|timestamp| {
            oracle
                .position_at(entry, timestamp)
                .map(|position| RouteSample { timestamp, position })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!("{}: route of {} samples", entry.name, samples.len());
    Ok(samples)
}
