//! Subcommand implementations
//!
//! Each command returns its records; writing them out is left to the caller.

use chrono::{DateTime, Utc};
use tracing::info;

use orbital_mechanics::ground_track::Subpoint;
use orbital_mechanics::{
    ground_track, subpoints, CatalogEntry, Constellation, ElevationConvention, GeodeticPosition,
    GroundTrackSample, Sgp4Oracle,
};
use visibility_scanner::report::read_detail_csv;
use visibility_scanner::{
    route, scan_aggregate, scan_detail, visible_counts, AggregateRecord, DetailRecord, Observer,
    RouteSample, ScanReport, TimeGrid,
};

use crate::{Result, ToolConfig};

/// Evenly phased shell from the configured body and naming
pub fn synthesize(
    config: &ToolConfig,
    count: usize,
    altitude_km: f64,
    inclination_deg: f64,
    epoch: DateTime<Utc>,
) -> Result<Constellation> {
    Ok(orbital_mechanics::synthesize(
        count,
        altitude_km,
        inclination_deg,
        &config.body,
        epoch,
        &config.constellation,
    )?)
}

/// Visible objects per instant from a ground site
pub fn scan(
    config: &ToolConfig,
    catalog: &[CatalogEntry],
    site: GeodeticPosition,
    grid: &TimeGrid,
) -> Result<ScanReport<AggregateRecord>> {
    let oracle = Sgp4Oracle::new(catalog);
    let report = scan_aggregate(
        &Observer::Ground(site),
        catalog,
        grid,
        &config.elevation_range()?,
        &oracle,
        &config.scan_config(ElevationConvention::Horizon),
    )?;
    log_report(report.records.iter().map(|r| r.visible_count), report.omissions);
    Ok(report)
}

/// Visible catalog objects per instant from a relay satellite
pub fn relay(
    config: &ToolConfig,
    catalog: &[CatalogEntry],
    relay: &CatalogEntry,
    grid: &TimeGrid,
) -> Result<ScanReport<DetailRecord>> {
    let oracle = Sgp4Oracle::new(catalog.iter().chain(std::iter::once(relay)));
    let report = scan_detail(
        &Observer::Satellite(relay.clone()),
        catalog,
        grid,
        &config.elevation_range()?,
        &oracle,
        &config.scan_config(ElevationConvention::Nadir),
    )?;
    let counts = visible_counts(&report.records);
    log_report(counts.iter().map(|(_, n)| *n), report.omissions);
    Ok(report)
}

/// Inertial position series of one object
pub fn satellite_route(entry: &CatalogEntry, grid: &TimeGrid) -> Result<Vec<RouteSample>> {
    let oracle = Sgp4Oracle::new([entry]);
    Ok(route(&oracle, entry, grid)?)
}

/// Continuous ground track of one object
pub fn track(entry: &CatalogEntry, grid: &TimeGrid) -> Result<Vec<GroundTrackSample>> {
    let oracle = Sgp4Oracle::new([entry]);
    Ok(ground_track(&oracle, entry, grid)?)
}

/// Sub-satellite points of the whole catalog at one instant
pub fn snapshot(catalog: &[CatalogEntry], instant: DateTime<Utc>) -> Vec<Subpoint> {
    let oracle = Sgp4Oracle::new(catalog);
    let points = subpoints(&oracle, catalog, instant);
    info!("{} of {} objects placed at {}", points.len(), catalog.len(), instant);
    points
}

/// Visible count per instant of a detail report
pub fn summary<R: std::io::Read>(reader: R) -> Result<Vec<(DateTime<Utc>, usize)>> {
    let records = read_detail_csv(reader)?;
    Ok(visible_counts(&records))
}

fn log_report(counts: impl Iterator<Item = usize>, omissions: usize) {
    let (instants, total, max) = counts.fold((0usize, 0usize, 0usize), |(n, sum, max), c| {
        (n + 1, sum + c, max.max(c))
    });
    let mean = if instants > 0 { total as f64 / instants as f64 } else { 0.0 };
    info!(
        "{} instants with visibility, mean {:.2} visible, max {}, {} omissions",
        instants, mean, max, omissions
    );
}
