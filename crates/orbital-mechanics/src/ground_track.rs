//! Ground tracks
//!
//! Sub-satellite longitudes wrap at ±180°. Plotting consecutive samples needs
//! an unwrapped series, so a jump larger than half a turn between neighbours
//! is treated as a wrap and every later sample is shifted by a full turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::CatalogEntry;
use crate::propagation::PositionOracle;
use crate::transforms::to_geodetic;
use crate::{GeodeticPosition, Result};

/// Unwrap a longitude series in place (degrees)
pub fn normalize_longitudes(longitudes: &mut [f64]) {
    let Some(&first) = longitudes.first() else {
        return;
    };

    let mut offset = 0.0;
    let mut previous = first;
    for lon in longitudes.iter_mut().skip(1) {
        let raw = *lon;
        let step = raw - previous;
        if step > 180.0 {
            offset -= 360.0;
        } else if step < -180.0 {
            offset += 360.0;
        }
        previous = raw;
        *lon = raw + offset;
    }
}

/// Owned variant of [`normalize_longitudes`]
pub fn normalized(mut longitudes: Vec<f64>) -> Vec<f64> {
    normalize_longitudes(&mut longitudes);
    longitudes
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTrackSample {
    pub timestamp: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
}

/// Continuous ground track of one object over `instants`
///
/// Fails on the first instant the oracle cannot resolve.
pub fn ground_track<O: PositionOracle>(
    oracle: &O,
    entry: &CatalogEntry,
    instants: impl IntoIterator<Item = DateTime<Utc>>,
) -> Result<Vec<GroundTrackSample>> {
    let frame = oracle.frame();
    let mut samples = Vec::new();

    for instant in instants {
        let position = oracle.position_at(entry, instant)?;
        let geodetic = to_geodetic(&position, frame, &instant);
        samples.push(GroundTrackSample {
            timestamp: instant,
            longitude: geodetic.longitude,
            latitude: geodetic.latitude,
        });
    }

    let mut longitudes: Vec<f64> = samples.iter().map(|s| s.longitude).collect();
    normalize_longitudes(&mut longitudes);
    for (sample, lon) in samples.iter_mut().zip(longitudes) {
        sample.longitude = lon;
    }

    debug!("{}: ground track of {} samples", entry.name, samples.len());
    Ok(samples)
}

/// Sub-satellite point of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpoint {
    pub name: String,
    pub position: GeodeticPosition,
}

/// Sub-satellite points of a catalog at one instant
///
/// Objects the oracle cannot resolve are left out.
pub fn subpoints<O: PositionOracle>(
    oracle: &O,
    catalog: &[CatalogEntry],
    instant: DateTime<Utc>,
) -> Vec<Subpoint> {
    let frame = oracle.frame();
    catalog
        .iter()
        .filter_map(|entry| match oracle.position_at(entry, instant) {
            Ok(position) => Some(Subpoint {
                name: entry.name.clone(),
                position: to_geodetic(&position, frame, &instant),
            }),
            Err(e) => {
                warn!("Skipping {}: {}", entry.name, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constellation::{synthesize, ConstellationConfig, PlanetaryBody};
    use crate::propagation::{Frame, Sgp4Oracle};
    use crate::transforms::geodetic_to_ecef;
    use crate::OrbitalError;
    use chrono::{Duration, TimeZone};
    use fuzz_harness::prelude::*;
    use nalgebra::Vector3;

    #[test]
    fn test_eastward_wrap() {
        assert_eq!(
            normalized(vec![170.0, 175.0, -178.0, -170.0]),
            vec![170.0, 175.0, 182.0, 190.0]
        );
    }

    #[test]
    fn test_westward_wrap() {
        assert_eq!(
            normalized(vec![-170.0, -179.0, 178.0, 170.0]),
            vec![-170.0, -179.0, -182.0, -190.0]
        );
    }

    #[test]
    fn test_multiple_wraps_accumulate() {
        let track = normalized(vec![170.0, -170.0, 10.0, 170.0, -170.0]);
        assert_eq!(track, vec![170.0, 190.0, 370.0, 530.0, 550.0]);
    }

    #[test]
    fn test_short_series_unchanged() {
        assert!(normalized(Vec::new()).is_empty());
        assert_eq!(normalized(vec![-179.5]), vec![-179.5]);
        assert_eq!(normalized(vec![10.0, 20.0, 30.0]), vec![10.0, 20.0, 30.0]);
    }

    /// Earth-fixed oracle that walks a point along the equator
    struct EquatorWalk {
        start: DateTime<Utc>,
        deg_per_minute: f64,
    }

    impl PositionOracle for EquatorWalk {
        fn frame(&self) -> Frame {
            Frame::EarthFixed
        }

        fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>> {
            if entry.name == "LOST" {
                return Err(OrbitalError::Oracle {
                    object: entry.name.clone(),
                    instant,
                    reason: "no signal".to_string(),
                });
            }
            let minutes = (instant - self.start).num_seconds() as f64 / 60.0;
            let lon = (150.0 + self.deg_per_minute * minutes + 180.0).rem_euclid(360.0) - 180.0;
            Ok(geodetic_to_ecef(&GeodeticPosition {
                latitude: 0.0,
                longitude: lon,
                altitude_km: 20_200.0,
            }))
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn catalog() -> Vec<CatalogEntry> {
        synthesize(2, 20_200.0, 55.0, &PlanetaryBody::EARTH, start(), &ConstellationConfig::default())
            .unwrap()
            .catalog()
    }

    #[test]
    fn test_ground_track_is_continuous() {
        let oracle = EquatorWalk {
            start: start(),
            deg_per_minute: 10.0,
        };
        let instants: Vec<_> = (0..8).map(|m| start() + Duration::minutes(m)).collect();
        let track = ground_track(&oracle, &catalog()[0], instants.clone()).unwrap();

        assert_eq!(track.len(), 8);
        for (sample, instant) in track.iter().zip(&instants) {
            assert_eq!(sample.timestamp, *instant);
            assert!(sample.latitude.abs() < 1e-9);
        }
        for pair in track.windows(2) {
            assert!((pair[1].longitude - pair[0].longitude - 10.0).abs() < 1e-6);
        }
        assert!((track[7].longitude - 220.0).abs() < 1e-6);
    }

    #[test]
    fn test_ground_track_propagates_failure() {
        let oracle = EquatorWalk {
            start: start(),
            deg_per_minute: 1.0,
        };
        let lost = CatalogEntry::new("LOST", catalog()[0].record.clone());
        assert!(matches!(
            ground_track(&oracle, &lost, [start()]),
            Err(OrbitalError::Oracle { .. })
        ));
    }

    #[test]
    fn test_subpoints_skip_failures() {
        let oracle = EquatorWalk {
            start: start(),
            deg_per_minute: 1.0,
        };
        let mut entries = catalog();
        entries.push(CatalogEntry::new("LOST", entries[0].record.clone()));

        let points = subpoints(&oracle, &entries, start());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "SAT-1");
        assert!((points[0].position.longitude - 150.0).abs() < 1e-6);
        assert!((points[0].position.altitude_km - 20_200.0).abs() < 1e-6);
    }

    #[test]
    fn test_sgp4_subpoint_latitude_bounded_by_inclination() {
        let catalog = catalog();
        let oracle = Sgp4Oracle::new(&catalog);
        let instants = (0..24).map(|h| start() + Duration::hours(h));
        let track = ground_track(&oracle, &catalog[1], instants).unwrap();
        for sample in &track {
            assert!(sample.latitude.abs() <= 56.0, "latitude {}", sample.latitude);
        }
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(series in longitude_series()) {
            let once = normalized(series.clone());
            let twice = normalized(once.clone());
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.len(), series.len());
        }

        #[test]
        fn prop_normalized_steps_bounded(series in longitude_series()) {
            let track = normalized(series);
            for pair in track.windows(2) {
                prop_assert!((pair[1] - pair[0]).abs() <= 180.0 + 1e-9);
            }
        }
    }
}
