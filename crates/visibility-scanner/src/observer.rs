//! Observer positions
//!
//! A ground site is pinned to the rotating Earth, so its vector in an
//! inertial oracle frame changes with every instant. A catalog object is
//! resolved through the same oracle as the targets.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use orbital_mechanics::transforms::geodetic_in_frame;
use orbital_mechanics::{CatalogEntry, GeodeticPosition, PositionOracle, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Observer {
    /// Site on or above the WGS84 ellipsoid
    Ground(GeodeticPosition),
    /// Vector (km) already expressed in the oracle's frame
    Fixed(Vector3<f64>),
    /// Another catalog object, e.g. a relay satellite
    Satellite(CatalogEntry),
}

impl Observer {
    /// Observer position in the oracle's frame at `instant`
    pub fn reference_at<O: PositionOracle>(
        &self,
        oracle: &O,
        instant: DateTime<Utc>,
    ) -> Result<Vector3<f64>> {
        match self {
            Observer::Ground(site) => Ok(geodetic_in_frame(site, oracle.frame(), &instant)),
            Observer::Fixed(position) => Ok(*position),
            Observer::Satellite(entry) => oracle.position_at(entry, instant),
        }
    }

    /// True when `entry` is the observer itself
    pub fn is_self(&self, entry: &CatalogEntry) -> bool {
        matches!(self, Observer::Satellite(own) if own.record == entry.record)
    }

    pub fn label(&self) -> String {
        match self {
            Observer::Ground(site) => format!(
                "ground site ({:.4}°, {:.4}°, {:.3} km)",
                site.latitude, site.longitude, site.altitude_km
            ),
            Observer::Fixed(p) => format!("fixed point ({:.3}, {:.3}, {:.3}) km", p.x, p.y, p.z),
            Observer::Satellite(entry) => format!("satellite {}", entry.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use orbital_mechanics::{synthesize, ConstellationConfig, Frame, OrbitalError, PlanetaryBody};

    struct Still(Frame);

    impl PositionOracle for Still {
        fn frame(&self) -> Frame {
            self.0
        }

        fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>> {
            if entry.name == "SAT-2" {
                return Err(OrbitalError::Oracle {
                    object: entry.name.clone(),
                    instant,
                    reason: "out of range".to_string(),
                });
            }
            Ok(Vector3::new(26_578.0, 0.0, 0.0))
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_ground_observer_follows_frame() {
        let site = GeodeticPosition::on_surface(0.0, 0.0).unwrap();
        let observer = Observer::Ground(site);

        let fixed = observer.reference_at(&Still(Frame::EarthFixed), instant()).unwrap();
        assert!((fixed.x - 6378.137).abs() < 1e-9);

        let inertial = observer.reference_at(&Still(Frame::Inertial), instant()).unwrap();
        assert!((inertial.norm() - 6378.137).abs() < 1e-9);
        assert!(inertial.y.abs() > 1.0);
    }

    #[test]
    fn test_satellite_observer_uses_oracle() {
        let catalog = synthesize(
            2,
            20_200.0,
            55.0,
            &PlanetaryBody::EARTH,
            instant(),
            &ConstellationConfig::default(),
        )
        .unwrap()
        .catalog();

        let relay = Observer::Satellite(catalog[0].clone());
        let p = relay.reference_at(&Still(Frame::Inertial), instant()).unwrap();
        assert_eq!(p, Vector3::new(26_578.0, 0.0, 0.0));
        assert!(relay.is_self(&catalog[0]));
        assert!(!relay.is_self(&catalog[1]));
        assert!(relay.label().contains("SAT-1"));

        let lost = Observer::Satellite(catalog[1].clone());
        assert!(lost.reference_at(&Still(Frame::Inertial), instant()).is_err());
    }

    #[test]
    fn test_fixed_observer_is_constant() {
        let observer = Observer::Fixed(Vector3::new(1.0, 2.0, 3.0));
        let p = observer.reference_at(&Still(Frame::Inertial), instant()).unwrap();
        assert_eq!(p, Vector3::new(1.0, 2.0, 3.0));
        let catalog = synthesize(
            1,
            500.0,
            97.0,
            &PlanetaryBody::EARTH,
            instant(),
            &ConstellationConfig::default(),
        )
        .unwrap()
        .catalog();
        assert!(!observer.is_self(&catalog[0]));
    }
}
