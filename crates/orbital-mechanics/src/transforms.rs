//! Frame transforms
//!
//! - Geodetic (WGS84) <-> Earth-fixed (ECEF)
//! - Earth-fixed <-> inertial by a rotation of GMST about Z
//!
//! The inertial frame is the one SGP4 reports (TEME); polar motion and
//! nutation are ignored.

use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::propagation::Frame;
use crate::GeodeticPosition;

const EARTH_RADIUS_KM: f64 = 6378.137;
const EARTH_FLATTENING: f64 = 1.0 / 298.257223563;
const JULIAN_DATE_UNIX_EPOCH: f64 = 2_440_587.5;
const JULIAN_DATE_J2000: f64 = 2_451_545.0;

fn eccentricity_squared() -> f64 {
    2.0 * EARTH_FLATTENING - EARTH_FLATTENING * EARTH_FLATTENING
}

/// Convert geodetic position to ECEF (km)
pub fn geodetic_to_ecef(pos: &GeodeticPosition) -> Vector3<f64> {
    let lat = pos.latitude.to_radians();
    let lon = pos.longitude.to_radians();
    let alt = pos.altitude_km;
    let e2 = eccentricity_squared();

    // Radius of curvature in prime vertical
    let n = EARTH_RADIUS_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();

    Vector3::new(
        (n + alt) * lat.cos() * lon.cos(),
        (n + alt) * lat.cos() * lon.sin(),
        (n * (1.0 - e2) + alt) * lat.sin(),
    )
}

/// Convert ECEF (km) to geodetic position
pub fn ecef_to_geodetic(ecef: &Vector3<f64>) -> GeodeticPosition {
    let e2 = eccentricity_squared();
    let p = (ecef.x * ecef.x + ecef.y * ecef.y).sqrt();
    let longitude = ecef.y.atan2(ecef.x).to_degrees();

    // Fixed-point iteration on latitude; converges to sub-millimeter in a few steps
    let mut lat = ecef.z.atan2(p * (1.0 - e2));
    let mut n = EARTH_RADIUS_KM;
    for _ in 0..6 {
        n = EARTH_RADIUS_KM / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        lat = (ecef.z + e2 * n * lat.sin()).atan2(p);
    }

    let altitude_km = if lat.cos().abs() > 1e-10 {
        p / lat.cos() - n
    } else {
        ecef.z.abs() - n * (1.0 - e2)
    };

    GeodeticPosition {
        latitude: lat.to_degrees(),
        longitude,
        altitude_km,
    }
}

/// Greenwich mean sidereal time in radians, in [0, 2π)
pub fn gmst(instant: &DateTime<Utc>) -> f64 {
    let unix_seconds = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    let jd = unix_seconds / 86_400.0 + JULIAN_DATE_UNIX_EPOCH;

    // Julian centuries from J2000.0
    let t = (jd - JULIAN_DATE_J2000) / 36_525.0;

    // GMST in seconds
    let gmst_sec = 67_310.548_41 + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;

    // 240 s of time per degree
    (gmst_sec / 240.0).to_radians().rem_euclid(2.0 * PI)
}

/// Rotate an Earth-fixed vector into the inertial frame
pub fn ecef_to_eci(ecef: &Vector3<f64>, gmst_rad: f64) -> Vector3<f64> {
    let (sin_g, cos_g) = gmst_rad.sin_cos();
    Vector3::new(
        cos_g * ecef.x - sin_g * ecef.y,
        sin_g * ecef.x + cos_g * ecef.y,
        ecef.z,
    )
}

/// Rotate an inertial vector into the Earth-fixed frame
pub fn eci_to_ecef(eci: &Vector3<f64>, gmst_rad: f64) -> Vector3<f64> {
    ecef_to_eci(eci, -gmst_rad)
}

/// Ground position expressed in `frame` at `instant`
pub fn geodetic_in_frame(pos: &GeodeticPosition, frame: Frame, instant: &DateTime<Utc>) -> Vector3<f64> {
    let ecef = geodetic_to_ecef(pos);
    match frame {
        Frame::EarthFixed => ecef,
        Frame::Inertial => ecef_to_eci(&ecef, gmst(instant)),
    }
}

/// Vector in `frame` at `instant` expressed as a geodetic position
pub fn to_geodetic(position: &Vector3<f64>, frame: Frame, instant: &DateTime<Utc>) -> GeodeticPosition {
    match frame {
        Frame::EarthFixed => ecef_to_geodetic(position),
        Frame::Inertial => ecef_to_geodetic(&eci_to_ecef(position, gmst(instant))),
    }
}
