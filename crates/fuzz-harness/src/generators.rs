//! Domain generators for property-based testing
//!
//! Angles are degrees, distances kilometers, epochs UTC.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

/// Mean Earth radius used by the generators
pub const EARTH_RADIUS_KM: f64 = 6378.0;

// ============================================================================
// Angles
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Inclination (0-180 deg)
pub fn inclination_deg() -> impl Strategy<Value = f64> {
    0.0f64..=180.0
}

/// Any angle in [0, 360) deg: RAAN, argument of periapsis, mean anomaly
pub fn angle_deg() -> impl Strategy<Value = f64> {
    0.0f64..360.0
}

/// Elevation band edge in the nadir convention (0-180 deg)
pub fn nadir_angle_deg() -> impl Strategy<Value = f64> {
    0.0f64..=180.0
}

// ============================================================================
// Orbits
// ============================================================================

/// Altitude (LEO to GEO, km)
pub fn altitude_km() -> impl Strategy<Value = f64> {
    200.0f64..=42_000.0
}

/// MEO altitude (2000-35786 km)
pub fn altitude_meo() -> impl Strategy<Value = f64> {
    2_000.0f64..=35_786.0
}

/// Near-circular eccentricity (0-0.01)
pub fn eccentricity_circular() -> impl Strategy<Value = f64> {
    0.0f64..0.01
}

/// Constellation size
pub fn constellation_size() -> impl Strategy<Value = usize> {
    1usize..=48
}

/// Catalog number that fits five columns
pub fn catalog_number() -> impl Strategy<Value = u32> {
    1u32..=99_999
}

/// Revolution number that fits five columns
pub fn revolution_number() -> impl Strategy<Value = u32> {
    0u32..=99_999
}

/// Epoch between 2000 and 2056 with microsecond resolution
pub fn epoch_utc() -> impl Strategy<Value = DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(2056, 12, 31, 23, 59, 59).single();
    let (lo, hi) = match (start, end) {
        (Some(s), Some(e)) => (s.timestamp_micros(), e.timestamp_micros()),
        _ => (0, 0),
    };
    (lo..=hi).prop_map(|us| DateTime::<Utc>::from_timestamp_micros(us).unwrap_or_default())
}

// ============================================================================
// Geometry
// ============================================================================

/// Position vector (km) between the surface and beyond GEO
///
/// Never the zero vector.
pub fn position_km() -> impl Strategy<Value = [f64; 3]> {
    (EARTH_RADIUS_KM..=50_000.0, latitude_deg(), longitude_deg()).prop_map(|(r, lat, lon)| {
        let (lat, lon) = (lat.to_radians(), lon.to_radians());
        [
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        ]
    })
}

/// Ground site (lat, lon, altitude 0-5 km)
pub fn ground_site() -> impl Strategy<Value = (f64, f64, f64)> {
    (latitude_deg(), longitude_deg(), 0.0f64..=5.0)
}

/// Wrapped longitude series as an oracle would report it
pub fn longitude_series() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(longitude_deg(), 0..64)
}

// ============================================================================
// Text
// ============================================================================

/// Element-line body over the characters that appear in two-line records
pub fn element_line_body() -> impl Strategy<Value = String> {
    "[0-9A-Z .+-]{0,80}"
}

/// Satellite name
pub fn sat_name() -> impl Strategy<Value = String> {
    "[A-Z]{1,3}-[0-9]{1,4}"
}
