//! Two-line element record encoding
//!
//! Column layout (1-based, inclusive):
//!
//! ```text
//! Line 1: 1 NNNNNC DDDDDDDD YYDDD.DDDDDDDD SD.DDDDDDDD SDDDDD-D SDDDDD-D E NNNN K
//!         |  3-7 8  10-17       19-32         34-43       45-52    54-61 63 65-68 69
//! Line 2: 2 NNNNN III.IIII RRR.RRRR EEEEEEE PPP.PPPP MMM.MMMM NN.NNNNNNNNRRRRR K
//!         |  3-7   9-16     18-25    27-33   35-42    44-51     53-63   64-68 69
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{encode_epoch, verify_checksum, with_checksum, CHECKSUM_COLUMNS, LINE_LENGTH};
use crate::{OrbitalError, Result};

const CLASSIFICATION: char = 'U';
const LAUNCH_DESIGNATOR: &str = "00000A";
const ZERO_FIRST_DERIVATIVE: &str = " .00000000";
const ZERO_EXPONENT_FIELD: &str = " 00000-0";
const EPHEMERIS_TYPE: u8 = 0;
const ELEMENT_SET_NUMBER: u32 = 0;

/// Largest value of a 5-column integer field
const MAX_FIVE_DIGITS: u32 = 99_999;

/// Keplerian element set for one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    /// Semi-major axis in km
    pub semi_major_axis_km: f64,
    /// Inclination in degrees
    pub inclination_deg: f64,
    pub eccentricity: f64,
    /// Right ascension of the ascending node in degrees
    pub raan_deg: f64,
    /// Argument of periapsis in degrees
    pub arg_periapsis_deg: f64,
    /// Mean anomaly at epoch in degrees
    pub mean_anomaly_deg: f64,
    /// Mean motion in revolutions per day
    pub mean_motion: f64,
    pub epoch: DateTime<Utc>,
    pub catalog_number: u32,
    pub revolution_number: u32,
}

impl OrbitalElementSet {
    /// Check every field fits its physical range and its TLE column
    pub fn validate(&self) -> Result<()> {
        let angles = [
            ("inclination", self.inclination_deg),
            ("raan", self.raan_deg),
            ("argument of periapsis", self.arg_periapsis_deg),
            ("mean anomaly", self.mean_anomaly_deg),
        ];
        if let Some((name, value)) = angles.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OrbitalError::InvalidInput(format!("{name} is {value}")));
        }
        if !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(OrbitalError::InvalidInput(format!(
                "inclination {} outside [0, 180]",
                self.inclination_deg
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitalError::InvalidInput(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        if !self.mean_motion.is_finite() || self.mean_motion <= 0.0 {
            return Err(OrbitalError::InvalidInput(format!(
                "mean motion {} must be positive and finite",
                self.mean_motion
            )));
        }
        if self.catalog_number == 0 || self.catalog_number > MAX_FIVE_DIGITS {
            return Err(OrbitalError::InvalidInput(format!(
                "catalog number {} outside [1, {MAX_FIVE_DIGITS}]",
                self.catalog_number
            )));
        }
        if self.revolution_number > MAX_FIVE_DIGITS {
            return Err(OrbitalError::InvalidInput(format!(
                "revolution number {} exceeds {MAX_FIVE_DIGITS}",
                self.revolution_number
            )));
        }
        Ok(())
    }
}

/// Two 69-column lines with valid checksums
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TleRecord {
    line1: String,
    line2: String,
}

impl TleRecord {
    /// Validate externally supplied lines
    pub fn new(line1: impl Into<String>, line2: impl Into<String>) -> Result<Self> {
        let line1 = line1.into();
        let line2 = line2.into();

        for (number, line) in [('1', &line1), ('2', &line2)] {
            if line.len() != LINE_LENGTH || !line.is_ascii() {
                return Err(OrbitalError::InvalidTle(format!(
                    "line {number} must be {LINE_LENGTH} ASCII columns, got {}",
                    line.len()
                )));
            }
            if !line.starts_with(number) {
                return Err(OrbitalError::InvalidTle(format!(
                    "line {number} starts with '{}'",
                    &line[..1]
                )));
            }
            if !verify_checksum(line) {
                return Err(OrbitalError::InvalidTle(format!(
                    "line {number} checksum mismatch: {line}"
                )));
            }
        }

        if line1[2..7] != line2[2..7] {
            return Err(OrbitalError::InvalidTle(format!(
                "catalog numbers differ: '{}' vs '{}'",
                &line1[2..7],
                &line2[2..7]
            )));
        }

        Ok(Self { line1, line2 })
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Catalog number from columns 3-7 (0 when the field is not numeric)
    pub fn catalog_number(&self) -> u32 {
        self.line1[2..7].trim().parse().unwrap_or(0)
    }
}

/// Encode an element set into its two fixed-column lines
pub fn encode(elements: &OrbitalElementSet) -> Result<TleRecord> {
    elements.validate()?;

    let line1 = format!(
        "1 {:05}{} {:<8} {} {} {} {} {} {:>4}",
        elements.catalog_number,
        CLASSIFICATION,
        LAUNCH_DESIGNATOR,
        encode_epoch(&elements.epoch),
        ZERO_FIRST_DERIVATIVE,
        ZERO_EXPONENT_FIELD,
        ZERO_EXPONENT_FIELD,
        EPHEMERIS_TYPE,
        ELEMENT_SET_NUMBER,
    );

    let line2 = format!(
        "2 {:05} {:>8.4} {:>8.4} {} {:>8.4} {:>8.4} {:>11.8}{:>5}",
        elements.catalog_number,
        elements.inclination_deg,
        wrap_degrees(elements.raan_deg),
        eccentricity_digits(elements.eccentricity)?,
        wrap_degrees(elements.arg_periapsis_deg),
        wrap_degrees(elements.mean_anomaly_deg),
        elements.mean_motion,
        elements.revolution_number,
    );

    for (number, line) in [(1, &line1), (2, &line2)] {
        if line.len() != CHECKSUM_COLUMNS {
            return Err(OrbitalError::InvalidInput(format!(
                "line {number} fields overflow their columns: '{line}'"
            )));
        }
    }

    Ok(TleRecord {
        line1: with_checksum(&line1),
        line2: with_checksum(&line2),
    })
}

/// Eccentricity as 7 digits with an implied leading decimal point
fn eccentricity_digits(eccentricity: f64) -> Result<String> {
    let digits = (eccentricity * 1e7).round() as u32;
    if digits >= 10_000_000 {
        return Err(OrbitalError::InvalidInput(format!(
            "eccentricity {eccentricity} rounds to 1"
        )));
    }
    Ok(format!("{:07}", digits))
}

/// Angle in [0, 360) after rounding to the four decimals the columns hold
fn wrap_degrees(angle: f64) -> f64 {
    let rounded = (angle.rem_euclid(360.0) * 1e4).round() / 1e4;
    if rounded >= 360.0 {
        0.0
    } else {
        // + 0.0 turns -0.0 into 0.0
        rounded + 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::checksum;
    use chrono::TimeZone;
    use fuzz_harness::prelude::*;

    fn gps_like() -> OrbitalElementSet {
        OrbitalElementSet {
            semi_major_axis_km: 26_560.0,
            inclination_deg: 55.0,
            eccentricity: 0.0,
            raan_deg: 0.0,
            arg_periapsis_deg: 0.0,
            mean_anomaly_deg: 24.0,
            mean_motion: 2.00563021,
            epoch: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            catalog_number: 10002,
            revolution_number: 1,
        }
    }

    #[test]
    fn test_encode_layout() {
        let record = encode(&gps_like()).unwrap();

        assert_eq!(
            &record.line1()[..68],
            "1 10002U 00000A   24061.50000000  .00000000  00000-0  00000-0 0    0"
        );
        assert_eq!(
            &record.line2()[..68],
            "2 10002  55.0000   0.0000 0000000   0.0000  24.0000  2.00563021    1"
        );
        assert_eq!(record.line1().len(), 69);
        assert_eq!(record.line2().len(), 69);
    }

    #[test]
    fn test_encode_checksum_is_last_column() {
        let record = encode(&gps_like()).unwrap();
        for line in [record.line1(), record.line2()] {
            let digit = line.as_bytes()[68] - b'0';
            assert_eq!(digit, checksum(&line[..68]));
        }
    }

    #[test]
    fn test_eccentricity_has_no_decimal_point() {
        let mut elements = gps_like();
        elements.eccentricity = 0.0123456;
        let record = encode(&elements).unwrap();
        assert_eq!(&record.line2()[26..33], "0123456");

        elements.eccentricity = 0.00000004;
        let record = encode(&elements).unwrap();
        assert_eq!(&record.line2()[26..33], "0000000");
    }

    #[test]
    fn test_angles_wrap_into_column() {
        let mut elements = gps_like();
        elements.raan_deg = -90.0;
        elements.mean_anomaly_deg = 725.5;
        let record = encode(&elements).unwrap();
        assert_eq!(&record.line2()[17..25], "270.0000");
        assert_eq!(&record.line2()[43..51], "  5.5000");
    }

    #[test]
    fn test_angles_rounding_up_to_full_turn_print_zero() {
        let mut elements = gps_like();
        elements.raan_deg = 359.99996;
        elements.mean_anomaly_deg = -0.00001;
        let record = encode(&elements).unwrap();
        assert_eq!(&record.line2()[17..25], "  0.0000");
        assert_eq!(&record.line2()[43..51], "  0.0000");

        elements.raan_deg = 359.99994;
        let record = encode(&elements).unwrap();
        assert_eq!(&record.line2()[17..25], "359.9999");
    }

    #[test]
    fn test_encode_rejects_overflowing_fields() {
        let mut elements = gps_like();
        elements.catalog_number = 100_000;
        assert!(matches!(encode(&elements), Err(OrbitalError::InvalidInput(_))));

        let mut elements = gps_like();
        elements.mean_motion = 120.0;
        assert!(matches!(encode(&elements), Err(OrbitalError::InvalidInput(_))));

        let mut elements = gps_like();
        elements.eccentricity = 0.99999999;
        assert!(matches!(encode(&elements), Err(OrbitalError::InvalidInput(_))));

        let mut elements = gps_like();
        elements.mean_motion = 0.0;
        assert!(matches!(encode(&elements), Err(OrbitalError::InvalidInput(_))));

        let mut elements = gps_like();
        elements.inclination_deg = f64::NAN;
        assert!(matches!(encode(&elements), Err(OrbitalError::InvalidInput(_))));
    }

    #[test]
    fn test_standard_parser_recovers_fields() {
        let mut elements = gps_like();
        elements.eccentricity = 0.0006703;
        elements.raan_deg = 247.4627;
        elements.arg_periapsis_deg = 130.536;
        elements.revolution_number = 56353;
        let record = encode(&elements).unwrap();

        let parsed = sgp4::Elements::from_tle(
            Some("TEST".to_string()),
            record.line1().as_bytes(),
            record.line2().as_bytes(),
        )
        .unwrap();

        assert_eq!(parsed.norad_id, 10002);
        assert!((parsed.inclination - 55.0).abs() < 1e-4);
        assert!((parsed.right_ascension - 247.4627).abs() < 1e-4);
        assert!((parsed.eccentricity - 0.0006703).abs() < 1e-7);
        assert!((parsed.argument_of_perigee - 130.536).abs() < 1e-4);
        assert!((parsed.mean_anomaly - 24.0).abs() < 1e-4);
        assert!((parsed.mean_motion - 2.00563021).abs() < 1e-8);
        assert_eq!(parsed.revolution_number, 56353);

        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(parsed.datetime, Utc);
        assert!((epoch - elements.epoch).num_milliseconds().abs() < 10);
    }

    #[test]
    fn test_record_validation() {
        let record = encode(&gps_like()).unwrap();
        let copy = TleRecord::new(record.line1(), record.line2()).unwrap();
        assert_eq!(copy, record);
        assert_eq!(copy.catalog_number(), 10002);

        let mut corrupted = record.line2().to_string();
        corrupted.replace_range(10..11, "6");
        assert!(matches!(
            TleRecord::new(record.line1(), corrupted),
            Err(OrbitalError::InvalidTle(_))
        ));

        assert!(TleRecord::new(record.line2(), record.line1()).is_err());
        assert!(TleRecord::new(&record.line1()[..60], record.line2()).is_err());
    }

    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    proptest! {
        #[test]
        fn prop_encoded_fields_recovered(
            altitude in altitude_meo(),
            inclination in inclination_deg(),
            eccentricity in eccentricity_circular(),
            raan in angle_deg(),
            argp in angle_deg(),
            mean_anomaly in angle_deg(),
            catalog in catalog_number(),
            revolutions in revolution_number(),
            epoch in epoch_utc(),
        ) {
            let body = crate::constellation::PlanetaryBody::EARTH;
            let a = body.semi_major_axis_km(altitude).unwrap();
            let elements = OrbitalElementSet {
                semi_major_axis_km: a,
                inclination_deg: inclination,
                eccentricity,
                raan_deg: raan,
                arg_periapsis_deg: argp,
                mean_anomaly_deg: mean_anomaly,
                mean_motion: body.mean_motion_rev_per_day(a).unwrap(),
                epoch,
                catalog_number: catalog,
                revolution_number: revolutions,
            };
            let record = encode(&elements).unwrap();
            prop_assert_eq!(record.line1().len(), 69);
            prop_assert_eq!(record.line2().len(), 69);

            let parsed = sgp4::Elements::from_tle(
                None,
                record.line1().as_bytes(),
                record.line2().as_bytes(),
            )
            .unwrap();

            prop_assert_eq!(parsed.norad_id, u64::from(catalog));
            prop_assert!((parsed.inclination - inclination).abs() < 1e-4);
            prop_assert!(angular_gap(parsed.right_ascension, raan) < 1e-4);
            prop_assert!((parsed.eccentricity - eccentricity).abs() < 1e-7);
            prop_assert!(angular_gap(parsed.argument_of_perigee, argp) < 1e-4);
            prop_assert!(angular_gap(parsed.mean_anomaly, mean_anomaly) < 1e-4);
            prop_assert!((parsed.mean_motion - elements.mean_motion).abs() < 1e-8);
            prop_assert_eq!(parsed.revolution_number, u64::from(revolutions));

            let recovered = DateTime::<Utc>::from_naive_utc_and_offset(parsed.datetime, Utc);
            prop_assert!((recovered - epoch).num_microseconds().unwrap_or(i64::MAX).abs() < 2_000);
        }
    }
}
