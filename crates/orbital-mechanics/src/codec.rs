//! Epoch and checksum codec for two-line element text
//!
//! - Epoch: `YYDDD.DDDDDDDD` (two-digit year, day of year, 8-decimal fraction)
//! - Checksum: mod-10 sum over columns 1-68, digits count their value and
//!   `-` counts 1

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use crate::{OrbitalError, Result, SECONDS_PER_DAY};

/// Columns covered by the checksum
pub const CHECKSUM_COLUMNS: usize = 68;

/// Full line length including the checksum digit
pub const LINE_LENGTH: usize = CHECKSUM_COLUMNS + 1;

/// Largest fraction representable with 8 decimals without rolling the day over
const MAX_FRACTION_UNITS: u64 = 99_999_999;

/// Encode an absolute timestamp as a TLE epoch
pub fn encode_epoch(epoch: &DateTime<Utc>) -> String {
    let year = epoch.year().rem_euclid(100);
    let day_of_year = epoch.ordinal();

    let whole_seconds = epoch.hour() * 3600 + epoch.minute() * 60 + epoch.second();
    let micros = epoch.nanosecond() / 1_000;
    let fraction = (whole_seconds as f64 + micros as f64 / 1e6) / SECONDS_PER_DAY;

    let units = ((fraction * 1e8).round() as u64).min(MAX_FRACTION_UNITS);

    format!("{:02}{:03}.{:08}", year, day_of_year, units)
}

/// Parse an RFC 3339 timestamp into UTC
///
/// Timestamps without an offset are rejected: an epoch has to be pinned to
/// one absolute time scale.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok());

    if naive {
        Err(OrbitalError::InvalidInput(format!(
            "timestamp '{text}' lacks a timezone"
        )))
    } else {
        Err(OrbitalError::InvalidInput(format!(
            "malformed timestamp '{text}'"
        )))
    }
}

/// Checksum digit of a TLE line
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = line
        .chars()
        .take(CHECKSUM_COLUMNS)
        .map(|c| match c {
            '0'..='9' => c as u32 - '0' as u32,
            '-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}

/// Fit a line to 68 columns and append its checksum digit
pub fn with_checksum(line: &str) -> String {
    let mut fitted: String = line.chars().take(CHECKSUM_COLUMNS).collect();
    let width = fitted.chars().count();
    fitted.extend(std::iter::repeat(' ').take(CHECKSUM_COLUMNS - width));

    let digit = checksum(&fitted);
    fitted.push(char::from(b'0' + digit));
    fitted
}

/// Check the trailing digit of a full 69-column line
pub fn verify_checksum(line: &str) -> bool {
    if line.len() != LINE_LENGTH || !line.is_ascii() {
        return false;
    }
    match line.as_bytes()[CHECKSUM_COLUMNS] {
        d @ b'0'..=b'9' => d - b'0' == checksum(line),
        _ => false,
    }
}
