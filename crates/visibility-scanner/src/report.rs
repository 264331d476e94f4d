//! Report writers
//!
//! CSV layouts (header first, one row per record, RFC 3339 timestamps):
//!
//! | report       | columns                          |
//! |--------------|----------------------------------|
//! | aggregate    | `time,numVisible,sats`           |
//! | detail       | `time,sat name,x,y,z,el,dis`     |
//! | route        | `time,x,y,z`                     |
//! | ground track | `time,lon,lat`                   |
//!
//! Aggregate `sats` holds the visible names joined by `", "`.

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use orbital_mechanics::GroundTrackSample;

use crate::scanner::{AggregateRecord, DetailRecord, RouteSample};
use crate::Result;

const NAME_SEPARATOR: &str = ", ";

#[derive(Serialize)]
struct AggregateRow {
    time: DateTime<Utc>,
    #[serde(rename = "numVisible")]
    num_visible: usize,
    sats: String,
}

#[derive(Serialize, Deserialize)]
struct DetailRow {
    time: DateTime<Utc>,
    #[serde(rename = "sat name")]
    sat_name: String,
    x: f64,
    y: f64,
    z: f64,
    el: f64,
    dis: f64,
}

#[derive(Serialize)]
struct RouteRow {
    time: DateTime<Utc>,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize)]
struct TrackRow {
    time: DateTime<Utc>,
    lon: f64,
    lat: f64,
}

pub fn write_aggregate_csv<W: Write>(writer: W, records: &[AggregateRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(AggregateRow {
            time: record.timestamp,
            num_visible: record.visible_count,
            sats: record.visible.join(NAME_SEPARATOR),
        })?;
    }
    if records.is_empty() {
        csv_writer.write_record(["time", "numVisible", "sats"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_detail_csv<W: Write>(writer: W, records: &[DetailRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(DetailRow {
            time: record.timestamp,
            sat_name: record.name.clone(),
            x: record.position.x,
            y: record.position.y,
            z: record.position.z,
            el: record.elevation_deg,
            dis: record.range_km,
        })?;
    }
    if records.is_empty() {
        csv_writer.write_record(["time", "sat name", "x", "y", "z", "el", "dis"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read detail rows back, e.g. to summarize an earlier scan
pub fn read_detail_csv<R: Read>(reader: R) -> Result<Vec<DetailRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize::<DetailRow>() {
        let row = row?;
        records.push(DetailRecord {
            timestamp: row.time,
            name: row.sat_name,
            position: Vector3::new(row.x, row.y, row.z),
            elevation_deg: row.el,
            range_km: row.dis,
        });
    }
    Ok(records)
}

pub fn write_route_csv<W: Write>(writer: W, samples: &[RouteSample]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for sample in samples {
        csv_writer.serialize(RouteRow {
            time: sample.timestamp,
            x: sample.position.x,
            y: sample.position.y,
            z: sample.position.z,
        })?;
    }
    if samples.is_empty() {
        csv_writer.write_record(["time", "x", "y", "z"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_ground_track_csv<W: Write>(writer: W, samples: &[GroundTrackSample]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for sample in samples {
        csv_writer.serialize(TrackRow {
            time: sample.timestamp,
            lon: sample.longitude,
            lat: sample.latitude,
        })?;
    }
    if samples.is_empty() {
        csv_writer.write_record(["time", "lon", "lat"])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Pretty-printed JSON of any serializable report value
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}
