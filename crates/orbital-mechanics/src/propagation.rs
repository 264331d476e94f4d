//! Position oracles
//!
//! A [`PositionOracle`] resolves a catalog entry at an instant into a position
//! vector (km). All positions returned by one oracle share one [`Frame`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::CatalogEntry;
use crate::tle::TleRecord;
use crate::{OrbitalError, Result};

/// Reference frame of oracle positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    /// Earth-centered inertial (TEME for SGP4)
    Inertial,
    /// Earth-centered, Earth-fixed
    EarthFixed,
}

pub trait PositionOracle {
    fn frame(&self) -> Frame;

    fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>>;
}

impl<T: PositionOracle + ?Sized> PositionOracle for &T {
    fn frame(&self) -> Frame {
        (**self).frame()
    }

    fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>> {
        (**self).position_at(entry, instant)
    }
}

fn oracle_error(entry: &CatalogEntry, instant: DateTime<Utc>, reason: impl Into<String>) -> OrbitalError {
    OrbitalError::Oracle {
        object: entry.name.clone(),
        instant,
        reason: reason.into(),
    }
}

/// SGP4 state prepared from one record
struct Prepared {
    constants: sgp4::Constants,
    epoch: DateTime<Utc>,
}

impl Prepared {
    fn from_record(record: &TleRecord) -> std::result::Result<Self, String> {
        let elements = sgp4::Elements::from_tle(
            None,
            record.line1().as_bytes(),
            record.line2().as_bytes(),
        )
        .map_err(|e| format!("Invalid TLE: {:?}", e))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| format!("Propagator setup failed: {:?}", e))?;

        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Self { constants, epoch })
    }

    fn propagate(&self, instant: DateTime<Utc>) -> std::result::Result<Vector3<f64>, String> {
        let minutes_since_epoch =
            instant.signed_duration_since(self.epoch).num_milliseconds() as f64 / 60_000.0;

        let prediction = self
            .constants
            .propagate(minutes_since_epoch)
            .map_err(|e| format!("Propagation failed: {:?}", e))?;

        Ok(Vector3::new(
            prediction.position[0],
            prediction.position[1],
            prediction.position[2],
        ))
    }
}

/// SGP4 oracle with per-record propagator state prepared once
///
/// Entries registered through [`Sgp4Oracle::new`] reuse their prepared state;
/// any other entry is prepared on each call.
#[derive(Default)]
pub struct Sgp4Oracle {
    prepared: HashMap<TleRecord, std::result::Result<Prepared, String>>,
}

impl Sgp4Oracle {
    pub fn new<'a>(catalog: impl IntoIterator<Item = &'a CatalogEntry>) -> Self {
        let mut prepared = HashMap::new();
        for entry in catalog {
            let state = Prepared::from_record(&entry.record);
            if let Err(reason) = &state {
                warn!("{} cannot be propagated: {}", entry.name, reason);
            }
            prepared.insert(entry.record.clone(), state);
        }
        debug!("SGP4 oracle prepared {} records", prepared.len());
        Self { prepared }
    }

    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }
}

impl PositionOracle for Sgp4Oracle {
    fn frame(&self) -> Frame {
        Frame::Inertial
    }

    fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>> {
        let position = match self.prepared.get(&entry.record) {
            Some(Ok(state)) => state.propagate(instant),
            Some(Err(reason)) => Err(reason.clone()),
            None => Prepared::from_record(&entry.record).and_then(|s| s.propagate(instant)),
        };
        position.map_err(|reason| oracle_error(entry, instant, reason))
    }
}

/// Positions tabulated per (instant, record)
///
/// Wraps an expensive oracle: every position is resolved once up front and
/// later lookups are table reads. Instants or records that were not tabulated
/// fail with [`OrbitalError::Oracle`].
pub struct Ephemeris {
    frame: Frame,
    index: HashMap<TleRecord, usize>,
    table: HashMap<DateTime<Utc>, Vec<std::result::Result<Vector3<f64>, String>>>,
}

impl Ephemeris {
    pub fn tabulate<O: PositionOracle>(
        oracle: &O,
        catalog: &[CatalogEntry],
        instants: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> Self {
        let index = catalog
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.record.clone(), i))
            .collect();

        let table: HashMap<_, _> = instants
            .into_iter()
            .map(|instant| {
                let row = catalog
                    .iter()
                    .map(|entry| {
                        oracle.position_at(entry, instant).map_err(|e| match e {
                            OrbitalError::Oracle { reason, .. } => reason,
                            other => other.to_string(),
                        })
                    })
                    .collect();
                (instant, row)
            })
            .collect();

        debug!(
            "Ephemeris tabulated {} instants x {} objects",
            table.len(),
            catalog.len()
        );

        Self {
            frame: oracle.frame(),
            index,
            table,
        }
    }

    pub fn instants(&self) -> usize {
        self.table.len()
    }
}

impl PositionOracle for Ephemeris {
    fn frame(&self) -> Frame {
        self.frame
    }

    fn position_at(&self, entry: &CatalogEntry, instant: DateTime<Utc>) -> Result<Vector3<f64>> {
        let column = self
            .index
            .get(&entry.record)
            .ok_or_else(|| oracle_error(entry, instant, "object not tabulated"))?;
        let row = self
            .table
            .get(&instant)
            .ok_or_else(|| oracle_error(entry, instant, "instant not tabulated"))?;

        match &row[*column] {
            Ok(position) => Ok(*position),
            Err(reason) => Err(oracle_error(entry, instant, reason.clone())),
        }
    }
}
