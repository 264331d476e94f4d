//! Evenly spaced UTC sample instants

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use orbital_mechanics::OrbitalError;

use crate::Result;

/// Minutes in one UTC calendar day
pub const MINUTES_PER_DAY: usize = 1440;

/// `count` instants `start + i·step`
///
/// Iteration is lazy and restartable; the grid itself never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    start: DateTime<Utc>,
    step: Duration,
    count: usize,
}

impl TimeGrid {
    pub fn new(start: DateTime<Utc>, step: Duration, count: usize) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(OrbitalError::InvalidInput(format!(
                "grid step must be positive, got {step}"
            ))
            .into());
        }
        let span = i32::try_from(count.saturating_sub(1))
            .ok()
            .and_then(|n| step.checked_mul(n))
            .and_then(|span| start.checked_add_signed(span));
        if span.is_none() {
            return Err(OrbitalError::InvalidInput(format!(
                "{count} steps of {step} from {start} overflow the calendar"
            ))
            .into());
        }
        Ok(Self { start, step, count })
    }

    /// One UTC calendar day at one-minute resolution
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(NaiveTime::MIN).and_utc(),
            step: Duration::minutes(1),
            count: MINUTES_PER_DAY,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Instant `index`, or `None` past the end
    pub fn instant(&self, index: usize) -> Option<DateTime<Utc>> {
        if index >= self.count {
            return None;
        }
        let n = i32::try_from(index).ok()?;
        self.start.checked_add_signed(self.step.checked_mul(n)?)
    }

    pub fn iter(&self) -> Instants {
        Instants {
            grid: *self,
            next: 0,
        }
    }
}

/// Iterator over the instants of a [`TimeGrid`]
#[derive(Debug, Clone)]
pub struct Instants {
    grid: TimeGrid,
    next: usize,
}

impl Iterator for Instants {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let instant = self.grid.instant(self.next)?;
        self.next += 1;
        Some(instant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Instants {}

impl IntoIterator for &TimeGrid {
    type Item = DateTime<Utc>;
    type IntoIter = Instants;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TimeGrid {
    type Item = DateTime<Utc>;
    type IntoIter = Instants;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
