//! Half-open time intervals.
//!
//! An [`Interval`] is `[start, end)`: two intervals that only touch at an
//! endpoint do not overlap. Construction rejects `start > end`; the fields are
//! private so every live `Interval` satisfies the invariant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IntervalError;

/// A half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create an interval, failing if `start` is later than `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval of `minutes` length starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, minutes: i64) -> Result<Self, IntervalError> {
        let end = Duration::try_minutes(minutes)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or(IntervalError::OutOfRange { start, minutes })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in whole minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True for zero-length intervals.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if two intervals share any instant. Touching endpoints do not.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if `inner` lies entirely within this interval.
    pub fn contains(&self, inner: &Interval) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }

    /// Check if an instant lies inside `[start, end)`.
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// The overlapping part of two intervals, if they overlap.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Minutes from the end of `earlier` to the start of `later`.
    ///
    /// Negative when the two overlap.
    pub fn gap_minutes(earlier: &Interval, later: &Interval) -> i64 {
        (later.start - earlier.end).num_minutes()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Free-function form of [`Interval::overlaps`].
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Free-function form of [`Interval::contains`].
pub fn contains(outer: &Interval, inner: &Interval) -> bool {
    outer.contains(inner)
}

/// Free-function form of [`Interval::duration_minutes`].
pub fn duration_minutes(interval: &Interval) -> i64 {
    interval.duration_minutes()
}
