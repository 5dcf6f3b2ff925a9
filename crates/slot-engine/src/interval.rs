//! Half-open time intervals in the resource owner's wall-clock time.

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A half-open `[start, end)` window of owner-local time.
///
/// Timestamps are naive on purpose: callers normalize everything to the
/// owner's zone before handing it over, and calendar-day arithmetic in the
/// daily cap stage is done on these wall-clock values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Build an interval, rejecting `start > end`.
    ///
    /// Zero-length intervals are accepted; the pipeline treats them as no-ops.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(SlotError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both endpoints with [`parse_datetime`] and validate ordering.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_datetime(start)?, parse_datetime(end)?)
    }

    /// True when the interval covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when the two intervals share any time. Touching is not overlapping.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Check every interval for `start <= end`.
///
/// The pipeline never does this itself; callers run it at their boundary.
pub fn validate_intervals(intervals: &[Interval]) -> Result<()> {
    match intervals.iter().find(|iv| iv.start > iv.end) {
        Some(bad) => Err(SlotError::InvalidInterval {
            start: bad.start,
            end: bad.end,
        }),
        None => Ok(()),
    }
}

/// Parse an ISO 8601 datetime into owner-local wall time.
///
/// Accepts a naive local time (`2026-03-16T09:00:00`, optional fractional
/// seconds) or RFC 3339 with an offset, in which case the wall time as
/// written is kept and the offset is dropped.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}
