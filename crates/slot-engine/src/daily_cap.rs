//! Per-day booking cap.
//!
//! Capacity is counted per calendar day, so windows are trimmed at day
//! granularity: an endpoint that lands on a full day is moved to the nearest
//! day that still has room, searching inward from that endpoint.

use std::collections::HashMap;
use std::iter;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::interval::Interval;

/// Taken bookings per calendar day, paired with the cap they are checked against.
#[derive(Debug, Clone, Default)]
pub struct DailyCounts {
    per_day: HashMap<NaiveDate, u32>,
    max_per_day: Option<u32>,
}

impl DailyCounts {
    /// Count each taken booking against the day its start falls on.
    ///
    /// A booking that runs past midnight is charged only to its first day.
    /// Zero-length bookings occupy nothing and are not counted.
    pub fn from_taken(taken: &[Interval], max_per_day: Option<u32>) -> Self {
        let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
        for booking in taken.iter().filter(|b| !b.is_empty()) {
            *per_day.entry(booking.start.date()).or_insert(0) += 1;
        }
        Self {
            per_day,
            max_per_day,
        }
    }

    pub fn max_per_day(&self) -> Option<u32> {
        self.max_per_day
    }

    /// Bookings already starting on `day`.
    pub fn taken_on(&self, day: NaiveDate) -> u32 {
        self.per_day.get(&day).copied().unwrap_or(0)
    }

    /// Whether `day` is still below the cap. Always true without a cap.
    pub fn can_take_more(&self, day: NaiveDate) -> bool {
        match self.max_per_day {
            Some(max) => self.taken_on(day) < max,
            None => true,
        }
    }

    /// Days with bookings that have reached the cap, ascending.
    pub fn full_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self
            .per_day
            .keys()
            .copied()
            .filter(|day| !self.can_take_more(*day))
            .collect();
        days.sort();
        days
    }
}

/// Trim or drop windows whose start or end day has reached the cap.
///
/// The start is adjusted first, then the end of the adjusted window; either
/// step can drop the window when no day in range has room left.
pub fn apply_daily_cap(windows: Vec<Interval>, counts: &DailyCounts) -> Vec<Interval> {
    if counts.max_per_day.is_none() {
        return windows;
    }

    windows
        .into_iter()
        .filter_map(|w| cap_window(w, counts))
        .filter(|w| !w.is_empty())
        .collect()
}

fn cap_window(mut window: Interval, counts: &DailyCounts) -> Option<Interval> {
    let start_day = window.start.date();
    if !counts.can_take_more(start_day) {
        let end_day = window.end.date();
        let Some(day) = days_after(start_day)
            .take_while(|d| *d <= end_day)
            .find(|d| counts.can_take_more(*d))
        else {
            tracing::trace!(start = %window.start, end = %window.end, "dropped: no open day from start");
            return None;
        };
        window.start = start_of_day(day);
    }

    let end_day = window.end.date();
    if !counts.can_take_more(end_day) {
        let floor = window.start.date();
        let Some(day) = days_before(end_day)
            .take_while(|d| *d >= floor)
            .find(|d| counts.can_take_more(*d))
        else {
            tracing::trace!(start = %window.start, end = %window.end, "dropped: no open day from end");
            return None;
        };
        window.end = end_of_day(day);
    }

    Some(window)
}

fn days_after(day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    iter::successors(day.succ_opt(), |d| d.succ_opt())
}

fn days_before(day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    iter::successors(day.pred_opt(), |d| d.pred_opt())
}

/// Midnight at the beginning of `day`.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// The last representable instant of `day` (23:59:59.999999999).
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    start_of_day(day) + Duration::days(1) - Duration::nanoseconds(1)
}
