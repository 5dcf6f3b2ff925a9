//! Minimum-notice trimming.

use chrono::{Duration, NaiveDateTime};

use crate::interval::Interval;

/// The earliest instant a new booking may start.
///
/// A notice reaching past the representable range saturates to
/// `NaiveDateTime::MAX`, so nothing is bookable.
pub fn earliest_bookable(now: NaiveDateTime, minimum_notice: Option<Duration>) -> NaiveDateTime {
    match minimum_notice {
        Some(notice) => now
            .checked_add_signed(notice)
            .unwrap_or(NaiveDateTime::MAX),
        None => now,
    }
}

/// Trim or drop windows so that none starts before `earliest`.
///
/// A window ending before `earliest` is dropped; one straddling it is clamped
/// to start there. A window whose end equals `earliest` clamps to zero length
/// and is dropped as well.
pub fn apply_minimum_notice(windows: Vec<Interval>, earliest: NaiveDateTime) -> Vec<Interval> {
    windows
        .into_iter()
        .filter(|w| w.end >= earliest)
        .map(|w| Interval {
            start: w.start.max(earliest),
            end: w.end,
        })
        .filter(|w| !w.is_empty())
        .collect()
}
