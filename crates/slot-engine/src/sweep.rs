//! Subtract taken time from declared availability with a signed sweep.
//!
//! Every availability interval contributes `+1` at its start and `-1` at its
//! end; every taken interval contributes the mirror image. Walking the event
//! points in order with a running total, time is bookable exactly where the
//! total is positive.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::interval::Interval;
use crate::merge::merge_intervals;

/// Compute the time covered by `availability` but not by `taken`.
///
/// Both inputs may be unordered and overlapping; each is merged first so a
/// doubly-declared window does not outweigh a single booking. Returns an
/// ascending, pairwise-disjoint list with no zero-length entries.
pub fn subtract_taken(availability: &[Interval], taken: &[Interval]) -> Vec<Interval> {
    let available = merge_intervals(availability);
    if available.is_empty() {
        return Vec::new();
    }
    let taken = merge_intervals(taken);

    let mut deltas: BTreeMap<NaiveDateTime, i64> = BTreeMap::new();
    for iv in &available {
        *deltas.entry(iv.start).or_insert(0) += 1;
        *deltas.entry(iv.end).or_insert(0) -= 1;
    }
    for iv in &taken {
        *deltas.entry(iv.start).or_insert(0) -= 1;
        *deltas.entry(iv.end).or_insert(0) += 1;
    }

    // All deltas at one instant are already summed by the map, so the
    // threshold is never tested mid-timestamp.
    let mut open = Vec::new();
    let mut running: i64 = 0;
    let mut opened_at: Option<NaiveDateTime> = None;
    for (at, delta) in deltas {
        let before = running;
        running += delta;
        if before <= 0 && running > 0 {
            opened_at = Some(at);
        } else if before > 0 && running <= 0 {
            if let Some(start) = opened_at.take() {
                open.push(Interval { start, end: at });
            }
        }
    }

    open
}
