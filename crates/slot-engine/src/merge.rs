//! Collapse overlapping or touching intervals into a minimal disjoint list.

use crate::interval::Interval;

/// Merge overlapping or adjacent intervals.
///
/// Returns an ascending, pairwise-disjoint list. Zero-length intervals are kept
/// and take part in merging like any other interval; the sweep stage is where
/// they cancel out.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                // Overlapping or adjacent: extend the current run.
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(iv);
    }

    merged
}
