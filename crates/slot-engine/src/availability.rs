//! Bookable-window computation for a single schedulable resource.
//!
//! Runs the full pipeline: declared availability is merged, taken time is
//! swept out of it, and the remaining windows are trimmed first for minimum
//! notice and then for the per-day booking cap. The two constraint passes stay
//! separate and ordered; the cap pass re-checks days on whatever the notice
//! pass left behind.
//!
//! Everything here is a pure function of its arguments. `now` is passed in,
//! never read from the system clock, so the same inputs always produce the
//! same windows.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::daily_cap::{self, DailyCounts};
use crate::error::{Result, SlotError};
use crate::interval::Interval;
use crate::notice;
use crate::sweep;

/// Booking constraints configured on the resource.
///
/// `None` means unconstrained: zero notice, unlimited bookings per day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintSettings", into = "ConstraintSettings")]
pub struct Constraints {
    pub minimum_notice: Option<Duration>,
    pub max_per_day: Option<u32>,
}

impl Constraints {
    /// Build constraints, rejecting a negative notice.
    pub fn new(minimum_notice: Option<Duration>, max_per_day: Option<u32>) -> Result<Self> {
        if let Some(notice) = minimum_notice {
            if notice < Duration::zero() {
                return Err(SlotError::NegativeNotice(notice.num_minutes()));
            }
        }
        Ok(Self {
            minimum_notice,
            max_per_day,
        })
    }

    /// No notice and no daily cap.
    pub fn unconstrained() -> Self {
        Self::default()
    }
}

/// Wire form of [`Constraints`], with notice in whole minutes.
///
/// Converting from [`Constraints`] rounds a sub-minute notice up to the next
/// whole minute, so the wire form never asks for less lead time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSettings {
    #[serde(default)]
    pub minimum_notice_minutes: Option<i64>,
    #[serde(default)]
    pub max_per_day: Option<u32>,
}

impl TryFrom<ConstraintSettings> for Constraints {
    type Error = SlotError;

    fn try_from(settings: ConstraintSettings) -> Result<Self> {
        let minimum_notice = settings
            .minimum_notice_minutes
            .map(|m| Duration::try_minutes(m).ok_or(SlotError::NoticeOutOfRange(m)))
            .transpose()?;
        Constraints::new(minimum_notice, settings.max_per_day)
    }
}

impl From<Constraints> for ConstraintSettings {
    fn from(c: Constraints) -> Self {
        Self {
            minimum_notice_minutes: c.minimum_notice.map(whole_minutes_ceil),
            max_per_day: c.max_per_day,
        }
    }
}

fn whole_minutes_ceil(notice: Duration) -> i64 {
    let minutes = notice.num_minutes();
    match Duration::try_minutes(minutes) {
        Some(whole) if notice > whole => minutes + 1,
        _ => minutes,
    }
}

/// A computed window in report form, with its length in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration_minutes: i64,
}

impl From<&Interval> for BookableWindow {
    fn from(iv: &Interval) -> Self {
        Self {
            start: iv.start,
            end: iv.end,
            duration_minutes: iv.duration().num_minutes(),
        }
    }
}

/// Per-call values shared by the constraint stages.
struct Pipeline {
    earliest: NaiveDateTime,
    counts: DailyCounts,
}

impl Pipeline {
    fn new(taken: &[Interval], constraints: &Constraints, now: NaiveDateTime) -> Self {
        Self {
            earliest: notice::earliest_bookable(now, constraints.minimum_notice),
            counts: DailyCounts::from_taken(taken, constraints.max_per_day),
        }
    }

    fn run(&self, availability: &[Interval], taken: &[Interval]) -> Vec<Interval> {
        let open = sweep::subtract_taken(availability, taken);
        tracing::debug!(windows = open.len(), "subtracted taken time");

        let noticed = notice::apply_minimum_notice(open, self.earliest);
        tracing::debug!(
            windows = noticed.len(),
            earliest = %self.earliest,
            "applied minimum notice"
        );

        let capped = daily_cap::apply_daily_cap(noticed, &self.counts);
        tracing::debug!(
            windows = capped.len(),
            max_per_day = ?self.counts.max_per_day(),
            full_days = ?self.counts.full_days(),
            "applied daily cap"
        );

        capped
    }
}

/// Compute the windows a new booking can be placed into.
///
/// # Arguments
///
/// * `availability` — Declared open windows, unordered, possibly overlapping.
/// * `taken` — Confirmed bookings, unordered, possibly overlapping.
/// * `constraints` — Minimum notice and per-day cap.
/// * `now` — The current instant in the owner's zone, read once by the caller.
///
/// Returns an ascending, pairwise-disjoint list; empty when nothing is bookable.
/// Inputs must already satisfy `start <= end` (see
/// [`validate_intervals`](crate::interval::validate_intervals)).
pub fn compute_availability(
    availability: &[Interval],
    taken: &[Interval],
    constraints: &Constraints,
    now: NaiveDateTime,
) -> Vec<Interval> {
    let span = tracing::debug_span!(
        "compute_availability",
        availability = availability.len(),
        taken = taken.len(),
        %now
    );
    let _enter = span.enter();

    Pipeline::new(taken, constraints, now).run(availability, taken)
}

/// Find the first bookable window of at least `min_duration`.
///
/// Delegates to [`compute_availability`] and returns the first window meeting
/// the minimum length.
pub fn find_first_bookable(
    availability: &[Interval],
    taken: &[Interval],
    constraints: &Constraints,
    now: NaiveDateTime,
    min_duration: Duration,
) -> Option<Interval> {
    compute_availability(availability, taken, constraints, now)
        .into_iter()
        .find(|w| w.duration() >= min_duration)
}
