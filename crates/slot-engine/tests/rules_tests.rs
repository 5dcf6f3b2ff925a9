//! Tests for expanding recurring availability rules into intervals.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use slot_engine::{
    compute_availability, expand_rule, expand_rules, AvailabilityRule, Constraints, Interval,
    SlotError,
};

fn at(month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn rule(rrule: &str, dtstart: &str, duration_minutes: u32) -> AvailabilityRule {
    AvailabilityRule {
        rrule: rrule.to_string(),
        dtstart: dtstart.to_string(),
        duration_minutes,
        exdates: Vec::new(),
    }
}

fn dates(windows: &[Interval]) -> Vec<(u32, u32)> {
    windows
        .iter()
        .map(|w| (w.start.month(), w.start.day()))
        .collect()
}

#[test]
fn daily_rule_produces_one_window_per_day() {
    let windows = expand_rule(
        &rule("FREQ=DAILY;COUNT=3", "2026-03-02T09:00:00", 480),
        "UTC",
        None,
        None,
    )
    .expect("should expand");

    assert_eq!(
        windows,
        vec![
            Interval::new(at(3, 2, 9, 0), at(3, 2, 17, 0)).unwrap(),
            Interval::new(at(3, 3, 9, 0), at(3, 3, 17, 0)).unwrap(),
            Interval::new(at(3, 4, 9, 0), at(3, 4, 17, 0)).unwrap(),
        ]
    );
}

#[test]
fn weekly_rule_respects_byday() {
    let windows = expand_rule(
        &rule("FREQ=WEEKLY;BYDAY=TU,TH;COUNT=4", "2026-03-03T14:00:00", 120),
        "UTC",
        None,
        None,
    )
    .expect("should expand");

    assert_eq!(dates(&windows), vec![(3, 3), (3, 5), (3, 10), (3, 12)]);
    assert!(windows.iter().all(|w| w.duration().num_minutes() == 120));
}

#[test]
fn wall_time_is_kept_across_dst() {
    // US clocks spring forward on 2026-03-08; the window stays at 09:00 local.
    let windows = expand_rule(
        &rule("FREQ=DAILY;COUNT=4", "2026-03-06T09:00:00", 60),
        "America/New_York",
        None,
        None,
    )
    .expect("should expand");

    assert_eq!(windows.len(), 4);
    for (w, d) in windows.iter().zip(6..) {
        assert_eq!(w.start, at(3, d, 9, 0));
        assert_eq!(w.end, at(3, d, 10, 0));
    }
}

#[test]
fn exdates_remove_occurrences() {
    let mut weekly = rule("FREQ=WEEKLY;BYDAY=TU", "2026-03-03T10:00:00", 60);
    weekly.exdates = vec!["2026-03-10T10:00:00".to_string()];

    let windows = expand_rule(&weekly, "UTC", Some("2026-03-24T23:59:59"), None)
        .expect("should expand with exdates");

    assert_eq!(dates(&windows), vec![(3, 3), (3, 17), (3, 24)]);
}

#[test]
fn until_boundary_limits_expansion() {
    let windows = expand_rule(
        &rule("FREQ=DAILY", "2026-03-01T09:00:00", 30),
        "UTC",
        Some("2026-03-04T23:59:59"),
        None,
    )
    .expect("should expand with until boundary");

    assert_eq!(windows.len(), 4);
}

#[test]
fn max_count_truncates() {
    let windows = expand_rule(
        &rule("FREQ=DAILY", "2026-03-01T09:00:00", 30),
        "UTC",
        None,
        Some(2),
    )
    .expect("should expand");
    assert_eq!(windows.len(), 2);
}

#[test]
fn max_count_zero_returns_empty() {
    let windows = expand_rule(
        &rule("FREQ=DAILY", "2026-03-01T09:00:00", 30),
        "UTC",
        None,
        Some(0),
    )
    .expect("zero count should succeed");
    assert!(windows.is_empty());
}

#[test]
fn unbounded_rule_is_capped() {
    let windows = expand_rule(
        &rule("FREQ=DAILY", "2026-03-01T09:00:00", 30),
        "UTC",
        None,
        None,
    )
    .expect("should expand");
    assert_eq!(windows.len(), 500);
}

#[test]
fn empty_rrule_returns_error() {
    let result = expand_rule(&rule("", "2026-03-01T09:00:00", 30), "UTC", None, None);
    assert!(matches!(result, Err(SlotError::InvalidRule(_))));
}

#[test]
fn invalid_timezone_returns_error() {
    let result = expand_rule(
        &rule("FREQ=DAILY;COUNT=1", "2026-03-01T09:00:00", 30),
        "Mars/Olympus_Mons",
        None,
        None,
    );
    assert!(matches!(result, Err(SlotError::InvalidTimezone(_))));
}

#[test]
fn overlapping_rules_feed_the_pipeline_as_one_window() {
    // A full-day rule and a lunchtime rule on the same days.
    let rules = [
        rule("FREQ=DAILY;COUNT=2", "2026-03-02T09:00:00", 480),
        rule("FREQ=DAILY;COUNT=2", "2026-03-02T12:00:00", 60),
    ];
    let availability = expand_rules(&rules, "UTC", None, None).expect("should expand");
    assert_eq!(availability.len(), 4);

    let windows = compute_availability(
        &availability,
        &[],
        &Constraints::unconstrained(),
        at(3, 1, 0, 0),
    );
    assert_eq!(
        windows,
        vec![
            Interval::new(at(3, 2, 9, 0), at(3, 2, 17, 0)).unwrap(),
            Interval::new(at(3, 3, 9, 0), at(3, 3, 17, 0)).unwrap(),
        ]
    );
}

#[test]
fn rule_deserializes_without_exdates() {
    let parsed: AvailabilityRule = serde_json::from_str(
        r#"{"rrule":"FREQ=DAILY","dtstart":"2026-03-01T09:00:00","duration_minutes":30}"#,
    )
    .unwrap();
    assert!(parsed.exdates.is_empty());
    assert_eq!(parsed.duration_minutes, 30);
}
