//! Availability rules: recurring declared-open windows.
//!
//! Owners usually declare availability as recurrence rules ("weekdays
//! 09:00–17:00") rather than as concrete intervals. This module turns such
//! rules into owner-local [`Interval`]s ready for
//! [`compute_availability`](crate::availability::compute_availability).
//! Expansion is delegated to the `rrule` crate; the zone is validated with
//! `chrono-tz` and instances are converted to wall time in that zone.

use chrono::Duration;
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::Interval;

/// Instance cap for rules with neither COUNT nor UNTIL.
const UNBOUNDED_LIMIT: u16 = 500;

/// One recurring availability declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    /// RFC 5545 RRULE body, e.g. `FREQ=WEEKLY;BYDAY=TU,TH`.
    pub rrule: String,
    /// First occurrence as local time, e.g. `2026-03-03T14:00:00`.
    pub dtstart: String,
    /// Length of each open window.
    pub duration_minutes: u32,
    /// Occurrences to leave out, same format as `dtstart`.
    #[serde(default)]
    pub exdates: Vec<String>,
}

/// Expand one rule into open windows in `timezone`'s wall time.
///
/// `until` (local datetime) and `max_count` are injected into the rule unless
/// it already carries UNTIL or COUNT.
///
/// # Errors
/// Returns `SlotError::InvalidRule` if the RRULE string is empty or unparseable.
/// Returns `SlotError::InvalidTimezone` if the timezone is not a valid IANA identifier.
pub fn expand_rule(
    rule: &AvailabilityRule,
    timezone: &str,
    until: Option<&str>,
    max_count: Option<u32>,
) -> Result<Vec<Interval>> {
    if rule.rrule.trim().is_empty() {
        return Err(SlotError::InvalidRule("empty RRULE string".to_string()));
    }
    if max_count == Some(0) {
        return Ok(Vec::new());
    }

    let _tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| SlotError::InvalidTimezone(timezone.to_string()))?;

    let rule_text = build_rule_text(rule, timezone, until, max_count);
    let rrule_set: RRuleSet = rule_text
        .parse()
        .map_err(|e| SlotError::InvalidRule(format!("{}", e)))?;

    // `.all(limit)` caps before EXDATE filtering, so leave room for exclusions.
    let exdate_buffer = u16::try_from(rule.exdates.len()).unwrap_or(u16::MAX);
    let limit = max_count
        .map(|c| u16::try_from(c).unwrap_or(u16::MAX).saturating_add(exdate_buffer))
        .unwrap_or(UNBOUNDED_LIMIT);

    let expanded = rrule_set.all(limit);
    if expanded.limited {
        tracing::debug!(rrule = %rule.rrule, limit, "rule expansion hit the instance limit");
    }

    let length = Duration::minutes(i64::from(rule.duration_minutes));
    let mut windows: Vec<Interval> = expanded
        .dates
        .into_iter()
        .map(|dt| Interval {
            start: dt.naive_local(),
            end: (dt + length).naive_local(),
        })
        .collect();

    if let Some(c) = max_count {
        windows.truncate(c as usize);
    }

    Ok(windows)
}

/// Expand every rule and concatenate the windows.
///
/// The result is not merged; overlapping rules are resolved by the pipeline.
pub fn expand_rules(
    rules: &[AvailabilityRule],
    timezone: &str,
    until: Option<&str>,
    max_count: Option<u32>,
) -> Result<Vec<Interval>> {
    let mut all = Vec::new();
    for rule in rules {
        all.extend(expand_rule(rule, timezone, until, max_count)?);
    }
    Ok(all)
}

/// Render DTSTART, RRULE and EXDATE lines in iCalendar form.
fn build_rule_text(
    rule: &AvailabilityRule,
    timezone: &str,
    until: Option<&str>,
    max_count: Option<u32>,
) -> String {
    let mut body = rule.rrule.trim().to_string();
    let upper = body.to_uppercase();

    if let Some(c) = max_count {
        if !upper.contains("COUNT=") {
            body = format!("{};COUNT={}", body, c);
        }
    }

    // UNTIL must share DTSTART's zone: "Z"-suffixed for UTC, bare local otherwise.
    if let Some(until) = until {
        if !upper.contains("UNTIL=") {
            let mut until_ical = to_ical(until);
            if timezone == "UTC" {
                until_ical.push('Z');
            }
            body = format!("{};UNTIL={}", body, until_ical);
        }
    }

    let mut text = format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        timezone,
        to_ical(&rule.dtstart),
        body
    );

    if !rule.exdates.is_empty() {
        let exdates: Vec<String> = rule.exdates.iter().map(|d| to_ical(d)).collect();
        text.push_str(&format!("\nEXDATE;TZID={}:{}", timezone, exdates.join(",")));
    }

    text
}

/// `2026-03-03T14:00:00` → `20260303T140000`.
fn to_ical(local: &str) -> String {
    local.replace(['-', ':'], "")
}
