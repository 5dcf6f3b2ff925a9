//! # slot-engine-python
//!
//! Python bindings for slot-engine, built with PyO3.
//!
//! Exposes the following functions to Python as the `_native` module:
//!
//! - `compute_availability(...)` -- bookable windows -> JSON string
//! - `find_first_bookable(...)` -- first window of a minimum length -> JSON string
//! - `expand_availability_rules(...)` -- recurring rules -> JSON string of intervals

use chrono::{Duration, NaiveDateTime};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use slot_engine::{AvailabilityRule, BookableWindow, Constraints, Interval};

#[derive(serde::Deserialize)]
struct IntervalInput {
    start: String,
    end: String,
}

fn value_error(e: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_intervals(json: &str, what: &str) -> PyResult<Vec<Interval>> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid {} JSON: {}", what, e)))?;
    inputs
        .into_iter()
        .map(|i| Interval::parse(&i.start, &i.end).map_err(value_error))
        .collect()
}

fn constraints(minimum_notice_minutes: Option<i64>, max_per_day: Option<u32>) -> PyResult<Constraints> {
    let notice = minimum_notice_minutes
        .map(|m| {
            Duration::try_minutes(m)
                .ok_or_else(|| PyValueError::new_err(format!("Minimum notice out of range: {}", m)))
        })
        .transpose()?;
    Constraints::new(notice, max_per_day).map_err(value_error)
}

/// Pipeline inputs decoded from the Python arguments.
struct Request {
    availability: Vec<Interval>,
    taken: Vec<Interval>,
    constraints: Constraints,
    now: NaiveDateTime,
}

fn parse_request(
    availability_json: &str,
    taken_json: &str,
    now: &str,
    minimum_notice_minutes: Option<i64>,
    max_per_day: Option<u32>,
) -> PyResult<Request> {
    Ok(Request {
        availability: parse_intervals(availability_json, "availability")?,
        taken: parse_intervals(taken_json, "taken")?,
        constraints: constraints(minimum_notice_minutes, max_per_day)?,
        now: slot_engine::parse_datetime(now).map_err(value_error)?,
    })
}

/// Compute the bookable windows for a resource.
///
/// Args:
///     availability_json: JSON array of `{start, end}` declared-open windows.
///     taken_json: JSON array of `{start, end}` confirmed bookings.
///     now: Current time in the owner's zone (ISO 8601).
///     minimum_notice_minutes: Optional minimum lead time.
///     max_per_day: Optional maximum bookings starting on one day.
///
/// Returns:
///     A JSON string containing an array of `{start, end, duration_minutes}`.
///
/// Raises:
///     ValueError: If the JSON is malformed, a datetime is invalid, an
///         interval ends before it starts, or the notice is negative.
#[pyfunction]
#[pyo3(signature = (availability_json, taken_json, now, minimum_notice_minutes=None, max_per_day=None))]
fn compute_availability(
    availability_json: &str,
    taken_json: &str,
    now: &str,
    minimum_notice_minutes: Option<i64>,
    max_per_day: Option<u32>,
) -> PyResult<String> {
    let req = parse_request(
        availability_json,
        taken_json,
        now,
        minimum_notice_minutes,
        max_per_day,
    )?;
    let found =
        slot_engine::compute_availability(&req.availability, &req.taken, &req.constraints, req.now);
    let dtos: Vec<BookableWindow> = found.iter().map(BookableWindow::from).collect();
    serde_json::to_string(&dtos)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Find the first bookable window of at least `min_duration_minutes`.
///
/// Args:
///     Same as `compute_availability`, plus `min_duration_minutes`.
///
/// Returns:
///     A JSON string with `{start, end, duration_minutes}` or `"null"` if none fits.
#[pyfunction]
#[pyo3(signature = (availability_json, taken_json, now, min_duration_minutes, minimum_notice_minutes=None, max_per_day=None))]
fn find_first_bookable(
    availability_json: &str,
    taken_json: &str,
    now: &str,
    min_duration_minutes: i64,
    minimum_notice_minutes: Option<i64>,
    max_per_day: Option<u32>,
) -> PyResult<String> {
    let min_duration = Duration::try_minutes(min_duration_minutes)
        .ok_or_else(|| PyValueError::new_err("min_duration_minutes out of range"))?;
    let req = parse_request(
        availability_json,
        taken_json,
        now,
        minimum_notice_minutes,
        max_per_day,
    )?;
    let found = slot_engine::find_first_bookable(
        &req.availability,
        &req.taken,
        &req.constraints,
        req.now,
        min_duration,
    );

    match found {
        Some(w) => serde_json::to_string(&BookableWindow::from(&w))
            .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e))),
        None => Ok("null".to_string()),
    }
}

/// Expand recurring availability rules into concrete windows.
///
/// Args:
///     rules_json: JSON array of `{rrule, dtstart, duration_minutes, exdates?}`.
///     timezone: IANA timezone identifier (e.g., "America/Los_Angeles").
///     until: Optional end boundary for expansion (local datetime string).
///     max_count: Optional maximum number of instances per rule.
///
/// Returns:
///     A JSON string containing an array of `{start, end}` in local wall time.
///
/// Raises:
///     ValueError: If the rules JSON, an RRULE, or the timezone is invalid.
#[pyfunction]
#[pyo3(signature = (rules_json, timezone, until=None, max_count=None))]
fn expand_availability_rules(
    rules_json: &str,
    timezone: &str,
    until: Option<&str>,
    max_count: Option<u32>,
) -> PyResult<String> {
    let rules: Vec<AvailabilityRule> = serde_json::from_str(rules_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid rules JSON: {}", e)))?;
    let intervals =
        slot_engine::expand_rules(&rules, timezone, until, max_count).map_err(value_error)?;
    serde_json::to_string(&intervals)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// The native extension module, exposed as `slot_engine._native`.
#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_availability, m)?)?;
    m.add_function(wrap_pyfunction!(find_first_bookable, m)?)?;
    m.add_function(wrap_pyfunction!(expand_availability_rules, m)?)?;
    Ok(())
}
