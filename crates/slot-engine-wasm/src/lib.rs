//! WASM bindings for slot-engine.
//!
//! Exposes bookable-window computation and availability rule expansion to
//! JavaScript via `wasm-bindgen`. All complex types cross the boundary as JSON
//! strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use slot_engine::{AvailabilityRule, BookableWindow, Constraints, Interval};
use wasm_bindgen::prelude::*;

/// Input format for intervals passed from JavaScript.
#[derive(Deserialize)]
struct IntervalInput {
    start: String,
    end: String,
}

/// Convert a JSON array of `{start, end}` objects into validated intervals.
fn parse_intervals_json(json: &str, what: &str) -> Result<Vec<Interval>, String> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(json)
        .map_err(|e| format!("Invalid {} JSON: {}", what, e))?;

    inputs
        .into_iter()
        .map(|input| Interval::parse(&input.start, &input.end).map_err(|e| e.to_string()))
        .collect()
}

/// Parse `{minimum_notice_minutes, max_per_day}`; an empty string means unconstrained.
fn parse_constraints_json(json: &str) -> Result<Constraints, String> {
    if json.trim().is_empty() {
        return Ok(Constraints::unconstrained());
    }
    serde_json::from_str(json).map_err(|e| format!("Invalid constraints JSON: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

/// Pipeline inputs decoded from the JSON arguments.
struct Request {
    availability: Vec<Interval>,
    taken: Vec<Interval>,
    constraints: Constraints,
    now: NaiveDateTime,
}

fn parse_request(
    availability_json: &str,
    taken_json: &str,
    constraints_json: &str,
    now: &str,
) -> Result<Request, String> {
    Ok(Request {
        availability: parse_intervals_json(availability_json, "availability")?,
        taken: parse_intervals_json(taken_json, "taken")?,
        constraints: parse_constraints_json(constraints_json)?,
        now: slot_engine::parse_datetime(now).map_err(|e| e.to_string())?,
    })
}

fn compute_availability_json(
    availability_json: &str,
    taken_json: &str,
    constraints_json: &str,
    now: &str,
) -> Result<String, String> {
    let req = parse_request(availability_json, taken_json, constraints_json, now)?;
    let windows =
        slot_engine::compute_availability(&req.availability, &req.taken, &req.constraints, req.now);
    let dtos: Vec<BookableWindow> = windows.iter().map(BookableWindow::from).collect();
    to_json(&dtos)
}

fn find_first_bookable_json(
    availability_json: &str,
    taken_json: &str,
    constraints_json: &str,
    now: &str,
    min_minutes: u32,
) -> Result<String, String> {
    let req = parse_request(availability_json, taken_json, constraints_json, now)?;
    let first = slot_engine::find_first_bookable(
        &req.availability,
        &req.taken,
        &req.constraints,
        req.now,
        Duration::minutes(i64::from(min_minutes)),
    )
    .map(|w| BookableWindow::from(&w));
    to_json(&first)
}

fn expand_rules_json(
    rules_json: &str,
    timezone: &str,
    until: Option<&str>,
    max_count: Option<u32>,
) -> Result<String, String> {
    let rules: Vec<AvailabilityRule> =
        serde_json::from_str(rules_json).map_err(|e| format!("Invalid rules JSON: {}", e))?;
    let intervals = slot_engine::expand_rules(&rules, timezone, until, max_count)
        .map_err(|e| e.to_string())?;
    to_json(&intervals)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the bookable windows for a resource.
///
/// `availability_json` and `taken_json` are JSON arrays of `{start, end}`
/// objects in the owner's local time. `constraints_json` is
/// `{"minimum_notice_minutes": n, "max_per_day": n}` (either may be omitted,
/// or pass an empty string). `now` is the current owner-local time.
///
/// Returns a JSON array of `{start, end, duration_minutes}` objects.
#[wasm_bindgen(js_name = "computeAvailability")]
pub fn compute_availability(
    availability_json: &str,
    taken_json: &str,
    constraints_json: &str,
    now: &str,
) -> Result<String, JsValue> {
    compute_availability_json(availability_json, taken_json, constraints_json, now)
        .map_err(|e| JsValue::from_str(&e))
}

/// Return the first bookable window of at least `min_minutes`, as a JSON
/// object, or `"null"` when none fits.
#[wasm_bindgen(js_name = "findFirstBookable")]
pub fn find_first_bookable(
    availability_json: &str,
    taken_json: &str,
    constraints_json: &str,
    now: &str,
    min_minutes: u32,
) -> Result<String, JsValue> {
    find_first_bookable_json(
        availability_json,
        taken_json,
        constraints_json,
        now,
        min_minutes,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Expand recurring availability rules into a JSON array of `{start, end}`.
///
/// # Arguments
/// - `rules_json` -- JSON array of `{rrule, dtstart, duration_minutes, exdates?}`
/// - `timezone` -- IANA timezone (e.g., "America/Los_Angeles")
/// - `until` -- Optional end boundary for expansion (local datetime string)
/// - `max_count` -- Optional maximum number of instances per rule
#[wasm_bindgen(js_name = "expandAvailabilityRules")]
pub fn expand_availability_rules(
    rules_json: &str,
    timezone: &str,
    until: Option<String>,
    max_count: Option<u32>,
) -> Result<String, JsValue> {
    expand_rules_json(rules_json, timezone, until.as_deref(), max_count)
        .map_err(|e| JsValue::from_str(&e))
}
