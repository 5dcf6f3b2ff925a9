//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the compute,
//! first and expand subcommands through the actual binary, including stdin
//! piping, file I/O, flag overrides and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the command and parse stdout as JSON.
fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout must be JSON")
}

fn window(start: &str, end: &str, minutes: i64) -> Value {
    json!({ "start": start, "end": end, "duration_minutes": minutes })
}

// ─────────────────────────────────────────────────────────────────────────────
// compute
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn compute_file_to_stdout() {
    let out = stdout_json(slots().args(["compute", "-i", &fixture("request.json")]));
    assert_eq!(
        out,
        json!([
            window("2026-03-16T09:00:00", "2026-03-16T12:00:00", 180),
            window("2026-03-16T13:00:00", "2026-03-16T17:00:00", 240),
        ])
    );
}

#[test]
fn compute_stdin_to_stdout() {
    let input = r#"{
        "availability": [{"start": "2026-03-16T09:00:00", "end": "2026-03-16T17:00:00"}],
        "now": "2026-03-16T10:30:00",
        "minimum_notice_minutes": 120
    }"#;
    let out = stdout_json(slots().arg("compute").write_stdin(input));
    assert_eq!(
        out,
        json!([window("2026-03-16T12:30:00", "2026-03-16T17:00:00", 270)])
    );
}

#[test]
fn compute_accepts_offset_timestamps_as_wall_time() {
    let input = r#"{
        "availability": [{"start": "2026-03-16T09:00:00-05:00", "end": "2026-03-16T17:00:00-05:00"}],
        "taken": [{"start": "2026-03-16T12:00:00Z", "end": "2026-03-16T13:00:00Z"}],
        "now": "2026-03-16T08:00:00"
    }"#;
    let out = stdout_json(slots().arg("compute").write_stdin(input));
    assert_eq!(
        out,
        json!([
            window("2026-03-16T09:00:00", "2026-03-16T12:00:00", 180),
            window("2026-03-16T13:00:00", "2026-03-16T17:00:00", 240),
        ])
    );
}

#[test]
fn compute_flags_override_request() {
    let out = stdout_json(slots().args([
        "compute",
        "-i",
        &fixture("request.json"),
        "--minimum-notice",
        "240",
    ]));
    assert_eq!(
        out,
        json!([window("2026-03-16T13:00:00", "2026-03-16T17:00:00", 240)])
    );

    let out = stdout_json(slots().args([
        "compute",
        "-i",
        &fixture("request.json"),
        "--now",
        "2026-03-16T14:00:00",
    ]));
    assert_eq!(
        out,
        json!([window("2026-03-16T14:00:00", "2026-03-16T17:00:00", 180)])
    );
}

#[test]
fn compute_applies_daily_cap() {
    let out = stdout_json(slots().args(["compute", "-i", &fixture("two_days.json")]));
    assert_eq!(
        out,
        json!([window("2026-03-17T09:00:00", "2026-03-17T17:00:00", 480)])
    );
}

#[test]
fn compute_with_full_day_returns_empty_array() {
    let out = stdout_json(slots().args([
        "compute",
        "-i",
        &fixture("request.json"),
        "--max-per-day",
        "1",
    ]));
    assert_eq!(out, json!([]));
}

#[test]
fn compute_file_to_file() {
    let output_path = std::env::temp_dir().join("slots-test-compute-output.json");
    let _ = std::fs::remove_file(&output_path);

    slots()
        .args(["compute", "-i", &fixture("request.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let parsed: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(2));

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn compute_rejects_reversed_interval() {
    let input = r#"{"availability": [{"start": "2026-03-16T17:00:00", "end": "2026-03-16T09:00:00"}],
                    "now": "2026-03-16T08:00:00"}"#;
    slots()
        .arg("compute")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid availability"));
}

#[test]
fn compute_rejects_negative_notice() {
    slots()
        .args([
            "compute",
            "-i",
            &fixture("request.json"),
            "--minimum-notice",
            "-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid constraints"));
}

#[test]
fn compute_rejects_bad_json() {
    slots()
        .arg("compute")
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse request JSON"));
}

#[test]
fn compute_rejects_bad_now() {
    slots()
        .args(["compute", "-i", &fixture("request.json"), "--now", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid now timestamp"));
}

#[test]
fn missing_input_file_fails() {
    slots()
        .args(["compute", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn verbose_logs_go_to_stderr() {
    slots()
        .args(["-vv", "compute", "-i", &fixture("request.json")])
        .assert()
        .success()
        .stderr(predicate::str::contains("applied daily cap"));
}

// ─────────────────────────────────────────────────────────────────────────────
// first
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn first_returns_first_long_enough_window() {
    let out = stdout_json(slots().args([
        "first",
        "-i",
        &fixture("request.json"),
        "--min-minutes",
        "200",
    ]));
    assert_eq!(
        out,
        window("2026-03-16T13:00:00", "2026-03-16T17:00:00", 240)
    );
}

#[test]
fn first_prints_null_when_nothing_fits() {
    let out = stdout_json(slots().args([
        "first",
        "-i",
        &fixture("request.json"),
        "--min-minutes",
        "600",
    ]));
    assert_eq!(out, Value::Null);
}

// ─────────────────────────────────────────────────────────────────────────────
// expand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn expand_rules_to_intervals() {
    let out = stdout_json(slots().args(["expand", "-i", &fixture("rules.json")]));
    assert_eq!(
        out,
        json!([
            {"start": "2026-03-02T09:00:00", "end": "2026-03-02T17:00:00"},
            {"start": "2026-03-03T09:00:00", "end": "2026-03-03T17:00:00"},
            {"start": "2026-03-02T18:00:00", "end": "2026-03-02T19:00:00"},
            {"start": "2026-03-09T18:00:00", "end": "2026-03-09T19:00:00"},
        ])
    );
}

#[test]
fn expand_rejects_invalid_timezone() {
    let input = r#"{"timezone": "Mars/Olympus_Mons",
                    "rules": [{"rrule": "FREQ=DAILY;COUNT=1", "dtstart": "2026-03-02T09:00:00", "duration_minutes": 60}]}"#;
    slots()
        .arg("expand")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn no_subcommand_shows_usage() {
    slots()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
