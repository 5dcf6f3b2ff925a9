//! Error types for slot-engine operations.
//!
//! The availability pipeline itself is infallible. These errors come from the
//! validating constructors and the rule expander that sit in front of it.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SlotError {
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Minimum notice must not be negative: {0} minutes")]
    NegativeNotice(i64),

    #[error("Minimum notice out of range: {0} minutes")]
    NoticeOutOfRange(i64),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Expansion error: {0}")]
    Expansion(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
