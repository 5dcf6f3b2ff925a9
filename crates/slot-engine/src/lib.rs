//! # slot-engine
//!
//! Deterministic bookable-window computation for schedulable resources.
//!
//! Given the windows an owner has declared open, the bookings that already
//! occupy time, a minimum advance notice and a per-day booking cap, the engine
//! answers which contiguous stretches of time a new booking can be placed into
//! right now. The computation is a pure function: `now` is an argument.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::{compute_availability, Constraints, Interval};
//!
//! let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let at = |h| day.and_hms_opt(h, 0, 0).unwrap();
//!
//! let open = [Interval::new(at(9), at(17)).unwrap()];
//! let taken = [Interval::new(at(12), at(13)).unwrap()];
//!
//! let windows = compute_availability(&open, &taken, &Constraints::unconstrained(), at(8));
//! assert_eq!(windows, vec![
//!     Interval::new(at(9), at(12)).unwrap(),
//!     Interval::new(at(13), at(17)).unwrap(),
//! ]);
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — `Interval` type, parsing and validation
//! - [`merge`] — Collapse overlapping intervals
//! - [`sweep`] — Subtract taken time from availability
//! - [`notice`] — Minimum-notice trimming
//! - [`daily_cap`] — Per-day booking cap trimming
//! - [`availability`] — The full pipeline and its constraints
//! - [`rules`] — Expand recurring availability rules into intervals
//! - [`error`] — Error types

pub mod availability;
pub mod daily_cap;
pub mod error;
pub mod interval;
pub mod merge;
pub mod notice;
pub mod rules;
pub mod sweep;

pub use availability::{
    compute_availability, find_first_bookable, BookableWindow, ConstraintSettings, Constraints,
};
pub use error::SlotError;
pub use interval::{parse_datetime, validate_intervals, Interval};
pub use merge::merge_intervals;
pub use rules::{expand_rule, expand_rules, AvailabilityRule};
pub use sweep::subtract_taken;
