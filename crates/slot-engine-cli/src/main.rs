//! `slots` CLI — compute bookable windows from availability and bookings.
//!
//! ## Usage
//!
//! ```sh
//! # Compute bookable windows (request JSON on stdin → windows JSON on stdout)
//! slots compute < request.json
//!
//! # Read from a file, override the request's constraints and clock
//! slots compute -i request.json --minimum-notice 120 --max-per-day 2 --now 2026-03-16T08:00:00
//!
//! # First window of at least 45 minutes
//! slots first -i request.json --min-minutes 45
//!
//! # Expand recurring availability rules into intervals
//! slots expand -i rules.json -o availability.json
//!
//! # Show pipeline stages on stderr
//! slots -vv compute -i request.json
//! ```
//!
//! A request looks like:
//!
//! ```json
//! {
//!   "availability": [{"start": "2026-03-16T09:00:00", "end": "2026-03-16T17:00:00"}],
//!   "taken": [{"start": "2026-03-16T12:00:00", "end": "2026-03-16T13:00:00"}],
//!   "minimum_notice_minutes": 60,
//!   "max_per_day": 3,
//!   "now": "2026-03-16T08:00:00"
//! }
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Deserialize;
use slot_engine::{
    AvailabilityRule, BookableWindow, ConstraintSettings, Constraints, Interval, SlotError,
};
use std::io::{self, Read};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Compute bookable windows from declared availability and bookings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute every bookable window
    Compute {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the first bookable window of at least --min-minutes
    First {
        #[command(flatten)]
        request: RequestArgs,
        /// Minimum window length in minutes
        #[arg(long, default_value_t = 30)]
        min_minutes: i64,
    },
    /// Expand recurring availability rules into intervals
    Expand {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Request JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Minimum notice in minutes, overrides the request
    #[arg(long, allow_negative_numbers = true)]
    minimum_notice: Option<i64>,
    /// Maximum bookings per day, overrides the request
    #[arg(long)]
    max_per_day: Option<u32>,
    /// Current time in the owner's zone, overrides the request
    #[arg(long)]
    now: Option<String>,
}

/// A `{start, end}` pair as written in the request.
#[derive(Deserialize)]
struct IntervalInput {
    start: String,
    end: String,
}

#[derive(Deserialize)]
struct AvailabilityRequest {
    availability: Vec<IntervalInput>,
    #[serde(default)]
    taken: Vec<IntervalInput>,
    #[serde(flatten)]
    constraints: ConstraintSettings,
    #[serde(default)]
    now: Option<String>,
}

#[derive(Deserialize)]
struct ExpandRequest {
    timezone: String,
    #[serde(default)]
    until: Option<String>,
    #[serde(default)]
    max_count: Option<u32>,
    rules: Vec<AvailabilityRule>,
}

/// A request with flags applied, ready for the pipeline.
struct Prepared {
    availability: Vec<Interval>,
    taken: Vec<Interval>,
    constraints: Constraints,
    now: NaiveDateTime,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compute { request } => {
            let prepared = prepare(&request)?;
            let windows: Vec<BookableWindow> = slot_engine::compute_availability(
                &prepared.availability,
                &prepared.taken,
                &prepared.constraints,
                prepared.now,
            )
            .iter()
            .map(BookableWindow::from)
            .collect();
            tracing::info!(windows = windows.len(), "computed bookable windows");

            let json = serde_json::to_string_pretty(&windows)?;
            write_output(request.output.as_deref(), &json)?;
        }
        Commands::First {
            request,
            min_minutes,
        } => {
            let min_duration = Duration::try_minutes(min_minutes)
                .with_context(|| format!("--min-minutes out of range: {}", min_minutes))?;
            let prepared = prepare(&request)?;
            let first = slot_engine::find_first_bookable(
                &prepared.availability,
                &prepared.taken,
                &prepared.constraints,
                prepared.now,
                min_duration,
            )
            .map(|w| BookableWindow::from(&w));

            let json = serde_json::to_string_pretty(&first)?;
            write_output(request.output.as_deref(), &json)?;
        }
        Commands::Expand { input, output } => {
            let raw = read_input(input.as_deref())?;
            let req: ExpandRequest =
                serde_json::from_str(&raw).context("Failed to parse rules JSON")?;
            let intervals = slot_engine::expand_rules(
                &req.rules,
                &req.timezone,
                req.until.as_deref(),
                req.max_count,
            )
            .context("Failed to expand availability rules")?;
            tracing::info!(intervals = intervals.len(), "expanded availability rules");

            let json = serde_json::to_string_pretty(&intervals)?;
            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read and validate a request, then apply command-line overrides.
///
/// The clock is read at most once, and only when neither `--now` nor the
/// request supplies it.
fn prepare(args: &RequestArgs) -> Result<Prepared> {
    let raw = read_input(args.input.as_deref())?;
    let request: AvailabilityRequest =
        serde_json::from_str(&raw).context("Failed to parse request JSON")?;

    let availability = parse_intervals(&request.availability).context("Invalid availability")?;
    let taken = parse_intervals(&request.taken).context("Invalid taken bookings")?;

    let mut settings = request.constraints;
    if let Some(minutes) = args.minimum_notice {
        settings.minimum_notice_minutes = Some(minutes);
    }
    if let Some(max) = args.max_per_day {
        settings.max_per_day = Some(max);
    }
    let constraints = Constraints::try_from(settings).context("Invalid constraints")?;

    let now = match args.now.as_deref().or(request.now.as_deref()) {
        Some(text) => slot_engine::parse_datetime(text).context("Invalid now timestamp")?,
        None => Local::now().naive_local(),
    };

    Ok(Prepared {
        availability,
        taken,
        constraints,
        now,
    })
}

fn parse_intervals(inputs: &[IntervalInput]) -> std::result::Result<Vec<Interval>, SlotError> {
    inputs
        .iter()
        .map(|i| Interval::parse(&i.start, &i.end))
        .collect()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
