//! Command-line argument model.

use calendar_core::{EventColor, IntervalUnit, Recurrence};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

const DATETIME_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "calendar", version, about, long_about = None)]
pub struct Cli {
    /// SQLite store path (overrides CALENDAR_DB_PATH).
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Conflict-check horizon in months (overrides CALENDAR_HORIZON_MONTHS).
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub horizon_months: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Supported subcommands. Without one, the CLI prints a linkage check.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print core ping and version.
    Ping,
    /// List occurrences starting on one day.
    Day(DayArgs),
    /// List occurrences starting inside a half-open range.
    Range(RangeArgs),
    /// Print the Sunday-start month grid with per-day occurrence counts.
    Grid(DayArgs),
    /// Create an event, rejecting it when it conflicts.
    #[command(alias = "create")]
    Add(EventArgs),
    /// Report whether an event would conflict without saving it.
    Check(EventArgs),
    /// Move an event to a new start, keeping its duration.
    Move(MoveArgs),
    /// Delete an event by ID.
    #[command(alias = "remove")]
    Delete(IdArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DayArgs {
    /// Calendar day (YYYY-MM-DD).
    #[arg(value_parser = parse_date)]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// Inclusive range start (YYYY-MM-DDTHH:MM).
    #[arg(value_parser = parse_datetime)]
    pub start: NaiveDateTime,
    /// Exclusive range end (YYYY-MM-DDTHH:MM).
    #[arg(value_parser = parse_datetime)]
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Debug, Clone, Args)]
pub struct MoveArgs {
    pub id: String,
    /// New start (YYYY-MM-DDTHH:MM).
    #[arg(value_parser = parse_datetime)]
    pub start: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    Days,
    Weeks,
    Months,
}

impl From<UnitArg> for IntervalUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Days => Self::Days,
            UnitArg::Weeks => Self::Weeks,
            UnitArg::Months => Self::Months,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Blue,
    Green,
    Red,
    Purple,
    Yellow,
    Teal,
}

impl From<ColorArg> for EventColor {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Blue => Self::Blue,
            ColorArg::Green => Self::Green,
            ColorArg::Red => Self::Red,
            ColorArg::Purple => Self::Purple,
            ColorArg::Yellow => Self::Yellow,
            ColorArg::Teal => Self::Teal,
        }
    }
}

/// Event fields shared by `add` and `check`.
#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    #[arg(long)]
    pub title: String,

    /// Start (YYYY-MM-DDTHH:MM).
    #[arg(long, value_parser = parse_datetime)]
    pub start: NaiveDateTime,

    /// End (YYYY-MM-DDTHH:MM).
    #[arg(long, value_parser = parse_datetime)]
    pub end: NaiveDateTime,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum, default_value_t = ColorArg::Blue)]
    pub color: ColorArg,

    #[arg(long, value_enum, default_value_t = RepeatArg::None)]
    pub repeat: RepeatArg,

    /// Weekday indices for weekly repeats (0 = Sunday), comma separated.
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..7))]
    pub days: Vec<u8>,

    /// Interval for custom repeats.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub every: Option<u32>,

    #[arg(long, value_enum, default_value_t = UnitArg::Days)]
    pub unit: UnitArg,

    /// Last day an occurrence may start (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub until: Option<NaiveDate>,
}

impl EventArgs {
    pub fn recurrence(&self) -> Recurrence {
        let recurrence = match self.repeat {
            RepeatArg::None => return Recurrence::none(),
            RepeatArg::Daily => Recurrence::daily(),
            RepeatArg::Weekly => Recurrence::weekly(self.days.iter().copied()),
            RepeatArg::Monthly => Recurrence::monthly(),
            RepeatArg::Custom => Recurrence::every(self.every.unwrap_or(1), self.unit.into()),
        };
        match self.until {
            Some(last_day) => recurrence.until(last_day),
            None => recurrence,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{raw}`: {err}"))
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got `{raw}`"))
}
