//! Event repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the load/save boundary the service uses for persistence.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_events` replaces the stored collection as a whole, keeping order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::event::{Event, EventColor, EventId, EventValidationError};
use crate::model::recurrence::{CustomInterval, IntervalUnit, Recurrence, RecurrenceRule};
use chrono::{NaiveDate, NaiveDateTime};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    start_at,
    end_at,
    description,
    color,
    recurrence_type,
    recurrence_until,
    weekly_days,
    custom_interval,
    custom_unit
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    DuplicateId(EventId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "event store io failure: {err}"),
            Self::Serialization(err) => write!(f, "event store serialization failure: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate event id in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Storage boundary for the event collection.
pub trait EventRepository {
    /// Loads the full collection in stored order.
    fn load_events(&self) -> RepoResult<Vec<Event>>;
    /// Replaces the stored collection with `events`.
    fn save_events(&self, events: &[Event]) -> RepoResult<()>;
}

impl<T: EventRepository + ?Sized> EventRepository for &T {
    fn load_events(&self) -> RepoResult<Vec<Event>> {
        (**self).load_events()
    }

    fn save_events(&self, events: &[Event]) -> RepoResult<()> {
        (**self).save_events(events)
    }
}

/// Checks record invariants and identifier uniqueness for a whole collection.
pub fn validate_collection(events: &[Event]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        event.validate()?;
        if !seen.insert(event.id.as_str()) {
            return Err(RepoError::DuplicateId(event.id.clone()));
        }
    }
    Ok(())
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` when the `events` table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'events'
            );",
            [],
            |row| row.get(0),
        )?;
        if has_table != 1 {
            return Err(RepoError::MissingRequiredTable("events"));
        }

        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn load_events(&self) -> RepoResult<Vec<Event>> {
        let started_at = Instant::now();
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY position ASC, id ASC"))?;
        let mut rows = stmt.query([])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        validate_collection(&events)?;

        info!(
            "event=events_load module=repo status=ok backend=sqlite count={} duration_ms={}",
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(events)
    }

    fn save_events(&self, events: &[Event]) -> RepoResult<()> {
        validate_collection(events)?;
        let started_at = Instant::now();

        let result = (|| -> RepoResult<()> {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute("DELETE FROM events;", [])?;
            {
                let mut insert = tx.prepare(
                    "INSERT INTO events (
                        id,
                        position,
                        title,
                        start_at,
                        end_at,
                        description,
                        color,
                        recurrence_type,
                        recurrence_until,
                        weekly_days,
                        custom_interval,
                        custom_unit
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
                )?;
                for (position, event) in events.iter().enumerate() {
                    let columns = RecurrenceColumns::from(&event.recurrence);
                    insert.execute(params![
                        event.id.as_str(),
                        i64::try_from(position).unwrap_or(i64::MAX),
                        event.title.as_str(),
                        format_datetime(event.start),
                        format_datetime(event.end),
                        event.description.as_deref(),
                        event.color.as_str(),
                        columns.kind,
                        columns.until,
                        columns.weekly_days,
                        columns.custom_interval,
                        columns.custom_unit,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })();

        match &result {
            Ok(()) => info!(
                "event=events_save module=repo status=ok backend=sqlite count={} duration_ms={}",
                events.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=events_save module=repo status=error backend=sqlite duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

/// Flattened storage shape of a recurrence union.
struct RecurrenceColumns {
    kind: &'static str,
    until: Option<String>,
    weekly_days: Option<String>,
    custom_interval: Option<u32>,
    custom_unit: Option<&'static str>,
}

impl From<&Recurrence> for RecurrenceColumns {
    fn from(recurrence: &Recurrence) -> Self {
        let mut columns = Self {
            kind: recurrence.rule.kind_str(),
            until: recurrence
                .until
                .map(|day| day.format(DATE_FORMAT).to_string()),
            weekly_days: None,
            custom_interval: None,
            custom_unit: None,
        };
        match &recurrence.rule {
            RecurrenceRule::Weekly { days_of_week } => {
                columns.weekly_days = Some(
                    days_of_week
                        .iter()
                        .map(u8::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                );
            }
            RecurrenceRule::Custom { every: Some(every) } => {
                columns.custom_interval = Some(every.interval);
                columns.custom_unit = Some(every.unit.as_str());
            }
            RecurrenceRule::None
            | RecurrenceRule::Daily
            | RecurrenceRule::Monthly
            | RecurrenceRule::Custom { every: None } => {}
        }
        columns
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id: String = row.get("id")?;

    let color_text: String = row.get("color")?;
    let color = EventColor::parse(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid color `{color_text}` in events.color"))
    })?;

    let recurrence = parse_recurrence(
        &row.get::<_, String>("recurrence_type")?,
        row.get("recurrence_until")?,
        row.get("weekly_days")?,
        row.get("custom_interval")?,
        row.get("custom_unit")?,
    )?;

    let event = Event {
        id,
        title: row.get("title")?,
        start: parse_datetime(&row.get::<_, String>("start_at")?, "events.start_at")?,
        end: parse_datetime(&row.get::<_, String>("end_at")?, "events.end_at")?,
        description: row.get("description")?,
        color,
        recurrence,
    };
    event.validate()?;
    Ok(event)
}

fn parse_recurrence(
    kind: &str,
    until: Option<String>,
    weekly_days: Option<String>,
    custom_interval: Option<u32>,
    custom_unit: Option<String>,
) -> RepoResult<Recurrence> {
    let rule = match kind {
        "none" => RecurrenceRule::None,
        "daily" => RecurrenceRule::Daily,
        "weekly" => RecurrenceRule::Weekly {
            days_of_week: parse_weekly_days(weekly_days.as_deref().unwrap_or_default())?,
        },
        "monthly" => RecurrenceRule::Monthly,
        "custom" => {
            let unit = match custom_unit.as_deref() {
                Some(text) => Some(IntervalUnit::parse(text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid custom unit `{text}` in events.custom_unit"
                    ))
                })?),
                None => None,
            };
            RecurrenceRule::Custom {
                every: custom_interval
                    .zip(unit)
                    .map(|(interval, unit)| CustomInterval { interval, unit }),
            }
        }
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid recurrence type `{other}` in events.recurrence_type"
            )));
        }
    };

    let until = match until {
        Some(text) => Some(NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{text}` in events.recurrence_until"
            ))
        })?),
        None => None,
    };

    Ok(Recurrence { rule, until })
}

fn parse_weekly_days(text: &str) -> RepoResult<Vec<u8>> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<u8>().map_err(|_| {
                RepoError::InvalidData(format!("invalid weekday `{token}` in events.weekly_days"))
            })
        })
        .collect()
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(text: &str, column: &str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{text}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_days_parse_ignores_blanks() {
        assert_eq!(parse_weekly_days("1, 3,,5").unwrap(), vec![1, 3, 5]);
        assert!(parse_weekly_days("").unwrap().is_empty());
        assert!(matches!(
            parse_weekly_days("1,x"),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn custom_without_unit_keeps_fallback_shape() {
        let recurrence = parse_recurrence("custom", None, None, Some(3), None).unwrap();
        assert_eq!(recurrence.rule, RecurrenceRule::Custom { every: None });
    }

    #[test]
    fn datetime_format_round_trips_subseconds() {
        let value = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 678)
            .unwrap();
        assert_eq!(
            parse_datetime(&format_datetime(value), "t").unwrap(),
            value
        );
    }

    #[test]
    fn validate_collection_rejects_duplicate_ids() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let events = vec![
            Event::with_id("same", "a", start, start),
            Event::with_id("same", "b", start, start),
        ];
        assert!(matches!(
            validate_collection(&events),
            Err(RepoError::DuplicateId(id)) if id == "same"
        ));
    }
}
