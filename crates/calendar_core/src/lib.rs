//! Core domain logic for the calendar.
//! This crate is the single source of truth for recurrence expansion and
//! scheduling conflicts.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CalendarConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use engine::{
    find_conflict, has_conflict, month_grid, move_event, next_occurrence, occurrences,
    occurrences_between, occurrences_on_day, occurs_on, plan_move, sort_for_display,
    ConflictPair, Horizon, MoveOutcome, DEFAULT_HORIZON_MONTHS,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::event::{Event, EventColor, EventId, EventValidationError, Occurrence};
pub use model::recurrence::{CustomInterval, IntervalUnit, Recurrence, RecurrenceRule};
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use repo::json_repo::JsonFileEventRepository;
pub use repo::memory_repo::InMemoryEventRepository;
pub use service::calendar_service::{CalendarService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
