//! Runtime configuration for calendar hosts.
//!
//! # Responsibility
//! - Resolve store path, logging and horizon settings from the environment.
//!
//! # Invariants
//! - Resolution never fails; blank or unparseable values fall back to
//!   defaults.
//! - A horizon of zero months is treated as unset.

use crate::engine::horizon::{Horizon, DEFAULT_HORIZON_MONTHS};
use crate::logging::default_log_level;
use chrono::NaiveDateTime;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CALENDAR_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CALENDAR_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CALENDAR_LOG_DIR";
pub const HORIZON_MONTHS_ENV: &str = "CALENDAR_HORIZON_MONTHS";

const DEFAULT_DB_FILE_NAME: &str = "calendar.sqlite3";

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub horizon_months: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

impl CalendarConfig {
    /// Reads `CALENDAR_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: non_blank(LOG_DIR_ENV).map(PathBuf::from),
            horizon_months: non_blank(HORIZON_MONTHS_ENV)
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|months| *months > 0)
                .unwrap_or(defaults.horizon_months),
        }
    }

    /// Conflict-check horizon anchored at `anchor`.
    pub fn horizon_at(&self, anchor: NaiveDateTime) -> Horizon {
        Horizon::starting_at(anchor).with_months(self.horizon_months)
    }
}
