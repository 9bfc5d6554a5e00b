//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical calendar event record.
//! - Provide validation used by service and repository boundaries.
//!
//! # Invariants
//! - `id` is stable for the event lifetime and never reused.
//! - `end` is not earlier than `start`.
//! - `title` is non-empty after trimming.
//! - `color` is cosmetic and never affects scheduling.

use crate::model::recurrence::Recurrence;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque event identifier.
///
/// Generated identifiers are UUID v4 strings; imported events may carry any
/// non-empty string.
pub type EventId = String;

/// One concrete realization of an event.
///
/// Shares identity, title, description, color and recurrence with the parent
/// event; only `start`/`end` are replaced by the repetition's instants.
pub type Occurrence = Event;

/// Fixed color palette for event chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Red,
    Purple,
    Yellow,
    Teal,
}

impl EventColor {
    /// Stable lowercase name used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Yellow => "yellow",
            Self::Teal => "teal",
        }
    }

    /// Parses the storage name back into a palette entry.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "red" => Some(Self::Red),
            "purple" => Some(Self::Purple),
            "yellow" => Some(Self::Yellow),
            "teal" => Some(Self::Teal),
            _ => None,
        }
    }
}

/// Validation failures for event records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyId,
    EmptyTitle,
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "event id must not be empty"),
            Self::EmptyTitle => write!(f, "event title is required"),
            Self::InvalidTimeRange { start, end } => {
                write!(f, "event end ({end}) must be >= start ({start})")
            }
        }
    }
}

impl Error for EventValidationError {}

/// Canonical calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Local wall-clock start; also the recurrence anchor.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl Event {
    /// Creates a non-recurring event with a generated identifier.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title, start, end)
    }

    /// Creates a non-recurring event with a caller-provided identifier.
    ///
    /// Used by import paths and tests where identity already exists.
    /// Does not validate; call [`Event::validate`] at the boundary.
    pub fn with_id(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            description: None,
            color: EventColor::default(),
            recurrence: Recurrence::none(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `EmptyTitle` when `title` is blank after trim.
    /// - `InvalidTimeRange` when `end < start`.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.end < self.start {
            return Err(EventValidationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Length of every occurrence of this event.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_recurring()
    }

    /// Local calendar day of the anchor start.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Returns a copy re-anchored at `start`, preserving duration.
    ///
    /// Returns `None` when the shifted end is not representable.
    pub fn occurrence_at(&self, start: NaiveDateTime) -> Option<Occurrence> {
        let end = start.checked_add_signed(self.duration())?;
        Some(Self {
            start,
            end,
            ..self.clone()
        })
    }

    /// Returns a copy shifted by `delta`, preserving duration.
    ///
    /// Returns `None` when either shifted instant is not representable.
    pub fn shifted_by(&self, delta: TimeDelta) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add_signed(delta)?,
            end: self.end.checked_add_signed(delta)?,
            ..self.clone()
        })
    }

    /// Human-readable recurrence summary for detail views.
    pub fn recurrence_summary(&self) -> String {
        self.recurrence.describe(self.start)
    }
}
