//! Calendar use-case service.
//!
//! # Responsibility
//! - Own the authoritative event collection and its repository.
//! - Gate every mutation through validation and the conflict check.
//!
//! # Invariants
//! - The in-memory collection only changes after the repository accepted the
//!   new collection.
//! - Updates and moves never collide with their own previous version.
//! - Conflict checks use a horizon anchored at the caller-provided `now`.
//!
//! # See also
//! - `engine::conflict` for the overlap predicate.

use crate::engine::conflict::find_conflict;
use crate::engine::horizon::{Horizon, DEFAULT_HORIZON_MONTHS};
use crate::engine::occurrence::occurrences;
use crate::engine::query::{occurrences_between, occurrences_on_day};
use crate::engine::reschedule::{plan_move, replace_event, MoveOutcome};
use crate::engine::ConflictPair;
use crate::model::event::{Event, EventId, EventValidationError, Occurrence};
use crate::repo::event_repo::{EventRepository, RepoError};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of a calendar use-case.
#[derive(Debug)]
pub enum ServiceError {
    Validation(EventValidationError),
    /// The proposed event collides with `existing_id` on `day`.
    Conflict {
        existing_id: EventId,
        day: NaiveDate,
    },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { existing_id, day } => {
                write!(f, "event conflicts with `{existing_id}` on {day}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Conflict { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<EventValidationError> for ServiceError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ConflictPair> for ServiceError {
    fn from(value: ConflictPair) -> Self {
        Self::Conflict {
            day: value.day(),
            existing_id: value.existing.id,
        }
    }
}

/// Stateful calendar session over a repository.
pub struct CalendarService<R: EventRepository> {
    repo: R,
    events: Vec<Event>,
    horizon_months: u32,
}

impl<R: EventRepository> CalendarService<R> {
    /// Loads the stored collection and returns a ready service.
    ///
    /// A `horizon_months` of zero is replaced by [`DEFAULT_HORIZON_MONTHS`];
    /// an empty horizon would never report a conflict.
    pub fn open(repo: R, horizon_months: u32) -> ServiceResult<Self> {
        let started_at = Instant::now();
        let horizon_months = if horizon_months == 0 {
            warn!("event=calendar_open module=service status=fallback reason=zero_horizon");
            DEFAULT_HORIZON_MONTHS
        } else {
            horizon_months
        };
        let events = repo.load_events()?;
        info!(
            "event=calendar_open module=service status=ok count={} horizon_months={} duration_ms={}",
            events.len(),
            horizon_months,
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            repo,
            events,
            horizon_months,
        })
    }

    /// Read-only view of the collection in stored order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn find_event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Adds `draft` under a freshly generated identifier.
    ///
    /// Any identifier already on `draft` is replaced.
    ///
    /// # Errors
    /// - `Validation` for blank titles or reversed ranges.
    /// - `Conflict` when any occurrence inside the horizon collides.
    /// - `Repo` when persistence fails; the collection is left unchanged.
    pub fn create_event(&mut self, draft: Event, now: NaiveDateTime) -> ServiceResult<Event> {
        let event = Event {
            id: Uuid::new_v4().to_string(),
            ..draft
        };
        event.validate()?;
        self.ensure_no_conflict(&event, None, now, "create_event")?;

        let mut next = self.events.clone();
        next.push(event.clone());
        self.commit(next, "create_event")?;
        Ok(event)
    }

    /// Replaces the stored event sharing `event.id`, keeping its position.
    ///
    /// Returns `Ok(false)` when no such event exists.
    pub fn update_event(&mut self, event: Event, now: NaiveDateTime) -> ServiceResult<bool> {
        event.validate()?;
        if self.find_event(&event.id).is_none() {
            info!("event=update_event module=service status=not_found");
            return Ok(false);
        }
        self.ensure_no_conflict(&event, Some(event.id.as_str()), now, "update_event")?;

        let next = replace_event(&self.events, event);
        self.commit(next, "update_event")?;
        Ok(true)
    }

    /// Removes the event with `id`. Returns `Ok(false)` when absent.
    pub fn delete_event(&mut self, id: &str) -> ServiceResult<bool> {
        if self.find_event(id).is_none() {
            info!("event=delete_event module=service status=not_found");
            return Ok(false);
        }
        let next: Vec<Event> = self
            .events
            .iter()
            .filter(|event| event.id != id)
            .cloned()
            .collect();
        self.commit(next, "delete_event")?;
        Ok(true)
    }

    /// Shifts event `id` so it starts at `new_start`, preserving duration.
    ///
    /// A rejected or unknown move is reported through [`MoveOutcome`] and
    /// leaves the collection untouched.
    pub fn move_event(
        &mut self,
        id: &str,
        new_start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> ServiceResult<MoveOutcome> {
        let outcome = plan_move(&self.events, id, new_start, &self.horizon_at(now));
        match &outcome {
            MoveOutcome::Moved(shifted) => {
                let next = replace_event(&self.events, shifted.clone());
                self.commit(next, "move_event")?;
            }
            MoveOutcome::Rejected => {
                warn!("event=move_event module=service status=rejected");
            }
            MoveOutcome::NotFound => {
                info!("event=move_event module=service status=not_found");
            }
        }
        Ok(outcome)
    }

    /// Occurrences starting on `date`, for grid cells and day views.
    pub fn events_for_day(&self, date: NaiveDate) -> Vec<Occurrence> {
        occurrences_on_day(&self.events, date)
    }

    /// All occurrences starting inside `[start, end)`.
    pub fn occurrences_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Occurrence> {
        occurrences_between(&self.events, start, end)
    }

    /// Occurrences of a single stored event inside `[start, end)`.
    pub fn occurrences_of(
        &self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<Occurrence> {
        self.find_event(id)
            .map(|event| occurrences(event, start, end))
            .unwrap_or_default()
    }

    /// First collision `candidate` would cause, without mutating anything.
    pub fn check_conflict(
        &self,
        candidate: &Event,
        exclude_id: Option<&str>,
        now: NaiveDateTime,
    ) -> Option<ConflictPair> {
        find_conflict(candidate, &self.events, exclude_id, &self.horizon_at(now))
    }

    fn horizon_at(&self, now: NaiveDateTime) -> Horizon {
        Horizon::starting_at(now).with_months(self.horizon_months)
    }

    fn ensure_no_conflict(
        &self,
        candidate: &Event,
        exclude_id: Option<&str>,
        now: NaiveDateTime,
        operation: &str,
    ) -> ServiceResult<()> {
        match self.check_conflict(candidate, exclude_id, now) {
            Some(pair) => {
                warn!(
                    "event={operation} module=service status=rejected reason=conflict existing_id={} day={}",
                    pair.existing.id,
                    pair.day()
                );
                Err(pair.into())
            }
            None => Ok(()),
        }
    }

    fn commit(&mut self, next: Vec<Event>, operation: &str) -> ServiceResult<()> {
        let started_at = Instant::now();
        if let Err(err) = self.repo.save_events(&next) {
            warn!(
                "event={operation} module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
        info!(
            "event={operation} module=service status=ok count={} duration_ms={}",
            next.len(),
            started_at.elapsed().as_millis()
        );
        self.events = next;
        Ok(())
    }
}
