//! Conflict-checked move of one event.
//!
//! # Invariants
//! - A move shifts `start` and `end` by the same delta.
//! - A rejected or unknown move leaves the collection unchanged.
//! - The conflict check excludes the moved event's own previous version.

use crate::engine::conflict::has_conflict;
use crate::engine::horizon::Horizon;
use crate::model::event::Event;
use chrono::NaiveDateTime;
use log::debug;

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The shifted event, ready to replace the original.
    Moved(Event),
    /// The shifted event would collide with another event.
    Rejected,
    /// No event carries the requested identifier.
    NotFound,
}

/// Computes the outcome of moving `event_id` to start at `new_start`.
pub fn plan_move(
    events: &[Event],
    event_id: &str,
    new_start: NaiveDateTime,
    horizon: &Horizon,
) -> MoveOutcome {
    let Some(current) = events.iter().find(|event| event.id == event_id) else {
        debug!("event=move_event module=engine status=not_found event_id={event_id}");
        return MoveOutcome::NotFound;
    };

    let delta = new_start.signed_duration_since(current.start);
    let Some(shifted) = current.shifted_by(delta) else {
        debug!("event=move_event module=engine status=rejected reason=out_of_range event_id={event_id}");
        return MoveOutcome::Rejected;
    };

    if has_conflict(&shifted, events, Some(event_id), horizon) {
        debug!("event=move_event module=engine status=rejected reason=conflict event_id={event_id}");
        return MoveOutcome::Rejected;
    }

    MoveOutcome::Moved(shifted)
}

/// Returns `events` with `event_id` moved to `new_start`, or an unchanged copy
/// when the event is absent or the move would conflict.
pub fn move_event(
    events: &[Event],
    event_id: &str,
    new_start: NaiveDateTime,
    horizon: &Horizon,
) -> Vec<Event> {
    match plan_move(events, event_id, new_start, horizon) {
        MoveOutcome::Moved(shifted) => replace_event(events, shifted),
        MoveOutcome::Rejected | MoveOutcome::NotFound => events.to_vec(),
    }
}

/// Returns `events` with the entry sharing `replacement.id` swapped out, in place.
pub fn replace_event(events: &[Event], replacement: Event) -> Vec<Event> {
    let mut updated = events.to_vec();
    if let Some(slot) = updated.iter_mut().find(|event| event.id == replacement.id) {
        *slot = replacement;
    }
    updated
}
