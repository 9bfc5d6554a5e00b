//! Same-day time-overlap detection across recurrence expansion.
//!
//! # Responsibility
//! - Expand a candidate and the existing collection over a [`Horizon`].
//! - Report the first pair of occurrences that collide.
//!
//! # Invariants
//! - Only occurrences starting on the same calendar day can collide.
//! - Touching intervals (`a.end == b.start`) do not collide when both have
//!   positive length. A zero-length occurrence on the boundary of another
//!   one does collide.
//! - `exclude_id` removes one existing event so edits do not collide with
//!   their own previous version.

use crate::engine::dates::same_day;
use crate::engine::horizon::Horizon;
use crate::engine::occurrence::occurrences;
use crate::model::event::{Event, Occurrence};
use chrono::NaiveDate;
use log::debug;

/// First colliding occurrence pair found by a conflict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPair {
    pub candidate: Occurrence,
    pub existing: Occurrence,
}

impl ConflictPair {
    /// Calendar day on which the collision happens.
    pub fn day(&self) -> NaiveDate {
        self.candidate.start.date()
    }
}

/// Whether two occurrences collide.
///
/// Same start day, and one of: the candidate starts inside the other, ends
/// inside the other, contains the other, or is contained by the other.
pub fn occurrences_collide(candidate: &Occurrence, other: &Occurrence) -> bool {
    if !same_day(candidate.start, other.start) {
        return false;
    }
    let starts_inside = candidate.start < other.end && candidate.start >= other.start;
    let ends_inside = candidate.end > other.start && candidate.end <= other.end;
    let contains_other = candidate.start <= other.start && candidate.end >= other.end;
    let inside_other = other.start <= candidate.start && other.end >= candidate.end;
    starts_inside || ends_inside || contains_other || inside_other
}

/// Finds the first collision between `candidate` and `events` inside `horizon`.
///
/// Pairs are visited candidate-occurrence first, in chronological order, and
/// existing occurrences in collection order.
pub fn find_conflict(
    candidate: &Event,
    events: &[Event],
    exclude_id: Option<&str>,
    horizon: &Horizon,
) -> Option<ConflictPair> {
    let (window_start, window_end) = horizon.window();

    let existing: Vec<Occurrence> = events
        .iter()
        .filter(|event| exclude_id != Some(event.id.as_str()))
        .flat_map(|event| occurrences(event, window_start, window_end))
        .collect();
    let proposed = occurrences(candidate, window_start, window_end);

    for occurrence in &proposed {
        if let Some(other) = existing
            .iter()
            .find(|other| occurrences_collide(occurrence, other))
        {
            debug!(
                "event=conflict_check module=engine status=conflict candidate_occurrences={} existing_occurrences={} existing_id={} day={}",
                proposed.len(),
                existing.len(),
                other.id,
                occurrence.start.date()
            );
            return Some(ConflictPair {
                candidate: occurrence.clone(),
                existing: other.clone(),
            });
        }
    }

    debug!(
        "event=conflict_check module=engine status=ok candidate_occurrences={} existing_occurrences={}",
        proposed.len(),
        existing.len()
    );
    None
}

/// Whether `candidate` would collide with any event in `events` inside `horizon`.
pub fn has_conflict(
    candidate: &Event,
    events: &[Event],
    exclude_id: Option<&str>,
    horizon: &Horizon,
) -> bool {
    find_conflict(candidate, events, exclude_id, horizon).is_some()
}
