//! Read-only occurrence queries over an event collection.
//!
//! # Responsibility
//! - Answer per-day lookups for grid rendering.
//! - Flatten expansions of a whole collection over a range.
//!
//! # Invariants
//! - Queries never mutate the collection.
//! - Day results list non-recurring events first, then recurring occurrences,
//!   each group in collection order.

use crate::engine::dates::day_bounds;
use crate::engine::occurrence::occurrences;
use crate::model::event::{Event, Occurrence};
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// Occurrences of all events whose start falls on calendar day `date`.
pub fn occurrences_on_day(events: &[Event], date: NaiveDate) -> Vec<Occurrence> {
    let Some((day_start, day_end)) = day_bounds(date) else {
        return Vec::new();
    };

    let mut found: Vec<Occurrence> = events
        .iter()
        .filter(|event| !event.is_recurring() && event.start.date() == date)
        .cloned()
        .collect();

    for event in events.iter().filter(|event| event.is_recurring()) {
        found.extend(
            occurrences(event, day_start, day_end)
                .into_iter()
                .filter(|occurrence| occurrence.start.date() == date),
        );
    }

    found
}

/// All occurrences of all events starting inside `[start, end)`.
///
/// Grouped per event in collection order; each group is chronological.
pub fn occurrences_between(
    events: &[Event],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<Occurrence> {
    events
        .iter()
        .flat_map(|event| occurrences(event, start, end))
        .collect()
}

/// Display ordering: by start, then end, then identifier.
pub fn display_order(a: &Occurrence, b: &Occurrence) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.id.cmp(&b.id))
}

/// Stable, total sort for rendering a day or agenda list.
pub fn sort_for_display(occurrences: &mut [Occurrence]) {
    occurrences.sort_by(display_order);
}
