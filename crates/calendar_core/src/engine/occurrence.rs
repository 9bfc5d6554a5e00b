//! Occurrence generator.
//!
//! # Responsibility
//! - Expand one event definition into concrete occurrences inside a
//!   half-open window `[window_start, window_end)`.
//! - Answer anchor-relative lookups (next occurrence, occurs-on-day).
//!
//! # Invariants
//! - Stepping always starts at the anchor (`event.start`).
//! - Output is chronological and every occurrence keeps the parent's duration.
//! - The recurrence end date is inclusive and compared at day granularity.
//! - Expansion terminates when the window, the end date, or chrono's
//!   representable range is exhausted; it never panics.

use crate::engine::dates::{add_days, add_months, days_until_next_listed, weekday_index};
use crate::model::event::{Event, Occurrence};
use crate::model::recurrence::{sorted_weekdays, CustomInterval, IntervalUnit, RecurrenceRule};
use chrono::{NaiveDate, NaiveDateTime};
use log::trace;

/// Cursor advance rule resolved once per expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Once,
    Days(u64),
    Months(u32),
    ListedWeekdays(Vec<u8>),
}

impl Step {
    fn for_rule(rule: &RecurrenceRule) -> Self {
        match rule {
            RecurrenceRule::None => Self::Once,
            RecurrenceRule::Daily => Self::Days(1),
            RecurrenceRule::Weekly { days_of_week } => {
                let days = sorted_weekdays(days_of_week);
                if days.is_empty() {
                    Self::Days(7)
                } else {
                    Self::ListedWeekdays(days)
                }
            }
            RecurrenceRule::Monthly => Self::Months(1),
            RecurrenceRule::Custom {
                every: Some(CustomInterval { interval, unit }),
            } if *interval > 0 => match unit {
                IntervalUnit::Days => Self::Days(u64::from(*interval)),
                IntervalUnit::Weeks => Self::Days(u64::from(*interval) * 7),
                IntervalUnit::Months => Self::Months(*interval),
            },
            // Missing or zero interval falls back to daily stepping.
            RecurrenceRule::Custom { .. } => Self::Days(1),
        }
    }

    fn advance(&self, cursor: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Once => None,
            Self::Days(days) => add_days(cursor, *days),
            Self::Months(months) => add_months(cursor, *months),
            Self::ListedWeekdays(days) => {
                let gap = days_until_next_listed(weekday_index(cursor), days)?;
                add_days(cursor, gap)
            }
        }
    }
}

/// Lazy iterator over the start instants of an event, beginning at its anchor.
///
/// Recurring events stop after the last start on or before the recurrence end
/// date; unbounded rules yield until calendar arithmetic overflows, so
/// callers must bound the iteration themselves.
#[derive(Debug, Clone)]
pub struct OccurrenceStarts {
    step: Step,
    cursor: Option<NaiveDateTime>,
    until: Option<NaiveDate>,
}

impl Iterator for OccurrenceStarts {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        if let Some(until) = self.until {
            if current.date() > until {
                self.cursor = None;
                return None;
            }
        }
        self.cursor = self.step.advance(current);
        Some(current)
    }
}

/// Returns the start instants of `event` in chronological order.
///
/// A non-recurring event yields its start exactly once and ignores any
/// recurrence end date.
pub fn occurrence_starts(event: &Event) -> OccurrenceStarts {
    let step = Step::for_rule(&event.recurrence.rule);
    let until = match step {
        Step::Once => None,
        _ => event.recurrence.until,
    };
    OccurrenceStarts {
        step,
        cursor: Some(event.start),
        until,
    }
}

/// Expands `event` into the occurrences starting inside `[window_start, window_end)`.
///
/// An empty or inverted window yields no occurrences.
pub fn occurrences(
    event: &Event,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Vec<Occurrence> {
    if window_end <= window_start {
        trace!(
            "event=expand module=engine status=skipped reason=empty_window event_id={}",
            event.id
        );
        return Vec::new();
    }

    if !event.is_recurring() {
        if window_start <= event.start && event.start < window_end {
            return vec![event.clone()];
        }
        return Vec::new();
    }

    if let Some(until) = event.recurrence.until {
        if until < window_start.date() {
            return Vec::new();
        }
    }

    let expanded: Vec<Occurrence> = occurrence_starts(event)
        .take_while(|start| *start < window_end)
        .filter(|start| *start >= window_start)
        .map_while(|start| event.occurrence_at(start))
        .collect();

    trace!(
        "event=expand module=engine status=ok event_id={} kind={} count={}",
        event.id,
        event.recurrence.rule.kind_str(),
        expanded.len()
    );
    expanded
}

/// First occurrence start at or after `after`.
///
/// Returns `None` for non-recurring events, and when the recurrence ends
/// before reaching `after`.
pub fn next_occurrence(event: &Event, after: NaiveDateTime) -> Option<NaiveDateTime> {
    if !event.is_recurring() {
        return None;
    }
    if let Some(until) = event.recurrence.until {
        if until < after.date() {
            return None;
        }
    }
    occurrence_starts(event).find(|start| *start >= after)
}

/// Whether any occurrence of `event` starts on calendar day `date`.
pub fn occurs_on(event: &Event, date: NaiveDate) -> bool {
    if !event.is_recurring() {
        return event.start.date() == date;
    }
    if date < event.start.date() {
        return false;
    }
    occurrence_starts(event)
        .take_while(|start| start.date() <= date)
        .any(|start| start.date() == date)
}
