//! Local-calendar date arithmetic used by recurrence stepping.
//!
//! All helpers are non-panicking: arithmetic that leaves chrono's
//! representable range returns `None` and the caller stops expanding.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Weekday index with 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(at: NaiveDateTime) -> u8 {
    // num_days_from_sunday is always in 0..=6
    at.weekday().num_days_from_sunday() as u8
}

pub fn add_days(at: NaiveDateTime, days: u64) -> Option<NaiveDateTime> {
    at.checked_add_days(Days::new(days))
}

/// Adds calendar months, clamping the day to the end of shorter months.
pub fn add_months(at: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    at.checked_add_months(Months::new(months))
}

/// Days to advance from weekday `current` to the next listed weekday.
///
/// `sorted_days` must be ascending and within `0..=6`. Picks the earliest day
/// strictly after `current`, otherwise wraps to the first listed day of the
/// following week. Returns `None` for an empty list.
pub fn days_until_next_listed(current: u8, sorted_days: &[u8]) -> Option<u64> {
    let first = *sorted_days.first()?;
    let gap = match sorted_days.iter().find(|day| **day > current) {
        Some(next) => next - current,
        None => 7 - current + first,
    };
    Some(u64::from(gap))
}

/// Half-open `[00:00, next day 00:00)` bounds for one calendar day.
pub fn day_bounds(date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = date.and_time(NaiveTime::MIN);
    let end = date.succ_opt()?.and_time(NaiveTime::MIN);
    Some((start, end))
}

pub fn same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Days shown by a month grid: whole Sunday-start weeks covering `date`'s month.
///
/// Returns an empty list when the grid would leave the representable range.
pub fn month_grid(date: NaiveDate) -> Vec<NaiveDate> {
    grid_bounds(date)
        .map(|(first, last)| first.iter_days().take_while(|day| *day <= last).collect())
        .unwrap_or_default()
}

fn grid_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let month_start = date.with_day(1)?;
    let month_end = month_start
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    let lead = u64::from(month_start.weekday().num_days_from_sunday());
    let trail = u64::from(6 - month_end.weekday().num_days_from_sunday());
    Some((
        month_start.checked_sub_days(Days::new(lead))?,
        month_end.checked_add_days(Days::new(trail))?,
    ))
}
