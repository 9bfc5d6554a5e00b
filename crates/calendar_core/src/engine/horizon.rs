//! Conflict look-ahead horizon.
//!
//! # Invariants
//! - The horizon window is `[anchor, anchor + months)`.
//! - Occurrences starting outside the window are never conflict-checked.

use crate::engine::dates::add_months;
use chrono::{Local, NaiveDateTime};

/// Default look-ahead for conflict detection.
pub const DEFAULT_HORIZON_MONTHS: u32 = 6;

/// Look-ahead window anchored at an explicit "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub anchor: NaiveDateTime,
    pub months: u32,
}

impl Horizon {
    /// Horizon of [`DEFAULT_HORIZON_MONTHS`] starting at `anchor`.
    pub fn starting_at(anchor: NaiveDateTime) -> Self {
        Self {
            anchor,
            months: DEFAULT_HORIZON_MONTHS,
        }
    }

    /// Horizon anchored at the current local wall-clock time.
    pub fn from_now() -> Self {
        Self::starting_at(Local::now().naive_local())
    }

    pub fn with_months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    /// Exclusive end of the window, saturating at the latest representable instant.
    pub fn end(&self) -> NaiveDateTime {
        add_months(self.anchor, self.months).unwrap_or(NaiveDateTime::MAX)
    }

    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.anchor, self.end())
    }
}
