//! Recurrence rule model.
//!
//! # Responsibility
//! - Represent how an event repeats as a tagged union.
//! - Render rule summaries for detail views.
//!
//! # Invariants
//! - Payloads only exist on the kind they belong to.
//! - Weekday indices use 0 = Sunday .. 6 = Saturday.
//! - Malformed rules (empty weekday set, missing custom interval) are kept
//!   as-is; the engine applies fallback stepping instead of rejecting them.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Unit for custom-interval recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
}

impl IntervalUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            _ => None,
        }
    }
}

/// "Every `interval` `unit`" payload of a custom rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomInterval {
    pub interval: u32,
    pub unit: IntervalUnit,
}

/// Recurrence kind with its kind-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecurrenceRule {
    #[default]
    None,
    Daily,
    Weekly {
        #[serde(default)]
        days_of_week: Vec<u8>,
    },
    Monthly,
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every: Option<CustomInterval>,
    },
}

impl RecurrenceRule {
    /// Stable lowercase kind name used in storage.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly { .. } => "weekly",
            Self::Monthly => "monthly",
            Self::Custom { .. } => "custom",
        }
    }
}

/// Recurrence rule plus optional inclusive end date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(flatten)]
    pub rule: RecurrenceRule,
    /// Last calendar day on which an occurrence may start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
}

impl Recurrence {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn daily() -> Self {
        Self::from_rule(RecurrenceRule::Daily)
    }

    /// Weekly on the given weekday indices (0 = Sunday). Order is irrelevant.
    pub fn weekly(days_of_week: impl IntoIterator<Item = u8>) -> Self {
        Self::from_rule(RecurrenceRule::Weekly {
            days_of_week: days_of_week.into_iter().collect(),
        })
    }

    pub fn monthly() -> Self {
        Self::from_rule(RecurrenceRule::Monthly)
    }

    pub fn every(interval: u32, unit: IntervalUnit) -> Self {
        Self::from_rule(RecurrenceRule::Custom {
            every: Some(CustomInterval { interval, unit }),
        })
    }

    pub fn from_rule(rule: RecurrenceRule) -> Self {
        Self { rule, until: None }
    }

    /// Sets the inclusive last day for occurrences.
    pub fn until(mut self, last_day: NaiveDate) -> Self {
        self.until = Some(last_day);
        self
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self.rule, RecurrenceRule::None)
    }

    /// Summary text for a rule anchored at `anchor`.
    ///
    /// The `until` date is not included; detail views render it separately.
    pub fn describe(&self, anchor: NaiveDateTime) -> String {
        match &self.rule {
            RecurrenceRule::None => "Does not repeat".to_string(),
            RecurrenceRule::Daily => "Repeats daily".to_string(),
            RecurrenceRule::Weekly { days_of_week } => {
                let days = sorted_weekdays(days_of_week);
                if days.is_empty() {
                    return "Repeats weekly".to_string();
                }
                let labels = days
                    .iter()
                    .map(|day| WEEKDAY_LABELS[usize::from(*day)])
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Repeats weekly on {labels}")
            }
            RecurrenceRule::Monthly => format!("Repeats monthly on day {}", anchor.day()),
            RecurrenceRule::Custom { every: Some(every) } => {
                format!("Repeats every {} {}", every.interval, every.unit.as_str())
            }
            RecurrenceRule::Custom { every: None } => "Custom recurrence".to_string(),
        }
    }
}

/// Returns valid weekday indices sorted ascending without duplicates.
///
/// Indices outside `0..=6` are dropped.
pub fn sorted_weekdays(days_of_week: &[u8]) -> Vec<u8> {
    let mut days: Vec<u8> = days_of_week.iter().copied().filter(|day| *day < 7).collect();
    days.sort_unstable();
    days.dedup();
    days
}
