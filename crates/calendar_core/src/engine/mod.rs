//! Recurrence expansion and conflict engine.
//!
//! # Responsibility
//! - Expand events into concrete occurrences within a window.
//! - Answer per-day queries and same-day overlap checks.
//! - Plan conflict-checked moves.
//!
//! # Invariants
//! - Every function is a pure projection over a borrowed collection; the
//!   engine holds no state between calls.
//! - "Now" enters only through an explicit [`Horizon`].
//!
//! # See also
//! - `service::calendar_service` for the stateful entry points.

pub mod conflict;
pub mod dates;
pub mod horizon;
pub mod occurrence;
pub mod query;
pub mod reschedule;

pub use conflict::{find_conflict, has_conflict, occurrences_collide, ConflictPair};
pub use dates::month_grid;
pub use horizon::{Horizon, DEFAULT_HORIZON_MONTHS};
pub use occurrence::{next_occurrence, occurrence_starts, occurrences, occurs_on};
pub use query::{display_order, occurrences_between, occurrences_on_day, sort_for_display};
pub use reschedule::{move_event, plan_move, replace_event, MoveOutcome};
