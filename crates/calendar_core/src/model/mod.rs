//! Calendar domain model.
//!
//! # Responsibility
//! - Define the event record shared by the engine, repositories and services.
//! - Model recurrence as a tagged union with per-kind payloads.
//!
//! # Invariants
//! - Every event is identified by a stable, non-empty `EventId`.
//! - Occurrences are derived values and never persisted.
//!
//! # See also
//! - `engine::occurrence` for how occurrences are derived.

pub mod event;
pub mod recurrence;
