//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the load/save contract for the event collection.
//! - Isolate SQLite and file format details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Event::validate()` and id uniqueness before
//!   persistence.
//! - Stored order equals collection order.

pub mod event_repo;
pub mod json_repo;
pub mod memory_repo;
