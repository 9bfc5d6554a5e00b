//! Service layer for calendar use-cases.
//!
//! # Responsibility
//! - Provide stable mutation and query entry points for core callers.
//! - Keep repository and engine details behind one state holder.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.

pub mod calendar_service;
