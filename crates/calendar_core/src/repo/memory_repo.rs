//! In-process event repository for tests and ephemeral sessions.

use crate::model::event::Event;
use crate::repo::event_repo::{validate_collection, EventRepository, RepoResult};
use std::cell::RefCell;

/// Keeps the last saved collection in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RefCell<Vec<Event>>,
    save_count: RefCell<usize>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store without counting as a save.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RefCell::new(events),
            save_count: RefCell::new(0),
        }
    }

    /// Snapshot of the currently stored collection.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Number of successful `save_events` calls.
    pub fn save_count(&self) -> usize {
        *self.save_count.borrow()
    }
}

impl EventRepository for InMemoryEventRepository {
    fn load_events(&self) -> RepoResult<Vec<Event>> {
        let events = self.snapshot();
        validate_collection(&events)?;
        Ok(events)
    }

    fn save_events(&self, events: &[Event]) -> RepoResult<()> {
        validate_collection(events)?;
        *self.events.borrow_mut() = events.to_vec();
        *self.save_count.borrow_mut() += 1;
        Ok(())
    }
}
