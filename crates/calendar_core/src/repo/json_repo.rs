//! JSON file event repository.
//!
//! # Responsibility
//! - Persist the whole event collection as one JSON array document.
//!
//! # Invariants
//! - A missing file loads as an empty collection.
//! - Writes go to a sibling temp file first, then replace the target.
//! - A failed replace removes the temp file.

use crate::model::event::Event;
use crate::repo::event_repo::{validate_collection, EventRepository, RepoError, RepoResult};
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Event repository backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileEventRepository {
    path: PathBuf,
}

impl JsonFileEventRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "events.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, events: &[Event]) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = serde_json::to_vec_pretty(events)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, document)?;
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }
}

impl EventRepository for JsonFileEventRepository {
    fn load_events(&self) -> RepoResult<Vec<Event>> {
        let started_at = Instant::now();
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("event=events_load module=repo status=ok backend=json count=0 reason=missing_file");
                return Ok(Vec::new());
            }
            Err(err) => return Err(RepoError::Io(err)),
        };

        let events: Vec<Event> = serde_json::from_slice(&bytes)?;
        validate_collection(&events)?;

        info!(
            "event=events_load module=repo status=ok backend=json count={} duration_ms={}",
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(events)
    }

    fn save_events(&self, events: &[Event]) -> RepoResult<()> {
        validate_collection(events)?;
        let started_at = Instant::now();
        let result = self.write_document(events);
        match &result {
            Ok(()) => info!(
                "event=events_save module=repo status=ok backend=json count={} duration_ms={}",
                events.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=events_save module=repo status=error backend=json duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}
