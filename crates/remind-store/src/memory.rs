//! In-memory task store for tests.
//!
//! Clones share state, so a test can hand one clone to the controller and
//! inspect the other.

use std::sync::Arc;

use parking_lot::Mutex;
use remind_core::{ReminderError, Result, Task};

use crate::TaskStore;

#[derive(Debug, Default)]
enum Blob {
    #[default]
    Missing,
    Tasks(Vec<Task>),
    Corrupt,
}

#[derive(Debug, Default)]
struct State {
    blob: Blob,
    saves: usize,
    fail_next_save: bool,
}

/// Task store kept in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Empty store with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `tasks`.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let store = Self::new();
        store.state.lock().blob = Blob::Tasks(tasks);
        store
    }

    /// Store whose persisted blob cannot be decoded.
    pub fn corrupt() -> Self {
        let store = Self::new();
        store.state.lock().blob = Blob::Corrupt;
        store
    }

    /// Make the next `save` fail with an I/O error.
    pub fn fail_next_save(&self) {
        self.state.lock().fail_next_save = true;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.lock().saves
    }

    /// The persisted collection, or `None` if nothing decodable is stored.
    pub fn persisted(&self) -> Option<Vec<Task>> {
        match &self.state.lock().blob {
            Blob::Tasks(tasks) => Some(tasks.clone()),
            Blob::Missing | Blob::Corrupt => None,
        }
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Vec<Task>> {
        match &self.state.lock().blob {
            Blob::Missing => Ok(Vec::new()),
            Blob::Tasks(tasks) => Ok(tasks.clone()),
            Blob::Corrupt => Err(ReminderError::corrupt("<memory>", "undecodable blob")),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next_save) {
            return Err(ReminderError::io(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
            ));
        }
        state.blob = Blob::Tasks(tasks.to_vec());
        state.saves += 1;
        Ok(())
    }
}
