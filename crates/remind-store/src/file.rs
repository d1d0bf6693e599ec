//! JSON file task store.
//!
//! The collection lives in one document:
//!
//! ```json
//! { "version": 1, "tasks": [ { "id": "task-…", "title": "…", … } ] }
//! ```
//!
//! Saves go through [`remind_core::fs::write_atomic`], so a crash mid-save
//! leaves the previous document intact. A document that exists but does not
//! decode is handled per [`CorruptPolicy`].

use std::path::{Path, PathBuf};

use remind_core::{ReminderError, Result, Task};
use remind_settings::{CorruptPolicy, RemindSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::TaskStore;

/// Current document schema version.
const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentOut<'a> {
    version: u32,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct DocumentIn {
    version: u32,
    tasks: Vec<Task>,
}

/// Task store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    on_corrupt: CorruptPolicy,
}

impl JsonFileStore {
    /// Store at `path` with the given corrupt-file policy.
    pub fn new(path: impl Into<PathBuf>, on_corrupt: CorruptPolicy) -> Self {
        Self {
            path: path.into(),
            on_corrupt,
        }
    }

    /// Store at the configured task path.
    pub fn from_settings(settings: &RemindSettings) -> Self {
        Self::new(settings.tasks_path(), settings.store.on_corrupt)
    }

    /// Path of the task file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Task>> {
        let doc: DocumentIn = serde_json::from_slice(bytes)
            .map_err(|e| ReminderError::corrupt(&self.path, e.to_string()))?;
        if doc.version != DOCUMENT_VERSION {
            return Err(ReminderError::corrupt(
                &self.path,
                format!("unsupported document version {}", doc.version),
            ));
        }
        Ok(doc.tasks)
    }

    /// Rename the corrupt file to `<name>.corrupt-<unix millis>`.
    fn quarantine(&self) -> Result<PathBuf> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp_millis()));
        let target = PathBuf::from(name);
        std::fs::rename(&self.path, &target).map_err(|e| ReminderError::io(&self.path, e))?;
        Ok(target)
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Task>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no task file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(ReminderError::io(&self.path, e)),
        };

        match self.decode(&bytes) {
            Ok(tasks) => {
                debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
                Ok(tasks)
            }
            Err(err) => match self.on_corrupt {
                CorruptPolicy::Fail => Err(err),
                CorruptPolicy::StartEmpty => {
                    let moved_to = self.quarantine()?;
                    warn!(
                        error = %err,
                        moved_to = %moved_to.display(),
                        "task file unreadable, starting with an empty list"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let doc = DocumentOut {
            version: DOCUMENT_VERSION,
            tasks,
        };
        let json = serde_json::to_vec_pretty(&doc)
            .map_err(|e| ReminderError::io(&self.path, std::io::Error::other(e)))?;
        remind_core::fs::write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}
