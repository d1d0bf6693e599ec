//! File-backed alarm table.
//!
//! Pending registrations are kept in one JSON document that survives
//! process restarts:
//!
//! ```json
//! { "version": 1, "alarms": [ { "key": "alarm-…", "taskId": "task-…",
//!   "fireAtMillis": 1740819600000, "payload": { "title": "…" } } ] }
//! ```
//!
//! Every call reads the document, applies one change, and atomically
//! rewrites it. The watcher process drains due entries from the same file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use remind_core::{ReminderError, Result, Task, TaskId};
use remind_settings::RemindSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::key::AlarmKey;
use crate::registration::{AlarmTable, Registration};
use crate::scheduler::{AlarmScheduler, AlarmSource};

const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct AlarmDocument {
    version: u32,
    alarms: Vec<Registration>,
}

/// Alarm scheduler persisting its table to a JSON file.
#[derive(Clone, Debug)]
pub struct FileAlarmScheduler {
    path: PathBuf,
    exact_alarms: bool,
}

impl FileAlarmScheduler {
    /// Table at `path`. With `exact_alarms = false` every `schedule` is
    /// refused.
    pub fn new(path: impl Into<PathBuf>, exact_alarms: bool) -> Self {
        Self {
            path: path.into(),
            exact_alarms,
        }
    }

    /// Table at the configured alarm path.
    pub fn from_settings(settings: &RemindSettings) -> Self {
        Self::new(settings.alarms_path(), settings.alarms.exact_alarms)
    }

    /// Path of the alarm table.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registrations currently pending, ordered by fire time.
    pub fn pending(&self) -> Result<Vec<Registration>> {
        Ok(self.read_table()?.registrations())
    }

    fn read_table(&self) -> Result<AlarmTable> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AlarmTable::new()),
            Err(e) => return Err(ReminderError::io(&self.path, e)),
        };
        let doc: AlarmDocument = serde_json::from_slice(&bytes)
            .map_err(|e| ReminderError::corrupt(&self.path, e.to_string()))?;
        if doc.version != DOCUMENT_VERSION {
            return Err(ReminderError::corrupt(
                &self.path,
                format!("unsupported document version {}", doc.version),
            ));
        }
        Ok(AlarmTable::from_registrations(doc.alarms))
    }

    fn write_table(&self, table: &AlarmTable) -> Result<()> {
        let doc = AlarmDocument {
            version: DOCUMENT_VERSION,
            alarms: table.registrations(),
        };
        let json = serde_json::to_vec_pretty(&doc)
            .map_err(|e| ReminderError::io(&self.path, std::io::Error::other(e)))?;
        remind_core::fs::write_atomic(&self.path, &json)
    }
}

impl AlarmScheduler for FileAlarmScheduler {
    fn schedule(&self, task: &Task) -> Result<()> {
        if !self.exact_alarms {
            warn!(task_id = %task.id, "exact alarms not permitted, reminder will not fire");
            return Err(ReminderError::PermissionDenied(
                "exact alarms are not permitted on this host".to_string(),
            ));
        }

        let registration = Registration::for_task(task);
        let key = registration.key.clone();
        let fire_at = registration.fire_at_millis;

        let mut table = self.read_table()?;
        let replaced = table.insert(registration).is_some();
        self.write_table(&table)?;

        info!(task_id = %task.id, %key, fire_at, replaced, "alarm scheduled");
        Ok(())
    }

    fn cancel(&self, task: &Task) -> Result<()> {
        let key = AlarmKey::for_task(task);
        let mut table = self.read_table()?;
        if table.remove(&key).is_some() {
            self.write_table(&table)?;
            info!(task_id = %task.id, %key, "alarm cancelled");
        } else {
            debug!(task_id = %task.id, %key, "no pending alarm to cancel");
        }
        Ok(())
    }

    fn prune(&self, keep: &[TaskId]) -> Result<usize> {
        let keep: HashSet<AlarmKey> = keep.iter().map(AlarmKey::for_id).collect();
        let mut table = self.read_table()?;
        let removed = table.retain_keys(&keep);
        if removed > 0 {
            self.write_table(&table)?;
            info!(removed, "pruned orphaned alarms");
        }
        Ok(removed)
    }
}

impl AlarmSource for FileAlarmScheduler {
    fn take_due(&self, now_millis: i64) -> Result<Vec<Registration>> {
        let mut table = self.read_table()?;
        let due = table.take_due(now_millis);
        if !due.is_empty() {
            self.write_table(&table)?;
            debug!(count = due.len(), remaining = table.len(), "drained due alarms");
        }
        Ok(due)
    }
}
