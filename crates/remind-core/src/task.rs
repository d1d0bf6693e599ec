//! The task entity and its user-supplied draft.
//!
//! A [`Task`] is immutable once built; edits replace it wholesale via
//! [`Task::rebuild`], which keeps the [`TaskId`] and recomputes the cached
//! alarm instant.

use serde::{Deserialize, Serialize};

use crate::errors::{ReminderError, Result};
use crate::ids::TaskId;
use crate::payload::Payload;
use crate::time::alarm_epoch_millis;

/// User input for creating or editing a task.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title (must be non-blank).
    pub title: String,
    /// Task description (must be non-blank).
    pub description: String,
    /// `YEAR-MONTH-DAY`.
    pub date: String,
    /// `HOUR:MINUTE`.
    pub time: String,
}

impl TaskDraft {
    /// Build a draft from its four fields.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            date: task.date.clone(),
            time: task.time.clone(),
        }
    }
}

/// A titled reminder with a single scheduled fire time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier assigned at creation.
    pub id: TaskId,
    /// Trimmed, non-blank title.
    pub title: String,
    /// Trimmed, non-blank description.
    pub description: String,
    /// `YEAR-MONTH-DAY` as entered.
    pub date: String,
    /// `HOUR:MINUTE` as entered.
    pub time: String,
    /// Local-time instant of `(date, time)`, computed at last edit.
    pub alarm_epoch_millis: i64,
}

impl Task {
    /// Validate a draft and build a task with a fresh ID.
    pub fn create(draft: &TaskDraft) -> Result<Self> {
        Self::build(TaskId::new(), draft)
    }

    /// Validate a draft and build its replacement, keeping this task's ID.
    pub fn rebuild(&self, draft: &TaskDraft) -> Result<Self> {
        Self::build(self.id.clone(), draft)
    }

    fn build(id: TaskId, draft: &TaskDraft) -> Result<Self> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ReminderError::validation("title", "Please enter a task title."));
        }
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ReminderError::validation(
                "description",
                "Please enter a task description.",
            ));
        }
        let date = draft.date.trim();
        let time = draft.time.trim();
        let alarm_epoch_millis = alarm_epoch_millis(date, time)?;

        Ok(Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            alarm_epoch_millis,
        })
    }

    /// The `(title, date, time)` triple this task answers to.
    pub fn identity(&self) -> IdentityTriple {
        IdentityTriple::new(&self.title, &self.date, &self.time)
    }

    /// The payload delivered when this task's alarm fires.
    pub fn payload(&self) -> Payload {
        Payload::new(&self.title, &self.description)
    }
}

/// `(title, date, time)` lookup key for callers that lack a [`TaskId`].
///
/// Not unique: two tasks may share a triple, in which case the first in
/// collection order matches.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityTriple {
    /// Task title.
    pub title: String,
    /// `YEAR-MONTH-DAY`.
    pub date: String,
    /// `HOUR:MINUTE`.
    pub time: String,
}

impl IdentityTriple {
    /// Build a triple from its parts.
    pub fn new(title: impl Into<String>, date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    /// Whether `task` answers to this triple (fields compared verbatim).
    pub fn matches(&self, task: &Task) -> bool {
        task.title == self.title && task.date == self.date && task.time == self.time
    }
}
