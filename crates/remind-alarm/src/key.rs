//! Alarm registration keys.

use std::fmt::{self, Write as _};

use remind_core::{Task, TaskId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Key of a pending alarm: `alarm-` + 16 hex chars of SHA-256 of the task ID.
///
/// Registering twice under one key replaces the earlier registration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmKey(String);

impl AlarmKey {
    /// Key for the task with `id`.
    pub fn for_id(id: &TaskId) -> Self {
        let digest = Sha256::digest(id.as_str().as_bytes());
        let mut key = String::from("alarm-");
        for byte in &digest[..8] {
            let _ = write!(key, "{byte:02x}");
        }
        Self(key)
    }

    /// Key for `task`.
    pub fn for_task(task: &Task) -> Self {
        Self::for_id(&task.id)
    }

    /// Return the inner string as a slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlarmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_per_id() {
        let id = TaskId::from("task-0192");
        assert_eq!(AlarmKey::for_id(&id), AlarmKey::for_id(&id));
        assert_ne!(AlarmKey::for_id(&id), AlarmKey::for_id(&TaskId::from("task-0193")));
    }

    #[test]
    fn shape() {
        let key = AlarmKey::for_id(&TaskId::from("task-abc"));
        assert!(key.as_str().starts_with("alarm-"));
        assert_eq!(key.as_str().len(), "alarm-".len() + 16);
        assert!(key.as_str()["alarm-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
