//! Pending alarm registrations.

use std::collections::{BTreeMap, HashSet};

use remind_core::{Payload, Task, TaskId};
use serde::{Deserialize, Serialize};

use crate::key::AlarmKey;

/// One pending one-shot alarm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Replacement key.
    pub key: AlarmKey,
    /// Task the alarm was registered for.
    pub task_id: TaskId,
    /// Fire instant in epoch millis.
    pub fire_at_millis: i64,
    /// Payload captured at registration time.
    pub payload: Payload,
}

impl Registration {
    /// Registration for `task` as it is now.
    pub fn for_task(task: &Task) -> Self {
        Self {
            key: AlarmKey::for_task(task),
            task_id: task.id.clone(),
            fire_at_millis: task.alarm_epoch_millis,
            payload: task.payload(),
        }
    }

    /// Whether the alarm should have fired by `now_millis`.
    pub fn is_due(&self, now_millis: i64) -> bool {
        self.fire_at_millis <= now_millis
    }
}

/// Set of pending registrations, at most one per key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlarmTable {
    entries: BTreeMap<AlarmKey, Registration>,
}

impl AlarmTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list; later entries win on duplicate keys.
    pub fn from_registrations(registrations: Vec<Registration>) -> Self {
        let mut table = Self::new();
        for registration in registrations {
            let _ = table.insert(registration);
        }
        table
    }

    /// Insert or replace. Returns the replaced registration.
    pub fn insert(&mut self, registration: Registration) -> Option<Registration> {
        self.entries.insert(registration.key.clone(), registration)
    }

    /// Remove by key.
    pub fn remove(&mut self, key: &AlarmKey) -> Option<Registration> {
        self.entries.remove(key)
    }

    /// Pending registration for `key`.
    pub fn get(&self, key: &AlarmKey) -> Option<&Registration> {
        self.entries.get(key)
    }

    /// Remove and return every registration due by `now_millis`, earliest
    /// first (ties broken by key).
    pub fn take_due(&mut self, now_millis: i64) -> Vec<Registration> {
        let due_keys: Vec<AlarmKey> = self
            .entries
            .values()
            .filter(|r| r.is_due(now_millis))
            .map(|r| r.key.clone())
            .collect();
        let mut due: Vec<Registration> = due_keys
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect();
        due.sort_by(|a, b| {
            a.fire_at_millis
                .cmp(&b.fire_at_millis)
                .then_with(|| a.key.cmp(&b.key))
        });
        due
    }

    /// Drop registrations whose key is not in `keep`. Returns how many went.
    pub fn retain_keys(&mut self, keep: &HashSet<AlarmKey>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| keep.contains(key));
        before - self.entries.len()
    }

    /// Registrations ordered by fire time.
    pub fn registrations(&self) -> Vec<Registration> {
        let mut all: Vec<Registration> = self.entries.values().cloned().collect();
        all.sort_by_key(|r| r.fire_at_millis);
        all
    }

    /// Number of pending registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(id: &str, at: i64, title: &str) -> Registration {
        let task_id = TaskId::from(id);
        Registration {
            key: AlarmKey::for_id(&task_id),
            task_id,
            fire_at_millis: at,
            payload: Payload::new(title, "body"),
        }
    }

    #[test]
    fn insert_same_key_replaces() {
        let mut table = AlarmTable::new();
        assert!(table.insert(reg("task-1", 100, "first")).is_none());
        let replaced = table.insert(reg("task-1", 200, "second")).unwrap();
        assert_eq!(replaced.payload.title.as_deref(), Some("first"));
        assert_eq!(table.len(), 1);
        let key = AlarmKey::for_id(&TaskId::from("task-1"));
        assert_eq!(table.get(&key).unwrap().fire_at_millis, 200);
    }

    #[test]
    fn take_due_removes_only_due_in_order() {
        let mut table = AlarmTable::from_registrations(vec![
            reg("task-late", 300, "late"),
            reg("task-b", 100, "b"),
            reg("task-future", 1_000, "future"),
            reg("task-a", 50, "a"),
        ]);
        let due = table.take_due(300);
        let titles: Vec<_> = due.iter().map(|r| r.payload.title_or_default()).collect();
        assert_eq!(titles, vec!["a", "b", "late"]);
        assert_eq!(table.len(), 1);
        assert!(table.take_due(300).is_empty());
    }

    #[test]
    fn retain_keys_prunes_orphans() {
        let mut table = AlarmTable::from_registrations(vec![reg("task-1", 1, "a"), reg("task-2", 2, "b")]);
        let keep: HashSet<_> = [AlarmKey::for_id(&TaskId::from("task-2"))].into_iter().collect();
        assert_eq!(table.retain_keys(&keep), 1);
        assert_eq!(table.registrations()[0].task_id.as_str(), "task-2");
    }

    #[test]
    fn registration_serializes_camel_case() {
        let json = serde_json::to_value(reg("task-1", 42, "t")).unwrap();
        assert_eq!(json["fireAtMillis"], 42);
        assert_eq!(json["taskId"], "task-1");
        assert_eq!(json["payload"]["title"], "t");
    }
}
