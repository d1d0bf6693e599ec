//! In-memory alarm scheduler for tests.
//!
//! Clones share state. Time only moves when a test calls
//! [`MemoryAlarmScheduler::fire_due`].

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use remind_core::{ReminderError, Result, Task, TaskId};
use remind_notify::{Notification, NotificationEmitter};

use crate::key::AlarmKey;
use crate::registration::{AlarmTable, Registration};
use crate::scheduler::{AlarmScheduler, AlarmSource};

#[derive(Debug)]
struct State {
    table: AlarmTable,
    exact_alarms: bool,
    scheduled: Vec<AlarmKey>,
    cancelled: Vec<AlarmKey>,
}

/// Alarm scheduler kept in memory.
#[derive(Clone, Debug)]
pub struct MemoryAlarmScheduler {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryAlarmScheduler {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                table: AlarmTable::new(),
                exact_alarms: true,
                scheduled: Vec::new(),
                cancelled: Vec::new(),
            })),
        }
    }
}

impl MemoryAlarmScheduler {
    /// Scheduler that grants exact alarms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every later `schedule` with `PermissionDenied`.
    pub fn deny_exact_alarms(&self) {
        self.state.lock().exact_alarms = false;
    }

    /// Pending registrations ordered by fire time.
    pub fn pending(&self) -> Vec<Registration> {
        self.state.lock().table.registrations()
    }

    /// Keys passed to successful `schedule` calls, in order.
    pub fn scheduled_keys(&self) -> Vec<AlarmKey> {
        self.state.lock().scheduled.clone()
    }

    /// Keys passed to `cancel`, in order.
    pub fn cancelled_keys(&self) -> Vec<AlarmKey> {
        self.state.lock().cancelled.clone()
    }

    /// Fire everything due by `now_millis` through `emitter`.
    pub fn fire_due(&self, now_millis: i64, emitter: &NotificationEmitter) -> Vec<Notification> {
        let due = self.state.lock().table.take_due(now_millis);
        due.iter().map(|r| emitter.on_fire(&r.payload)).collect()
    }
}

impl AlarmScheduler for MemoryAlarmScheduler {
    fn schedule(&self, task: &Task) -> Result<()> {
        let mut state = self.state.lock();
        if !state.exact_alarms {
            return Err(ReminderError::PermissionDenied(
                "exact alarms are not permitted".to_string(),
            ));
        }
        let registration = Registration::for_task(task);
        state.scheduled.push(registration.key.clone());
        let _ = state.table.insert(registration);
        Ok(())
    }

    fn cancel(&self, task: &Task) -> Result<()> {
        let mut state = self.state.lock();
        let key = AlarmKey::for_task(task);
        let _ = state.table.remove(&key);
        state.cancelled.push(key);
        Ok(())
    }

    fn prune(&self, keep: &[TaskId]) -> Result<usize> {
        let keep: HashSet<AlarmKey> = keep.iter().map(AlarmKey::for_id).collect();
        Ok(self.state.lock().table.retain_keys(&keep))
    }
}

impl AlarmSource for MemoryAlarmScheduler {
    fn take_due(&self, now_millis: i64) -> Result<Vec<Registration>> {
        Ok(self.state.lock().table.take_due(now_millis))
    }
}

#[cfg(test)]
mod tests {
    use remind_core::TaskDraft;
    use remind_notify::{NotificationSink, RecordingSink};

    use super::*;

    fn task() -> Task {
        Task::create(&TaskDraft::new("Pay rent", "Due monthly", "2025-03-01", "09:00")).unwrap()
    }

    fn emitter(sink: &RecordingSink) -> NotificationEmitter {
        NotificationEmitter::new(vec![Arc::new(sink.clone()) as Arc<dyn NotificationSink>], true)
    }

    #[test]
    fn schedule_replace_fires_second_payload_once() {
        let alarms = MemoryAlarmScheduler::new();
        let first = task();
        let mut draft = TaskDraft::from(&first);
        draft.description = "Second payload".into();
        let second = first.rebuild(&draft).unwrap();

        alarms.schedule(&first).unwrap();
        alarms.schedule(&second).unwrap();
        assert_eq!(alarms.pending().len(), 1);

        let sink = RecordingSink::new();
        let fired = alarms.fire_due(second.alarm_epoch_millis, &emitter(&sink));
        assert_eq!(fired.len(), 1);
        assert_eq!(sink.shown()[0].body, "Second payload");
    }

    #[test]
    fn cancel_then_fire_produces_nothing() {
        let alarms = MemoryAlarmScheduler::new();
        let rent = task();
        alarms.schedule(&rent).unwrap();
        alarms.cancel(&rent).unwrap();

        let sink = RecordingSink::new();
        assert!(alarms.fire_due(i64::MAX, &emitter(&sink)).is_empty());
        assert!(sink.shown().is_empty());
        assert_eq!(alarms.cancelled_keys(), vec![AlarmKey::for_task(&rent)]);
    }

    #[test]
    fn not_yet_due_does_not_fire() {
        let alarms = MemoryAlarmScheduler::new();
        let rent = task();
        alarms.schedule(&rent).unwrap();
        let sink = RecordingSink::new();
        assert!(alarms.fire_due(rent.alarm_epoch_millis - 1, &emitter(&sink)).is_empty());
        assert_eq!(alarms.pending().len(), 1);
    }

    #[test]
    fn denied_schedule_registers_nothing() {
        let alarms = MemoryAlarmScheduler::new();
        alarms.deny_exact_alarms();
        assert!(alarms.schedule(&task()).unwrap_err().is_degraded());
        assert!(alarms.pending().is_empty());
        assert!(alarms.scheduled_keys().is_empty());
    }
}
