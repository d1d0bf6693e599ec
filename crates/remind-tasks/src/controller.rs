//! Task list controller.

use remind_alarm::AlarmScheduler;
use remind_core::{IdentityTriple, Result, Task, TaskDraft, TaskId};
use remind_store::TaskStore;
use tracing::{debug, info, warn};

/// Outcome of registering a task's alarm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReminderStatus {
    /// The alarm is pending.
    Scheduled,
    /// The task was saved but the host refused its alarm.
    Degraded(String),
}

impl ReminderStatus {
    /// Whether the reminder will not fire.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// A task written by `create` or `edit`, with the state of its reminder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    /// The task as stored.
    pub task: Task,
    /// Whether its alarm is pending.
    pub reminder: ReminderStatus,
}

/// Counts from [`TaskController::reconcile`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tasks whose alarm is pending.
    pub scheduled: usize,
    /// Tasks whose alarm the host refused.
    pub degraded: usize,
    /// Orphaned alarms removed.
    pub pruned: usize,
}

/// Owns the task list and keeps the store and alarm table consistent with it.
///
/// The list is loaded once in [`open`](Self::open) and rewritten in full
/// after every mutation.
pub struct TaskController {
    tasks: Vec<Task>,
    store: Box<dyn TaskStore>,
    alarms: Box<dyn AlarmScheduler>,
}

impl std::fmt::Debug for TaskController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskController")
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl TaskController {
    /// Load the persisted list.
    ///
    /// Fails with `CorruptData` or `Io` from the store.
    pub fn open(store: Box<dyn TaskStore>, alarms: Box<dyn AlarmScheduler>) -> Result<Self> {
        let tasks = store.load()?;
        info!(count = tasks.len(), "task list loaded");
        Ok(Self {
            tasks,
            store,
            alarms,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task with `id`.
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// First task answering to `triple`.
    pub fn find_by_identity(&self, triple: &IdentityTriple) -> Option<&Task> {
        self.tasks.iter().find(|t| triple.matches(t))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Validate `draft`, append it, persist, and schedule its alarm.
    ///
    /// A validation failure leaves the list and the store untouched.
    pub fn create(&mut self, draft: &TaskDraft) -> Result<Mutation> {
        let task = Task::create(draft)?;
        self.tasks.push(task.clone());
        self.persist()?;
        info!(task_id = %task.id, title = %task.title, "task created");

        let reminder = self.arm(&task)?;
        Ok(Mutation { task, reminder })
    }

    /// Replace the task with `id`, keeping its ID, then persist and
    /// move its alarm to the new time and payload.
    ///
    /// Returns `Ok(None)` without persisting when no task has `id`.
    pub fn edit(&mut self, id: &TaskId, draft: &TaskDraft) -> Result<Option<Mutation>> {
        let Some(index) = self.position(id) else {
            debug!(task_id = %id, "edit ignored, no such task");
            return Ok(None);
        };
        let previous = self.tasks[index].clone();
        let task = previous.rebuild(draft)?;
        self.tasks[index] = task.clone();
        self.persist()?;
        info!(task_id = %task.id, "task edited");

        self.alarms.cancel(&previous)?;
        let reminder = self.arm(&task)?;
        Ok(Some(Mutation { task, reminder }))
    }

    /// Remove the task with `id`, persist, and cancel its alarm.
    ///
    /// Returns `Ok(None)` without persisting when no task has `id`.
    pub fn delete(&mut self, id: &TaskId) -> Result<Option<Task>> {
        let Some(index) = self.position(id) else {
            debug!(task_id = %id, "delete ignored, no such task");
            return Ok(None);
        };
        let task = self.tasks.remove(index);
        self.persist()?;
        info!(task_id = %task.id, "task deleted");

        self.alarms.cancel(&task)?;
        Ok(Some(task))
    }

    /// Re-register every task's alarm and drop alarms whose task is gone.
    ///
    /// Used after a restart or a crash between persisting and scheduling.
    pub fn reconcile(&self) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for task in &self.tasks {
            match self.arm(task)? {
                ReminderStatus::Scheduled => report.scheduled += 1,
                ReminderStatus::Degraded(_) => report.degraded += 1,
            }
        }
        let keep: Vec<TaskId> = self.tasks.iter().map(|t| t.id.clone()).collect();
        report.pruned = self.alarms.prune(&keep)?;

        info!(
            scheduled = report.scheduled,
            degraded = report.degraded,
            pruned = report.pruned,
            "alarms reconciled"
        );
        Ok(report)
    }

    /// Write buffered saves through the store.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.tasks).inspect_err(|e| {
            warn!(error = %e, count = self.tasks.len(), "failed to persist task list");
        })
    }

    fn arm(&self, task: &Task) -> Result<ReminderStatus> {
        match self.alarms.schedule(task) {
            Ok(()) => Ok(ReminderStatus::Scheduled),
            Err(e) if e.is_degraded() => {
                warn!(task_id = %task.id, error = %e, "reminder not scheduled");
                Ok(ReminderStatus::Degraded(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use remind_alarm::{AlarmKey, MemoryAlarmScheduler};
    use remind_core::ReminderError;
    use remind_logging::test_utils::capture_logs;
    use remind_store::MemoryStore;
    use tracing::Level;

    use super::*;

    fn rent() -> TaskDraft {
        TaskDraft::new("Pay rent", "Due monthly", "2025-03-01", "09:00")
    }

    fn controller(store: &MemoryStore, alarms: &MemoryAlarmScheduler) -> TaskController {
        TaskController::open(Box::new(store.clone()), Box::new(alarms.clone())).unwrap()
    }

    #[test]
    fn open_empty_store() {
        let ctl = controller(&MemoryStore::new(), &MemoryAlarmScheduler::new());
        assert!(ctl.tasks().is_empty());
    }

    #[test]
    fn open_corrupt_store_fails() {
        let result = TaskController::open(
            Box::new(MemoryStore::corrupt()),
            Box::new(MemoryAlarmScheduler::new()),
        );
        assert_matches!(result, Err(ReminderError::CorruptData { .. }));
    }

    #[test]
    fn create_persists_then_schedules() {
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&store, &alarms);

        let created = ctl.create(&rent()).unwrap();
        assert_eq!(created.reminder, ReminderStatus::Scheduled);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.persisted().unwrap(), vec![created.task.clone()]);
        assert_eq!(alarms.scheduled_keys(), vec![AlarmKey::for_task(&created.task)]);
    }

    #[test]
    fn create_keeps_insertion_order() {
        let mut ctl = controller(&MemoryStore::new(), &MemoryAlarmScheduler::new());
        let a = ctl.create(&rent()).unwrap().task;
        let b = ctl
            .create(&TaskDraft::new("Call bank", "Ask about fees", "2025-03-02", "10:00"))
            .unwrap()
            .task;
        let ids: Vec<_> = ctl.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[test]
    fn create_blank_title_rejected() {
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&store, &alarms);
        let mut draft = rent();
        draft.title = "   ".into();

        assert_matches!(
            ctl.create(&draft),
            Err(ReminderError::Validation { field: "title", .. })
        );
        assert!(ctl.tasks().is_empty());
        assert_eq!(store.save_count(), 0);
        assert!(alarms.pending().is_empty());
    }

    #[test]
    fn create_with_failed_save_keeps_memory_and_skips_alarm() {
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&store, &alarms);
        store.fail_next_save();

        assert_matches!(ctl.create(&rent()), Err(ReminderError::Io { .. }));
        assert_eq!(ctl.tasks().len(), 1);
        assert!(store.persisted().is_none());
        assert!(alarms.pending().is_empty());
    }

    #[test]
    fn create_with_denied_alarm_is_degraded() {
        let (logs, _guard) = capture_logs();
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        alarms.deny_exact_alarms();
        let mut ctl = controller(&store, &alarms);

        let created = ctl.create(&rent()).unwrap();
        assert!(created.reminder.is_degraded());
        assert_eq!(store.persisted().unwrap().len(), 1);
        assert!(alarms.pending().is_empty());
        assert!(logs.has_event(Level::WARN, "reminder not scheduled"));
    }

    #[test]
    fn edit_cancels_old_and_schedules_new() {
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&MemoryStore::new(), &alarms);
        let original = ctl.create(&rent()).unwrap().task;

        let mut draft = TaskDraft::from(&original);
        draft.time = "10:30".into();
        let edited = ctl.edit(&original.id, &draft).unwrap().unwrap().task;

        assert_eq!(edited.id, original.id);
        assert_ne!(edited.alarm_epoch_millis, original.alarm_epoch_millis);
        assert_eq!(alarms.cancelled_keys(), vec![AlarmKey::for_task(&original)]);
        let pending = alarms.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at_millis, edited.alarm_epoch_millis);
    }

    #[test]
    fn edit_unknown_id_is_dropped() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store, &MemoryAlarmScheduler::new());
        let _ = ctl.create(&rent()).unwrap();

        let outcome = ctl.edit(&TaskId::from("task-missing"), &rent()).unwrap();
        assert!(outcome.is_none());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn edit_invalid_draft_changes_nothing() {
        let store = MemoryStore::new();
        let mut ctl = controller(&store, &MemoryAlarmScheduler::new());
        let original = ctl.create(&rent()).unwrap().task;

        let mut draft = TaskDraft::from(&original);
        draft.date = "2025-02-30".into();
        assert_matches!(
            ctl.edit(&original.id, &draft),
            Err(ReminderError::Validation { .. })
        );
        assert_eq!(ctl.get(&original.id), Some(&original));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn delete_removes_and_cancels() {
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&store, &alarms);
        let task = ctl.create(&rent()).unwrap().task;

        assert_eq!(ctl.delete(&task.id).unwrap(), Some(task.clone()));
        assert!(ctl.tasks().is_empty());
        assert_eq!(store.persisted().unwrap(), Vec::<Task>::new());
        assert!(alarms.pending().is_empty());
        assert_eq!(alarms.cancelled_keys(), vec![AlarmKey::for_task(&task)]);
    }

    #[test]
    fn delete_absent_is_noop() {
        let store = MemoryStore::new();
        let alarms = MemoryAlarmScheduler::new();
        let mut ctl = controller(&store, &alarms);
        let _ = ctl.create(&rent()).unwrap();

        assert!(ctl.delete(&TaskId::from("task-missing")).unwrap().is_none());
        assert_eq!(ctl.tasks().len(), 1);
        assert_eq!(store.save_count(), 1);
        assert!(alarms.cancelled_keys().is_empty());
    }

    #[test]
    fn find_by_identity_first_match_wins() {
        let mut ctl = controller(&MemoryStore::new(), &MemoryAlarmScheduler::new());
        let first = ctl.create(&rent()).unwrap().task;
        let _second = ctl
            .create(&TaskDraft::new("Pay rent", "Other note", "2025-03-01", "09:00"))
            .unwrap();

        let found = ctl
            .find_by_identity(&IdentityTriple::new("Pay rent", "2025-03-01", "09:00"))
            .unwrap();
        assert_eq!(found.id, first.id);
        assert!(
            ctl.find_by_identity(&IdentityTriple::new("Pay rent", "2025-03-01", "9:00"))
                .is_none()
        );
    }

    #[test]
    fn reconcile_reschedules_and_prunes() {
        let existing = Task::create(&rent()).unwrap();
        let orphan = Task::create(&TaskDraft::new("Gone", "Deleted elsewhere", "2025-04-01", "08:00"))
            .unwrap();
        let alarms = MemoryAlarmScheduler::new();
        alarms.schedule(&orphan).unwrap();

        let ctl = controller(&MemoryStore::with_tasks(vec![existing.clone()]), &alarms);
        let report = ctl.reconcile().unwrap();

        assert_eq!(
            report,
            ReconcileReport {
                scheduled: 1,
                degraded: 0,
                pruned: 1
            }
        );
        let pending = alarms.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].task_id, existing.id);
    }

    #[test]
    fn reconcile_counts_degraded() {
        let alarms = MemoryAlarmScheduler::new();
        alarms.deny_exact_alarms();
        let store = MemoryStore::with_tasks(vec![Task::create(&rent()).unwrap()]);
        let report = controller(&store, &alarms).reconcile().unwrap();
        assert_eq!(report.degraded, 1);
        assert_eq!(report.scheduled, 0);
    }
}
