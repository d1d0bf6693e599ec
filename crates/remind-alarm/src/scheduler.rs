//! Scheduler contracts.

use remind_core::{Result, Task, TaskId};

use crate::registration::Registration;

/// Registers and cancels the one alarm each task owns.
pub trait AlarmScheduler: Send + Sync {
    /// Register an alarm for `task` at its `alarm_epoch_millis`, replacing
    /// any pending alarm under the same key. Past instants are accepted.
    ///
    /// Fails with `PermissionDenied` when the host refuses precise alarms.
    fn schedule(&self, task: &Task) -> Result<()>;

    /// Remove the pending alarm for `task`, if any.
    fn cancel(&self, task: &Task) -> Result<()>;

    /// Remove every pending alarm not owned by one of `keep`. Returns the
    /// number removed.
    fn prune(&self, keep: &[TaskId]) -> Result<usize>;
}

/// Yields alarms whose time has come.
pub trait AlarmSource: Send + Sync {
    /// Remove and return every registration due by `now_millis`.
    fn take_due(&self, now_millis: i64) -> Result<Vec<Registration>>;
}
