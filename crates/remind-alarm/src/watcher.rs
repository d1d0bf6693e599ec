//! Due-alarm polling loop.

use std::time::Duration;

use remind_core::{Result, now_millis};
use remind_notify::NotificationEmitter;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::scheduler::AlarmSource;

/// Polls an [`AlarmSource`] and fires every due registration through a
/// [`NotificationEmitter`].
///
/// Each registration is taken from the source before it is fired, so it
/// fires at most once even if the watcher is restarted.
pub struct AlarmWatcher<S: AlarmSource> {
    source: S,
    emitter: NotificationEmitter,
    poll_interval: Duration,
}

impl<S: AlarmSource> AlarmWatcher<S> {
    /// Watcher polling `source` every `poll_interval`.
    pub fn new(source: S, emitter: NotificationEmitter, poll_interval: Duration) -> Self {
        Self {
            source,
            emitter,
            poll_interval,
        }
    }

    /// Fire everything due by `now_millis`. Returns the number fired.
    pub fn tick_at(&self, now_millis: i64) -> Result<usize> {
        let due = self.source.take_due(now_millis)?;
        for registration in &due {
            debug!(
                key = %registration.key,
                task_id = %registration.task_id,
                late_ms = now_millis - registration.fire_at_millis,
                "alarm due"
            );
            let _ = self.emitter.on_fire(&registration.payload);
        }
        Ok(due.len())
    }

    /// Fire everything due by the current wall-clock time.
    pub fn run_once(&self) -> Result<usize> {
        self.tick_at(now_millis())
    }

    /// Poll until `cancel` fires. Returns the total number of alarms fired.
    ///
    /// A failed poll is logged and retried on the next interval.
    pub async fn run(&self, cancel: CancellationToken) -> usize {
        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut fired = 0;

        info!(poll_interval = ?self.poll_interval, "alarm watcher started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => match self.run_once() {
                    Ok(n) => fired += n,
                    Err(e) => warn!(error = %e, "failed to poll alarms"),
                },
            }
        }
        info!(fired, "alarm watcher stopped");
        fired
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use remind_core::{ReminderError, Task, TaskDraft};
    use remind_logging::test_utils::capture_logs;
    use remind_notify::{NotificationSink, RecordingSink};
    use tracing::Level;

    use super::*;
    use crate::memory::MemoryAlarmScheduler;
    use crate::registration::Registration;
    use crate::scheduler::AlarmScheduler;

    fn task(title: &str, date: &str) -> Task {
        Task::create(&TaskDraft::new(title, "Due monthly", date, "09:00")).unwrap()
    }

    fn watcher<S: AlarmSource>(source: S, sink: &RecordingSink) -> AlarmWatcher<S> {
        let emitter =
            NotificationEmitter::new(vec![Arc::new(sink.clone()) as Arc<dyn NotificationSink>], false);
        AlarmWatcher::new(source, emitter, Duration::from_millis(1_000))
    }

    /// Fails on the first poll, then yields nothing.
    struct FlakySource {
        polls: AtomicUsize,
    }

    impl AlarmSource for FlakySource {
        fn take_due(&self, _now_millis: i64) -> remind_core::Result<Vec<Registration>> {
            if self.polls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ReminderError::io(
                    "alarms.json",
                    std::io::Error::other("disk unplugged"),
                ));
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn tick_fires_only_due_alarms() {
        let alarms = MemoryAlarmScheduler::new();
        let due = task("Pay rent", "2025-03-01");
        let later = task("Renew lease", "2025-09-01");
        alarms.schedule(&due).unwrap();
        alarms.schedule(&later).unwrap();

        let sink = RecordingSink::new();
        let watcher = watcher(alarms.clone(), &sink);
        assert_eq!(watcher.tick_at(due.alarm_epoch_millis).unwrap(), 1);
        assert_eq!(sink.shown()[0].title, "Pay rent");

        // Already taken: a second tick at the same instant fires nothing.
        assert_eq!(watcher.tick_at(due.alarm_epoch_millis).unwrap(), 0);
        assert_eq!(alarms.pending().len(), 1);
    }

    #[test]
    fn past_alarm_fires_on_first_tick() {
        let alarms = MemoryAlarmScheduler::new();
        alarms.schedule(&task("Old", "2001-01-01")).unwrap();
        let sink = RecordingSink::new();
        assert_eq!(watcher(alarms, &sink).run_once().unwrap(), 1);
    }

    #[test]
    fn tick_error_propagates() {
        let sink = RecordingSink::new();
        let watcher = watcher(FlakySource { polls: AtomicUsize::new(0) }, &sink);
        assert!(watcher.run_once().is_err());
        assert_eq!(watcher.run_once().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_fires_then_stops_on_cancel() {
        let alarms = MemoryAlarmScheduler::new();
        alarms.schedule(&task("Pay rent", "2025-03-01")).unwrap();
        alarms.schedule(&task("Call bank", "2025-03-02")).unwrap();

        let sink = RecordingSink::new();
        let watcher = watcher(alarms.clone(), &sink);
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let _stop = tokio::spawn(async move {
            time::sleep(Duration::from_millis(2_500)).await;
            stopper.cancel();
        });

        assert_eq!(watcher.run(cancel).await, 2);
        assert_eq!(sink.shown().len(), 2);
        assert!(alarms.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_survives_failed_poll() {
        let (logs, _guard) = capture_logs();
        let sink = RecordingSink::new();
        let watcher = watcher(FlakySource { polls: AtomicUsize::new(0) }, &sink);
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        let _stop = tokio::spawn(async move {
            time::sleep(Duration::from_millis(3_500)).await;
            stopper.cancel();
        });

        assert_eq!(watcher.run(cancel).await, 0);
        assert!(logs.has_event(Level::WARN, "failed to poll alarms"));
        assert!(logs.has_event(Level::INFO, "alarm watcher stopped"));
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let sink = RecordingSink::new();
        let watcher = watcher(MemoryAlarmScheduler::new(), &sink);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(watcher.run(cancel).await, 0);
    }
}
