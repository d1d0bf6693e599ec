//! Subcommand handlers.

use std::time::Duration;

use anyhow::{Context, Result};
use remind_alarm::{AlarmWatcher, FileAlarmScheduler};
use remind_core::{Payload, TaskDraft, TaskId};
use remind_notify::NotificationEmitter;
use remind_settings::RemindSettings;
use remind_tasks::{Mutation, ReminderStatus, TaskController, render};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn add(controller: &mut TaskController, draft: &TaskDraft) -> Result<()> {
    let mutation = controller.create(draft).context("Failed to add task")?;
    println!("Created {}", mutation.task.id);
    report(&mutation);
    Ok(())
}

pub fn edit(controller: &mut TaskController, id: &TaskId, draft: &TaskDraft) -> Result<()> {
    match controller.edit(id, draft).context("Failed to edit task")? {
        Some(mutation) => {
            println!("Updated {}", mutation.task.id);
            report(&mutation);
        }
        None => report_no_match(),
    }
    Ok(())
}

pub fn delete(controller: &mut TaskController, id: &TaskId) -> Result<()> {
    match controller.delete(id).context("Failed to delete task")? {
        Some(task) => println!("Deleted {}", render::list_row(&task)),
        None => report_no_match(),
    }
    Ok(())
}

pub fn list(controller: &TaskController) {
    if controller.tasks().is_empty() {
        println!("{}", render::EMPTY_LIST);
        return;
    }
    for task in controller.tasks() {
        println!("{}  {}", task.id, render::list_row(task));
    }
}

pub fn show(controller: &TaskController, id: &TaskId) {
    match controller.get(id) {
        Some(task) => println!("{}", render::detail(task)),
        None => report_no_match(),
    }
}

pub fn reconcile(controller: &TaskController) -> Result<()> {
    let report = controller.reconcile().context("Failed to reconcile alarms")?;
    println!(
        "Scheduled {}, degraded {}, pruned {}",
        report.scheduled, report.degraded, report.pruned
    );
    if report.degraded > 0 {
        eprintln!("Exact alarms are not permitted; {} reminder(s) will not fire.", report.degraded);
    }
    Ok(())
}

pub fn fire(settings: &RemindSettings, title: Option<String>, description: Option<String>) {
    let emitter = NotificationEmitter::from_settings(&settings.notify);
    let _ = emitter.on_fire(&Payload { title, description });
}

pub async fn watch(settings: &RemindSettings, once: bool) -> Result<()> {
    let emitter = NotificationEmitter::from_settings(&settings.notify);
    let watcher = AlarmWatcher::new(
        FileAlarmScheduler::from_settings(settings),
        emitter,
        Duration::from_millis(settings.alarms.poll_interval_ms),
    );

    if once {
        let fired = watcher.run_once().context("Failed to read alarm table")?;
        println!("Fired {fired} reminder(s)");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let _signal = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping watcher");
                on_signal.cancel();
            }
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    let fired = watcher.run(cancel).await;
    println!("Fired {fired} reminder(s)");
    Ok(())
}

pub fn report_no_match() {
    eprintln!("No matching task.");
}

/// Surface a refused reminder once; the task itself was saved.
fn report(mutation: &Mutation) {
    if let ReminderStatus::Degraded(reason) = &mutation.reminder {
        eprintln!("Task saved, but its reminder will not fire: {reason}");
    }
}
