//! # remind
//!
//! Command-line front end: wires settings, logging, the task store, and the
//! alarm table together, then runs one subcommand.

#![deny(unsafe_code)]

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use remind_alarm::FileAlarmScheduler;
use remind_core::{IdentityTriple, TaskDraft, TaskId};
use remind_settings::{RemindSettings, WriteMode};
use remind_store::{BatchedStore, JsonFileStore, TaskStore};
use remind_tasks::TaskController;

/// Task reminders with a local alarm watcher.
#[derive(Parser, Debug)]
#[command(name = "remind", about = "Task reminders with a local alarm watcher")]
struct Cli {
    /// Directory holding tasks, alarms, and settings (default `~/.remind`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level or filter directive (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Settings file (default `<data dir>/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a task and schedule its reminder.
    Add(AddArgs),
    /// Change a task; unspecified fields keep their values.
    Edit(EditArgs),
    /// Delete a task and cancel its reminder.
    Delete(Selector),
    /// List all tasks.
    List,
    /// Show one task.
    Show(Selector),
    /// Fire due reminders until interrupted.
    Watch {
        /// Fire what is due now and exit.
        #[arg(long)]
        once: bool,
    },
    /// Show a reminder notification immediately.
    Fire {
        /// Notification title.
        #[arg(long)]
        title: Option<String>,
        /// Notification body.
        #[arg(long)]
        description: Option<String>,
    },
    /// Re-register every task's reminder and drop orphaned alarms.
    Reconcile,
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Task title.
    #[arg(long)]
    title: String,
    /// Task description.
    #[arg(long)]
    description: String,
    /// Due date, `YEAR-MONTH-DAY`.
    #[arg(long)]
    date: String,
    /// Due time, `HOUR:MINUTE` (24-hour).
    #[arg(long)]
    time: String,
}

impl From<AddArgs> for TaskDraft {
    fn from(args: AddArgs) -> Self {
        TaskDraft::new(args.title, args.description, args.date, args.time)
    }
}

#[derive(Args, Debug)]
struct EditArgs {
    #[command(flatten)]
    selector: Selector,
    /// New title.
    #[arg(long)]
    title: Option<String>,
    /// New description.
    #[arg(long)]
    description: Option<String>,
    /// New due date.
    #[arg(long)]
    date: Option<String>,
    /// New due time.
    #[arg(long)]
    time: Option<String>,
}

impl EditArgs {
    /// Overlay the given fields on `base`.
    fn apply(self, mut base: TaskDraft) -> TaskDraft {
        if let Some(title) = self.title {
            base.title = title;
        }
        if let Some(description) = self.description {
            base.description = description;
        }
        if let Some(date) = self.date {
            base.date = date;
        }
        if let Some(time) = self.time {
            base.time = time;
        }
        base
    }
}

/// Picks a task by ID, or by its exact `(title, date, time)`.
#[derive(Args, Debug)]
struct Selector {
    /// Task ID as printed by `list`.
    #[arg(
        required_unless_present = "match_title",
        conflicts_with_all = ["match_title", "match_date", "match_time"]
    )]
    id: Option<String>,
    /// Title of the task to select.
    #[arg(long, requires_all = ["match_date", "match_time"])]
    match_title: Option<String>,
    /// Date of the task to select, as entered.
    #[arg(long, requires = "match_title")]
    match_date: Option<String>,
    /// Time of the task to select, as entered.
    #[arg(long, requires = "match_title")]
    match_time: Option<String>,
}

impl Selector {
    /// The selected task's ID, if it names one that exists.
    fn resolve(&self, controller: &TaskController) -> Option<TaskId> {
        if let Some(id) = &self.id {
            return Some(TaskId::from(id.as_str()));
        }
        let triple = IdentityTriple::new(
            self.match_title.clone()?,
            self.match_date.clone()?,
            self.match_time.clone()?,
        );
        controller.find_by_identity(&triple).map(|t| t.id.clone())
    }
}

/// Load settings and apply command-line overrides.
fn resolve_settings(cli: &Cli) -> Result<RemindSettings> {
    let path = cli
        .settings
        .clone()
        .unwrap_or_else(|| remind_settings::settings_path(cli.data_dir.as_deref()));
    let mut settings = remind_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;

    if let Some(dir) = &cli.data_dir {
        settings.data_dir = Some(dir.display().to_string());
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level.clone_from(level);
    }
    Ok(settings)
}

/// Build the task store selected by `store.writeMode`.
fn build_store(settings: &RemindSettings) -> Box<dyn TaskStore> {
    let file = JsonFileStore::from_settings(settings);
    match settings.store.write_mode {
        WriteMode::Sync => Box::new(file),
        WriteMode::Batched => Box::new(BatchedStore::new(file)),
    }
}

fn open_controller(settings: &RemindSettings) -> Result<TaskController> {
    TaskController::open(
        build_store(settings),
        Box::new(FileAlarmScheduler::from_settings(settings)),
    )
    .with_context(|| format!("Failed to load tasks from {}", settings.tasks_path().display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    remind_logging::init_subscriber(&settings.logging.level, settings.logging.format);
    tracing::debug!(data_dir = %settings.data_dir().display(), "settings resolved");

    match cli.command {
        Command::Add(args) => {
            let mut controller = open_controller(&settings)?;
            commands::add(&mut controller, &args.into())?;
            controller.flush()?;
        }
        Command::Edit(args) => {
            let mut controller = open_controller(&settings)?;
            let Some(id) = args.selector.resolve(&controller) else {
                commands::report_no_match();
                return Ok(());
            };
            let Some(current) = controller.get(&id).map(TaskDraft::from) else {
                commands::report_no_match();
                return Ok(());
            };
            commands::edit(&mut controller, &id, &args.apply(current))?;
            controller.flush()?;
        }
        Command::Delete(selector) => {
            let mut controller = open_controller(&settings)?;
            match selector.resolve(&controller) {
                Some(id) => commands::delete(&mut controller, &id)?,
                None => commands::report_no_match(),
            }
            controller.flush()?;
        }
        Command::List => commands::list(&open_controller(&settings)?),
        Command::Show(selector) => {
            let controller = open_controller(&settings)?;
            match selector.resolve(&controller) {
                Some(id) => commands::show(&controller, &id),
                None => commands::report_no_match(),
            }
        }
        Command::Watch { once } => commands::watch(&settings, once).await?,
        Command::Fire { title, description } => commands::fire(&settings, title, description),
        Command::Reconcile => commands::reconcile(&open_controller(&settings)?)?,
    }
    Ok(())
}
