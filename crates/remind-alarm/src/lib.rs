//! # remind-alarm
//!
//! Maps each task to exactly one pending one-shot alarm.
//!
//! - [`AlarmKey`]: deterministic key derived from the task's ID
//! - [`Registration`] / [`AlarmTable`]: what is pending and when it fires
//! - [`AlarmScheduler`]: schedule / cancel / prune, used by the controller
//! - [`AlarmSource`]: take due registrations, used by the watcher
//! - [`FileAlarmScheduler`]: the alarm table as a file that outlives the
//!   process, standing in for the host's alarm service
//! - [`MemoryAlarmScheduler`]: in-memory fake
//! - [`AlarmWatcher`]: polls for due alarms and hands payloads to the
//!   [`NotificationEmitter`](remind_notify::NotificationEmitter)

#![deny(unsafe_code)]

pub mod file;
pub mod key;
pub mod memory;
pub mod registration;
pub mod scheduler;
pub mod watcher;

pub use file::FileAlarmScheduler;
pub use key::AlarmKey;
pub use memory::MemoryAlarmScheduler;
pub use registration::{AlarmTable, Registration};
pub use scheduler::{AlarmScheduler, AlarmSource};
pub use watcher::AlarmWatcher;
