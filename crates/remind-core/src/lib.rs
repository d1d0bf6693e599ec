//! # remind-core
//!
//! Foundation types shared by every `remind` crate:
//!
//! - **IDs**: [`TaskId`], a stable identifier assigned at creation
//! - **Tasks**: [`Task`], [`TaskDraft`], and the [`IdentityTriple`] lookup key
//! - **Alarm time**: parsing of `YEAR-MONTH-DAY` / `HOUR:MINUTE` and the
//!   local-time conversion to epoch millis
//! - **Payloads**: [`Payload`], the `(title, description)` pair delivered at
//!   fire time
//! - **Errors**: [`ReminderError`] via `thiserror`
//! - **Files**: [`fs::write_atomic`] for temp-then-rename replacement

#![deny(unsafe_code)]

pub mod errors;
pub mod fs;
pub mod ids;
pub mod payload;
pub mod task;
pub mod time;

pub use errors::{ReminderError, Result};
pub use ids::TaskId;
pub use payload::{DEFAULT_DESCRIPTION, DEFAULT_TITLE, Payload};
pub use task::{IdentityTriple, Task, TaskDraft};
pub use time::{alarm_epoch_millis, alarm_epoch_millis_in, now_millis, parse_date, parse_time};
