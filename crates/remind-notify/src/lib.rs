//! # remind-notify
//!
//! Turns a fired alarm's [`Payload`](remind_core::Payload) into a
//! user-visible alert.
//!
//! The [`NotificationEmitter`] is stateless per fire: it never looks at the
//! task store, only at the payload captured when the alarm was registered.
//! Output goes to one or more [`NotificationSink`]s.

#![deny(unsafe_code)]

pub mod emitter;
pub mod errors;
pub mod notification;
pub mod sinks;

pub use emitter::NotificationEmitter;
pub use errors::NotifyError;
pub use notification::{Notification, Severity};
pub use sinks::{CommandSink, NotificationSink, RecordingSink, TerminalSink};
