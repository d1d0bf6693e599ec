//! # remind-tasks
//!
//! The [`TaskController`] owns the authoritative task list. Every mutation
//! follows the same order:
//!
//! 1. validate the draft (a rejected draft changes nothing)
//! 2. mutate the in-memory list
//! 3. persist the whole list through the [`TaskStore`](remind_store::TaskStore)
//! 4. register, replace, or cancel the task's alarm through the
//!    [`AlarmScheduler`](remind_alarm::AlarmScheduler)
//!
//! A refused alarm does not fail the mutation; it is reported as
//! [`ReminderStatus::Degraded`]. [`render`] formats the list and detail views.

#![deny(unsafe_code)]

pub mod controller;
pub mod render;

pub use controller::{Mutation, ReconcileReport, ReminderStatus, TaskController};
