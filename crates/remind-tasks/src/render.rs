//! Text for the list and detail views.

use remind_core::Task;

/// Shown in place of the list when there are no tasks.
pub const EMPTY_LIST: &str = "No tasks yet.";

/// One list row: title, then `{date} - {time}`.
pub fn list_row(task: &Task) -> String {
    format!("{}  {} - {}", task.title, task.date, task.time)
}

/// The full list, one row per line in collection order.
pub fn list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return EMPTY_LIST.to_string();
    }
    tasks.iter().map(list_row).collect::<Vec<_>>().join("\n")
}

/// Detail view of one task.
pub fn detail(task: &Task) -> String {
    format!(
        "{}\nDescription: {}\nDate: {}\nTime: {}",
        task.title, task.description, task.date, task.time
    )
}
