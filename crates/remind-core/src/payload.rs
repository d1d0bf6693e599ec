//! Notification payload captured at scheduling time.

use serde::{Deserialize, Serialize};

/// Title shown when a payload carries none.
pub const DEFAULT_TITLE: &str = "Task Reminder";

/// Body shown when a payload carries no description.
pub const DEFAULT_DESCRIPTION: &str = "Your task is due";

/// The `(title, description)` pair delivered verbatim when an alarm fires.
///
/// Either field may be absent in a registration written by an older or
/// foreign writer; the emitter substitutes the fixed fallbacks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Task title at scheduling time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Task description at scheduling time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Payload {
    /// Build a payload with both fields present.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    /// Title, or [`DEFAULT_TITLE`] when absent.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Description, or [`DEFAULT_DESCRIPTION`] when absent.
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_fields_are_verbatim() {
        let payload = Payload::new("Pay rent", "Due monthly");
        assert_eq!(payload.title_or_default(), "Pay rent");
        assert_eq!(payload.description_or_default(), "Due monthly");
    }

    #[test]
    fn absent_fields_fall_back() {
        let payload = Payload::default();
        assert_eq!(payload.title_or_default(), "Task Reminder");
        assert_eq!(payload.description_or_default(), "Your task is due");
    }

    #[test]
    fn missing_json_fields_deserialize_as_absent() {
        let payload: Payload = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Only title"));
        assert!(payload.description.is_none());
    }
}
