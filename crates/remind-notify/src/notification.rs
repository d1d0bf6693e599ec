//! The rendered alert.

use remind_core::Payload;
use serde::{Deserialize, Serialize};

/// Alert importance. Reminders use a single level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Interrupting alert with sound.
    #[default]
    High,
}

/// A single user-visible alert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Importance.
    pub severity: Severity,
}

impl From<&Payload> for Notification {
    fn from(payload: &Payload) -> Self {
        Self {
            title: payload.title_or_default().to_string(),
            body: payload.description_or_default().to_string(),
            severity: Severity::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use remind_core::{DEFAULT_DESCRIPTION, DEFAULT_TITLE};

    use super::*;

    #[test]
    fn payload_copied_verbatim() {
        let n = Notification::from(&Payload::new("  Pay rent", "Due monthly "));
        assert_eq!(n.title, "  Pay rent");
        assert_eq!(n.body, "Due monthly ");
        assert_eq!(n.severity, Severity::High);
    }

    #[test]
    fn absent_fields_use_fallbacks() {
        let n = Notification::from(&Payload {
            title: None,
            description: Some("Only body".into()),
        });
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.body, "Only body");

        let n = Notification::from(&Payload::default());
        assert_eq!(n.body, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn serializes_severity_lowercase() {
        let n = Notification::from(&Payload::default());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["severity"], "high");
    }
}
