//! Error taxonomy for task persistence and alarm scheduling.
//!
//! Every failure the controller can surface to the user maps onto one
//! [`ReminderError`] variant:
//!
//! - [`ReminderError::Validation`]: blank title/description or an unparseable
//!   date/time. Blocks the mutation.
//! - [`ReminderError::CorruptData`]: a persisted blob exists but cannot be
//!   decoded.
//! - [`ReminderError::Io`]: a read or write failed. The operation is
//!   abandoned without rollback.
//! - [`ReminderError::PermissionDenied`]: the host refused a precise alarm.
//!   The task survives; only its reminder is lost.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the store, scheduler, and controller.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// User input failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// User-facing explanation.
        message: String,
    },

    /// A persisted blob exists but could not be decoded.
    #[error("corrupt data in {}: {message}", path.display())]
    CorruptData {
        /// File holding the undecodable blob.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// Reading or writing persisted state failed.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The host refused to register a precise alarm.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl ReminderError {
    /// Build a [`ReminderError::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Build a [`ReminderError::CorruptData`].
    pub fn corrupt(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::CorruptData {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Build a [`ReminderError::Io`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this failure leaves the task intact with only its reminder lost.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Result alias for reminder operations.
pub type Result<T> = std::result::Result<T, ReminderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = ReminderError::validation("title", "Please enter a task title.");
        assert_eq!(err.to_string(), "invalid title: Please enter a task title.");
    }

    #[test]
    fn corrupt_display_includes_path() {
        let err = ReminderError::corrupt("/tmp/tasks.json", "expected value at line 1");
        let text = err.to_string();
        assert!(text.contains("/tmp/tasks.json"));
        assert!(text.contains("expected value"));
    }

    #[test]
    fn io_keeps_source() {
        let err = ReminderError::io(
            "/tmp/tasks.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn only_permission_denied_is_degraded() {
        assert!(ReminderError::PermissionDenied("exact alarms".into()).is_degraded());
        assert!(!ReminderError::validation("title", "blank").is_degraded());
        assert!(!ReminderError::corrupt("x", "y").is_degraded());
    }
}
