//! Sink delivery errors.

use thiserror::Error;

/// Failure to deliver a notification through one sink.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Writing to the output stream failed.
    #[error("failed to write notification: {0}")]
    Io(#[from] std::io::Error),

    /// The host notification command could not run or exited non-zero.
    #[error("notification command `{program}` failed: {message}")]
    Command {
        /// Program that was invoked.
        program: String,
        /// Spawn error or exit status.
        message: String,
    },
}
