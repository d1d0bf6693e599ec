//! Notification output targets.

use std::io::Write;
use std::process::Command;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::NotifyError;
use crate::notification::Notification;

/// BEL, the terminal's default alert sound.
const BELL: &[u8] = b"\x07";

/// Somewhere a notification can be shown.
pub trait NotificationSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Show the alert.
    fn display(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Play the default alert sound, if this sink can.
    fn play_sound(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TerminalSink
// ─────────────────────────────────────────────────────────────────────────────

/// Writes alerts to a terminal stream; the sound is a BEL.
pub struct TerminalSink<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalSink<std::io::Stderr> {
    /// Sink writing to stderr.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> NotificationSink for TerminalSink<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn display(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut out = self.out.lock();
        writeln!(out, "[reminder] {}", notification.title)?;
        writeln!(out, "  {}", notification.body)?;
        out.flush()?;
        Ok(())
    }

    fn play_sound(&self) -> Result<(), NotifyError> {
        let mut out = self.out.lock();
        out.write_all(BELL)?;
        out.flush()?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CommandSink
// ─────────────────────────────────────────────────────────────────────────────

/// Runs a host notification command such as `notify-send`.
///
/// `{title}` and `{body}` in the arguments are replaced per alert.
#[derive(Clone, Debug)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    /// Build from `[program, args...]`. `None` when `command` is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Arguments with placeholders filled in.
    pub fn render_args(&self, notification: &Notification) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| fill_placeholders(arg, &notification.title, &notification.body))
            .collect()
    }
}

/// Single pass over `template`; substituted text is never rescanned.
fn fill_placeholders(template: &str, title: &str, body: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{title}") {
            out.push_str(title);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{body}") {
            out.push_str(body);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

impl NotificationSink for CommandSink {
    fn name(&self) -> &'static str {
        "command"
    }

    fn display(&self, notification: &Notification) -> Result<(), NotifyError> {
        let status = Command::new(&self.program)
            .args(self.render_args(notification))
            .status()
            .map_err(|e| NotifyError::Command {
                program: self.program.clone(),
                message: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(NotifyError::Command {
                program: self.program.clone(),
                message: status.to_string(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RecordingSink
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Recorded {
    shown: Vec<Notification>,
    sounds: usize,
}

/// Test sink that records what it was asked to show. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Recorded>>,
    fail: bool,
}

impl RecordingSink {
    /// Sink that records successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Notifications shown so far.
    pub fn shown(&self) -> Vec<Notification> {
        self.recorded.lock().shown.clone()
    }

    /// Number of sounds played.
    pub fn sounds(&self) -> usize {
        self.recorded.lock().sounds
    }

    fn check(&self) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "sink closed",
            )));
        }
        Ok(())
    }
}

impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn display(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.check()?;
        self.recorded.lock().shown.push(notification.clone());
        Ok(())
    }

    fn play_sound(&self) -> Result<(), NotifyError> {
        self.check()?;
        self.recorded.lock().sounds += 1;
        Ok(())
    }
}
