//! Fire-time alert rendering.

use std::sync::Arc;

use remind_core::Payload;
use remind_settings::NotifySettings;
use tracing::{info, warn};

use crate::notification::Notification;
use crate::sinks::{CommandSink, NotificationSink, TerminalSink};

/// Shows a notification and plays the alert sound for a fired alarm.
///
/// Each [`on_fire`](Self::on_fire) is independent. A sink that fails is
/// logged and skipped; the remaining sinks still run.
#[derive(Clone)]
pub struct NotificationEmitter {
    sinks: Vec<Arc<dyn NotificationSink>>,
    sound: bool,
}

impl NotificationEmitter {
    /// Emitter over explicit sinks.
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>, sound: bool) -> Self {
        Self { sinks, sound }
    }

    /// Emitter configured from settings: terminal and/or host command.
    pub fn from_settings(settings: &NotifySettings) -> Self {
        let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
        if settings.terminal {
            sinks.push(Arc::new(TerminalSink::stderr()));
        }
        if let Some(command) = CommandSink::from_command(&settings.command) {
            sinks.push(Arc::new(command));
        }
        Self::new(sinks, settings.sound)
    }

    /// Number of configured sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Render `payload` and dispatch it to every sink.
    ///
    /// Returns the notification that was shown.
    pub fn on_fire(&self, payload: &Payload) -> Notification {
        let notification = Notification::from(payload);

        for sink in &self.sinks {
            if let Err(e) = sink.display(&notification) {
                warn!(sink = sink.name(), error = %e, "failed to display notification");
            }
        }
        if self.sound {
            for sink in &self.sinks {
                if let Err(e) = sink.play_sound() {
                    warn!(sink = sink.name(), error = %e, "failed to play alert sound");
                }
            }
        }

        info!(title = %notification.title, sinks = self.sinks.len(), "reminder fired");
        notification
    }
}
