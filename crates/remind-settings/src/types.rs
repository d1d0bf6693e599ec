//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! `settings.json` fills the rest from compiled defaults.

use std::path::PathBuf;

use remind_logging::LogFormat;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};
use crate::loader::default_data_dir;

/// Root settings type.
///
/// ```json
/// {
///   "dataDir": "/home/me/.remind",
///   "store": { "onCorrupt": "startEmpty" },
///   "alarms": { "pollIntervalMs": 500 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemindSettings {
    /// Settings schema version.
    pub version: String,
    /// Directory holding task and alarm files. `None` means `~/.remind`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Task store behaviour.
    pub store: StoreSettings,
    /// Alarm table and watcher behaviour.
    pub alarms: AlarmSettings,
    /// Notification output.
    pub notify: NotifySettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for RemindSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            data_dir: None,
            store: StoreSettings::default(),
            alarms: AlarmSettings::default(),
            notify: NotifySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl RemindSettings {
    /// The data directory, falling back to `~/.remind`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map_or_else(default_data_dir, PathBuf::from)
    }

    /// Full path of the task file.
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir().join(&self.store.tasks_file)
    }

    /// Full path of the alarm table.
    pub fn alarms_path(&self) -> PathBuf {
        self.data_dir().join(&self.alarms.alarms_file)
    }

    /// Reject values that would make the store or watcher unusable.
    pub fn validate(&self) -> Result<()> {
        if self.store.tasks_file.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "store.tasksFile must not be empty".to_string(),
            ));
        }
        if self.alarms.alarms_file.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "alarms.alarmsFile must not be empty".to_string(),
            ));
        }
        if self.store.tasks_file == self.alarms.alarms_file {
            return Err(SettingsError::InvalidValue(
                "store.tasksFile and alarms.alarmsFile must differ".to_string(),
            ));
        }
        if self.alarms.poll_interval_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "alarms.pollIntervalMs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// What to do when the task file exists but cannot be decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorruptPolicy {
    /// Refuse to load; the session cannot proceed.
    #[default]
    Fail,
    /// Move the corrupt file aside and start with an empty collection.
    StartEmpty,
}

impl CorruptPolicy {
    /// Parse a policy name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "startempty" | "start-empty" | "empty" => Some(Self::StartEmpty),
            _ => None,
        }
    }
}

/// When task saves reach disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Every save writes through before returning.
    #[default]
    Sync,
    /// Saves are buffered and written on flush.
    ///
    /// Alarms are still registered immediately, so a flush that fails or
    /// never happens leaves alarms for tasks that are not on disk. They fire
    /// until `reconcile` prunes them.
    Batched,
}

impl WriteMode {
    /// Parse a mode name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sync" => Some(Self::Sync),
            "batched" => Some(Self::Batched),
            _ => None,
        }
    }
}

/// Task store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Task file name inside the data directory.
    pub tasks_file: String,
    /// Recovery policy for an undecodable task file.
    pub on_corrupt: CorruptPolicy,
    /// Write-through or batched persistence.
    pub write_mode: WriteMode,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            tasks_file: "tasks.json".to_string(),
            on_corrupt: CorruptPolicy::Fail,
            write_mode: WriteMode::Sync,
        }
    }
}

/// Alarm table and watcher settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmSettings {
    /// Alarm table file name inside the data directory.
    pub alarms_file: String,
    /// Whether the host grants precise alarms. `false` makes every
    /// registration fail with a permission error.
    pub exact_alarms: bool,
    /// Watcher polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            alarms_file: "alarms.json".to_string(),
            exact_alarms: true,
            poll_interval_ms: 1_000,
        }
    }
}

/// Notification output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifySettings {
    /// Play the default alert sound on fire.
    pub sound: bool,
    /// Print notifications to the terminal.
    pub terminal: bool,
    /// Host notification command, e.g. `["notify-send", "{title}", "{body}"]`.
    /// Empty disables it.
    pub command: Vec<String>,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            sound: true,
            terminal: true,
            command: Vec::new(),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`..`error`), overridden by `RUST_LOG`.
    pub level: String,
    /// stderr output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_under_data_dir() {
        let settings = RemindSettings {
            data_dir: Some("/srv/remind".to_string()),
            ..RemindSettings::default()
        };
        assert_eq!(settings.tasks_path(), PathBuf::from("/srv/remind/tasks.json"));
        assert_eq!(settings.alarms_path(), PathBuf::from("/srv/remind/alarms.json"));
    }

    #[test]
    fn corrupt_policy_wire_names() {
        assert_eq!(
            serde_json::to_string(&CorruptPolicy::StartEmpty).unwrap(),
            "\"startEmpty\""
        );
        assert_eq!(CorruptPolicy::parse("START-EMPTY"), Some(CorruptPolicy::StartEmpty));
        assert_eq!(CorruptPolicy::parse("explode"), None);
    }

    #[test]
    fn write_mode_wire_names() {
        assert_eq!(serde_json::to_string(&WriteMode::Batched).unwrap(), "\"batched\"");
        assert_eq!(WriteMode::parse("Sync"), Some(WriteMode::Sync));
    }

    #[test]
    fn validate_rejects_zero_poll_interval() {
        let mut settings = RemindSettings::default();
        settings.alarms.poll_interval_ms = 0;
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidValue(_))));
    }

    #[test]
    fn validate_rejects_shared_file_names() {
        let mut settings = RemindSettings::default();
        settings.alarms.alarms_file = "tasks.json".to_string();
        assert!(settings.validate().is_err());
        assert!(RemindSettings::default().validate().is_ok());
    }

    #[test]
    fn serialization_skips_unset_data_dir() {
        let json = serde_json::to_value(RemindSettings::default()).unwrap();
        assert!(json.get("dataDir").is_none());
        assert_eq!(json["store"]["onCorrupt"], "fail");
        assert_eq!(json["alarms"]["exactAlarms"], true);
    }
}
