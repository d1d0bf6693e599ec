//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`RemindSettings::default()`]
//! 2. If `settings.json` exists, deep-merge user values over defaults
//! 3. Apply `REMIND_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use remind_logging::LogFormat;
use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{CorruptPolicy, RemindSettings, WriteMode};

/// The default data directory (`~/.remind`).
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".remind")
}

/// Path of `settings.json` inside `data_dir`, or inside the default
/// data directory (honouring `REMIND_DATA_DIR`) when `None`.
pub fn settings_path(data_dir: Option<&Path>) -> PathBuf {
    let dir = data_dir.map_or_else(
        || read_env_string("REMIND_DATA_DIR").map_or_else(default_data_dir, PathBuf::from),
        Path::to_path_buf,
    );
    dir.join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<RemindSettings> {
    load_settings_from_path(&settings_path(None))
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<RemindSettings> {
    let defaults = serde_json::to_value(RemindSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: RemindSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `REMIND_*` environment variable overrides.
///
/// Invalid values are ignored with a warning (falling back to file/default).
pub fn apply_env_overrides(settings: &mut RemindSettings) {
    if let Some(v) = read_env_string("REMIND_DATA_DIR") {
        settings.data_dir = Some(v);
    }

    // ── Store ───────────────────────────────────────────────────────
    if let Some(v) = read_env_parsed("REMIND_ON_CORRUPT", CorruptPolicy::parse) {
        settings.store.on_corrupt = v;
    }
    if let Some(v) = read_env_parsed("REMIND_WRITE_MODE", WriteMode::parse) {
        settings.store.write_mode = v;
    }

    // ── Alarms ──────────────────────────────────────────────────────
    if let Some(v) = read_env_parsed("REMIND_EXACT_ALARMS", parse_bool) {
        settings.alarms.exact_alarms = v;
    }
    if let Some(v) = read_env_parsed("REMIND_POLL_INTERVAL_MS", |s| parse_u64_range(s, 50, 3_600_000)) {
        settings.alarms.poll_interval_ms = v;
    }

    // ── Notify ──────────────────────────────────────────────────────
    if let Some(v) = read_env_parsed("REMIND_SOUND", parse_bool) {
        settings.notify.sound = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("REMIND_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_parsed("REMIND_LOG_FORMAT", LogFormat::parse) {
        settings.logging.format = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_parsed<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let val = read_env_string(name)?;
    let result = parse(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid env var, ignoring");
    }
    result
}
