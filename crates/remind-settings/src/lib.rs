//! # remind-settings
//!
//! Configuration with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`RemindSettings::default()`]
//! 2. **User file**: `<data dir>/settings.json`, deep-merged over defaults
//! 3. **Environment variables**: `REMIND_*` overrides (highest priority)
//!
//! The data directory defaults to `~/.remind` and holds the task file and
//! the alarm table alongside `settings.json`.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, default_data_dir, load_settings, load_settings_from_path,
    settings_path,
};
pub use types::*;
