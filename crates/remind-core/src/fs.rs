//! Whole-file replacement helpers.

use std::io::Write as _;
use std::path::Path;

use tracing::debug;

use crate::errors::{ReminderError, Result};

/// Atomically replace `path` with `bytes`.
///
/// Writes a uniquely named hidden temp file next to the target, fsyncs it,
/// then renames it over the target. The parent directory is created if
/// missing. A crash leaves either the old file or the new one, never a torn
/// write, and concurrent writers each publish a complete file of their own.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ReminderError::io(dir, e))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| ReminderError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| ReminderError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| ReminderError::io(tmp.path(), e))?;

    // A failed persist drops the temp file with the error.
    let _ = tmp.persist(path).map_err(|e| ReminderError::io(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "replaced file");
    Ok(())
}
