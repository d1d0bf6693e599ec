//! Batched persistence over another store.
//!
//! `save` only records the latest collection; [`TaskStore::flush`] writes
//! it through. A dirty store flushes on drop and logs any failure, since
//! nobody is left to receive the error.

use parking_lot::Mutex;
use remind_core::{Result, Task};
use tracing::{debug, error};

use crate::TaskStore;

/// Write-behind wrapper around a [`TaskStore`].
pub struct BatchedStore<S: TaskStore> {
    inner: S,
    pending: Mutex<Option<Vec<Task>>>,
}

impl<S: TaskStore> BatchedStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: Mutex::new(None),
        }
    }

    /// Whether a save is waiting to be flushed.
    pub fn is_dirty(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TaskStore> TaskStore for BatchedStore<S> {
    fn load(&self) -> Result<Vec<Task>> {
        if let Some(tasks) = self.pending.lock().as_ref() {
            return Ok(tasks.clone());
        }
        self.inner.load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.pending.lock() = Some(tasks.to_vec());
        debug!(count = tasks.len(), "buffered task save");
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut pending = self.pending.lock();
        if let Some(tasks) = pending.as_ref() {
            self.inner.save(tasks)?;
            *pending = None;
        }
        Ok(())
    }
}

impl<S: TaskStore> Drop for BatchedStore<S> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!(error = %e, "failed to flush buffered tasks on shutdown");
        }
    }
}
