//! # remind-store
//!
//! Persistence of the full task collection as one blob.
//!
//! - [`TaskStore`]: the load/save contract the controller depends on
//! - [`JsonFileStore`]: versioned JSON file, replaced atomically on save
//! - [`MemoryStore`]: in-memory fake that records saves
//! - [`BatchedStore`]: buffers saves until [`TaskStore::flush`]
//!
//! There is no indexing and no partial read: every load returns the whole
//! collection and every save rewrites it.

#![deny(unsafe_code)]

pub mod batched;
pub mod file;
pub mod memory;

pub use batched::BatchedStore;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use remind_core::{Result, Task};

/// Whole-collection task persistence.
pub trait TaskStore: Send + Sync {
    /// Load the full collection. Empty when nothing has been saved yet.
    fn load(&self) -> Result<Vec<Task>>;

    /// Replace the persisted collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;

    /// Write any buffered state through. No-op for write-through stores.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn load(&self) -> Result<Vec<Task>> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        (**self).save(tasks)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
