//! Store traits consumed by the commands layer.
//!
//! The engine never performs I/O; callers load snapshots through these
//! traits, hand them to the engine and persist whatever comes back.
//! - `JsonlStore` - append-only JSONL files in the data directory (default)
//! - `MemoryStore` - in-process maps, for embedding and tests

use crate::Result;
use crate::models::{ContextEntry, Task};

/// Persistence for tasks.
pub trait TaskStore {
    /// All tasks, in first-seen order.
    fn list(&self) -> Result<Vec<Task>>;

    /// A single task; `Error::NotFound` if absent.
    fn get(&self, id: &str) -> Result<Task>;

    /// Insert or replace a task by id.
    fn save(&mut self, task: &Task) -> Result<()>;

    /// Remove a task; `Error::NotFound` if absent.
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Persistence for context entries.
pub trait ContextStore {
    fn list_context(&self) -> Result<Vec<ContextEntry>>;

    fn get_context(&self, id: &str) -> Result<ContextEntry>;

    /// Insert or replace an entry by id.
    fn save_context(&mut self, entry: &ContextEntry) -> Result<()>;
}
