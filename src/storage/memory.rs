//! In-memory store.

use super::backend::{ContextStore, TaskStore};
use crate::models::{ContextEntry, Task};
use crate::{Error, Result};

/// Keeps tasks and context entries in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    entries: Vec<ContextEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn get(&self, id: &str) -> Result<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Task not found: {}", id)))
    }

    fn save(&mut self, task: &Task) -> Result<()> {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => self.tasks.push(task.clone()),
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }
        Ok(())
    }
}

impl ContextStore for MemoryStore {
    fn list_context(&self) -> Result<Vec<ContextEntry>> {
        Ok(self.entries.clone())
    }

    fn get_context(&self, id: &str) -> Result<ContextEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Context entry not found: {}", id)))
    }

    fn save_context(&mut self, entry: &ContextEntry) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => self.entries.push(entry.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::at;

    #[test]
    fn test_save_replaces_by_id() {
        let mut store = MemoryStore::new();
        let mut task = Task::new("tw-0001", "First", at(2025, 7, 7, 9, 0));
        store.save(&task).unwrap();
        task.title = "Renamed".to_string();
        store.save(&task).unwrap();

        let tasks = store.list().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Renamed");
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.delete("tw-ffff"), Err(Error::NotFound(_))));
    }
}
