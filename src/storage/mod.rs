//! Storage layer for Taskwise data.
//!
//! This module handles persistence of tasks and context entries.
//!
//! ## Layout
//!
//! Data lives under `~/.local/share/taskwise/` (or `TW_DATA_DIR`):
//! - `tasks.jsonl` - one task per line, append-only; the last line for an id wins
//! - `context.jsonl` - one context entry per line, same rule
//! - `config.kdl` - data-directory configuration (see `config`)
//!
//! Deleting a task rewrites `tasks.jsonl` without it.

pub mod backend;
pub mod memory;

pub use backend::{ContextStore, TaskStore};
pub use memory::MemoryStore;

use crate::models::{ContextEntry, Task};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const TASKS_FILE: &str = "tasks.jsonl";
const CONTEXT_FILE: &str = "context.jsonl";

/// Task id prefix.
pub const TASK_PREFIX: &str = "tw";
/// Context entry id prefix.
pub const CONTEXT_PREFIX: &str = "twc";

/// JSONL file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    /// Root directory holding the JSONL files
    pub root: PathBuf,
}

impl JsonlStore {
    /// Open an initialized store.
    pub fn open(root: &Path) -> Result<Self> {
        if !Self::exists(root) {
            return Err(Error::NotInitialized);
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Create the data directory and empty JSONL files. Idempotent.
    pub fn init(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        for file in [TASKS_FILE, CONTEXT_FILE] {
            let path = root.join(file);
            if !path.exists() {
                File::create(&path)?;
            }
        }
        tracing::info!(root = %root.display(), "initialized store");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Check if a store exists at `root`.
    pub fn exists(root: &Path) -> bool {
        root.join(TASKS_FILE).exists()
    }

    fn read_all<T, F>(&self, file: &str, id_of: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> &str,
    {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&path)?);

        let mut records: Vec<T> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: T = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        file,
                        line = number + 1,
                        error = %e,
                        "skipping unreadable record"
                    );
                    continue;
                }
            };
            match index.get(id_of(&record)) {
                Some(&i) => records[i] = record,
                None => {
                    index.insert(id_of(&record).to_string(), records.len());
                    records.push(record);
                }
            }
        }
        Ok(records)
    }

    fn append<T: Serialize>(&self, file: &str, record: &T) -> Result<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(file))?;
        let json = serde_json::to_string(record)?;
        writeln!(handle, "{}", json)?;
        Ok(())
    }

    fn rewrite<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        let path = self.root.join(file);
        let tmp = self.root.join(format!("{}.tmp", file));
        {
            let mut handle = File::create(&tmp)?;
            for record in records {
                writeln!(handle, "{}", serde_json::to_string(record)?)?;
            }
            handle.flush()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl TaskStore for JsonlStore {
    fn list(&self) -> Result<Vec<Task>> {
        self.read_all(TASKS_FILE, |t: &Task| t.id.as_str())
    }

    fn get(&self, id: &str) -> Result<Task> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Task not found: {}", id)))
    }

    fn save(&mut self, task: &Task) -> Result<()> {
        self.append(TASKS_FILE, task)?;
        tracing::info!(id = %task.id, status = %task.status, "saved task");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let tasks = self.list()?;
        if !tasks.iter().any(|t| t.id == id) {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }
        let kept: Vec<Task> = tasks.into_iter().filter(|t| t.id != id).collect();
        self.rewrite(TASKS_FILE, &kept)?;
        tracing::info!(id, "deleted task");
        Ok(())
    }
}

impl ContextStore for JsonlStore {
    fn list_context(&self) -> Result<Vec<ContextEntry>> {
        self.read_all(CONTEXT_FILE, |e: &ContextEntry| e.id.as_str())
    }

    fn get_context(&self, id: &str) -> Result<ContextEntry> {
        self.list_context()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::NotFound(format!("Context entry not found: {}", id)))
    }

    fn save_context(&mut self, entry: &ContextEntry) -> Result<()> {
        self.append(CONTEXT_FILE, entry)?;
        tracing::info!(id = %entry.id, source = %entry.source_type, "saved context entry");
        Ok(())
    }
}

/// Get the data directory.
///
/// `TW_DATA_DIR` wins; otherwise `~/.local/share/taskwise/` (platform
/// equivalent via `dirs`).
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TW_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::data_dir()
        .map(|d| d.join("taskwise"))
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
}

/// Generate an id for a task or context entry.
///
/// Format: `<prefix>-<4 hex chars>`
/// - Task prefix: "tw"
/// - Context prefix: "twc"
pub fn generate_id(prefix: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(
        chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = hasher.finalize();
    let hash_hex = format!("{:x}", hash);
    format!("{}-{}", prefix, &hash_hex[..4])
}

/// Generate an id not already taken according to `taken`.
pub fn generate_unique_id<F>(prefix: &str, seed: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut attempt = 0u32;
    loop {
        let id = generate_id(prefix, &format!("{}#{}", seed, attempt));
        if !taken(&id) {
            return id;
        }
        attempt += 1;
    }
}
