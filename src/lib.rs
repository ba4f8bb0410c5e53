//! Taskwise - task intelligence for a smart to-do list.
//!
//! This library turns captured text (typed or voice-transcribed) into
//! structured tasks, ranks tasks for "what to work on now" views, and
//! summarizes completion behavior into productivity snapshots. It also
//! provides the storage and configuration layers used by the `tw` CLI.
//!
//! The [`engine`] module is pure: every operation takes explicit inputs
//! (including the reference time) and returns a fresh value.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod models;
pub mod storage;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    use crate::storage::JsonlStore;

    /// Build a UTC timestamp from calendar parts.
    pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// Test environment with an isolated data directory.
    pub struct TestEnv {
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                data_dir: TempDir::new().unwrap(),
            }
        }

        /// Initialize a JSONL store inside the temp directory.
        pub fn init_store(&self) -> JsonlStore {
            JsonlStore::init(self.data_dir.path()).unwrap()
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Library-level error type for Taskwise operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raw input was empty or malformed.
    #[error("Invalid input for {field}: {value:?}")]
    InvalidInput { field: String, value: String },

    /// A required task field was missing or out of range.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// A closed-set value (priority, status, source, category) was not recognized.
    #[error("Unrecognized {field} value: {value:?}")]
    UnrecognizedEnumValue { field: String, value: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run `tw init` first")]
    NotInitialized,

    #[error("{0}")]
    NotFound(String),
}

impl Error {
    pub(crate) fn invalid_input(field: &str, value: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unrecognized(field: &str, value: impl Into<String>) -> Self {
        Error::UnrecognizedEnumValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Result type alias for Taskwise operations.
pub type Result<T> = std::result::Result<T, Error>;
