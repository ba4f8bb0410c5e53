//! Common test utilities for taskwise integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/taskwise/` or `~/.config/taskwise/` directories.

#![allow(dead_code)]

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated data and config storage.
///
/// Each `TestEnv` creates two temporary directories:
/// - `data_dir`: Holds tasks.jsonl, context.jsonl and the session config (via `TW_DATA_DIR`)
/// - `config_dir`: Stands in for the system config directory (via `TW_CONFIG_DIR`)
///
/// The `tw()` method returns a `Command` with both variables set per
/// invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and run `tw init`.
    pub fn init() -> Self {
        let env = Self::new();
        env.tw().arg("init").assert().success();
        env
    }

    /// Get a Command for the tw binary with isolated directories.
    pub fn tw(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tw"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("TW_DATA_DIR", self.data_dir.path());
        cmd.env("TW_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("TW_LOG");
        cmd
    }

    /// Run a command expected to succeed and parse its JSON stdout.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.tw().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "tw {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Capture text at a fixed reference time and return the task id.
    pub fn capture(&self, text: &str, now: &str) -> String {
        let value = self.json(&["capture", text, "--now", now]);
        value["task"]["id"].as_str().unwrap().to_string()
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Get the path to the system config directory.
    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
