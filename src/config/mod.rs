//! Configuration for Taskwise.
//!
//! ## config.kdl - User preferences
//!
//! Located at:
//! - System: `~/.config/taskwise/config.kdl` (`TW_CONFIG_DIR/taskwise/config.kdl` if set)
//! - Session: `<data-dir>/config.kdl`
//!
//! Contains engine tunables: default priority, context keyword limit,
//! analytics throughput baseline, duration estimation and the category table.
//!
//! ## Precedence
//!
//! CLI flag > session config > system config > defaults.
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config, resolve_layers,
};
pub use schema::{CONFIG_KEYS, TaskwiseConfig};

use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name, in both locations.
pub const CONFIG_FILE: &str = "config.kdl";

/// Path of the system config file, if a config directory can be determined.
pub fn system_config_path() -> Option<PathBuf> {
    let base = match std::env::var("TW_CONFIG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()?,
    };
    Some(base.join("taskwise").join(CONFIG_FILE))
}

/// Path of the session (data-directory) config file.
pub fn session_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read and validate a config file. A missing file is an empty config.
pub fn read_config(path: &Path) -> Result<TaskwiseConfig> {
    if !path.exists() {
        return Ok(TaskwiseConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    let config = TaskwiseConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Write a config file, creating its directory if needed.
pub fn write_config(path: &Path, config: &TaskwiseConfig) -> Result<()> {
    config.validate().map_err(Error::Config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_kdl_string())?;
    tracing::info!(path = %path.display(), "wrote config");
    Ok(())
}
