//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Session config.kdl (`<data-dir>/config.kdl`)
//! 3. System config.kdl (`~/.config/taskwise/config.kdl`)
//! 4. Built-in defaults
//!
//! Category tables are the exception: they are layered rather than
//! replaced, so system and session entries extend the built-in table.

use crate::config::schema::TaskwiseConfig;
use crate::config::{read_config, session_config_path, system_config_path};
use crate::engine::analytics::{AggregateOptions, thresholds};
use crate::engine::context::InterpreterConfig;
use crate::engine::extract::ExtractorConfig;
use crate::engine::vocab::{self, CategoryTable};
use crate::models::{Priority, TaskDefaults};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Value from CLI flag
    #[serde(rename = "cli")]
    CliFlag,
    /// Value from the data-directory config
    Session,
    /// Value from the system config
    System,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Session => write!(f, "session"),
            ValueSource::System => write!(f, "system"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// First set value in precedence order, falling back to `default`.
fn pick<T: Clone>(
    cli: Option<T>,
    session: Option<T>,
    system: Option<T>,
    default: T,
) -> Resolved<T> {
    if let Some(value) = cli {
        Resolved::new(value, ValueSource::CliFlag)
    } else if let Some(value) = session {
        Resolved::new(value, ValueSource::Session)
    } else if let Some(value) = system {
        Resolved::new(value, ValueSource::System)
    } else {
        Resolved::new(default, ValueSource::Default)
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub default_priority: Resolved<Priority>,
    pub keyword_limit: Resolved<usize>,
    pub throughput_baseline: Resolved<f64>,
    pub estimate_duration: Resolved<bool>,
    pub default_duration: Resolved<u32>,
    pub strict_categories: Resolved<bool>,
    /// Built-in table with system and session entries layered on top
    pub categories: Resolved<CategoryTable>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_priority: Resolved::new(Priority::Medium, ValueSource::Default),
            keyword_limit: Resolved::new(
                crate::engine::context::thresholds::DEFAULT_KEYWORD_LIMIT,
                ValueSource::Default,
            ),
            throughput_baseline: Resolved::new(
                thresholds::DEFAULT_THROUGHPUT_BASELINE,
                ValueSource::Default,
            ),
            estimate_duration: Resolved::new(false, ValueSource::Default),
            default_duration: Resolved::new(vocab::DEFAULT_DURATION_MINUTES, ValueSource::Default),
            strict_categories: Resolved::new(false, ValueSource::Default),
            categories: Resolved::new(CategoryTable::default(), ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Settings for the rule-based extractor.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            categories: self.categories.value.clone(),
            default_duration: self
                .estimate_duration
                .value
                .then_some(self.default_duration.value),
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            keyword_limit: self.keyword_limit.value,
        }
    }

    /// Defaults for the task assembler.
    pub fn task_defaults(&self) -> TaskDefaults {
        TaskDefaults {
            priority: self.default_priority.value,
            allowed_categories: self
                .strict_categories
                .value
                .then(|| self.categories.value.names().into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            throughput_baseline: self.throughput_baseline.value,
            known_categories: self.categories.value.names(),
        }
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub throughput_baseline: Option<f64>,
    pub estimate_duration: Option<bool>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_throughput_baseline(mut self, baseline: f64) -> Self {
        self.throughput_baseline = Some(baseline);
        self
    }

    pub fn with_estimate_duration(mut self, estimate: bool) -> Self {
        self.estimate_duration = Some(estimate);
        self
    }

    fn validate(&self) -> Result<()> {
        let as_config = TaskwiseConfig {
            throughput_baseline: self.throughput_baseline,
            ..Default::default()
        };
        as_config.validate().map_err(Error::Config)
    }
}

/// Resolve configuration for the data directory `data_dir`.
///
/// Precedence (highest to lowest):
/// 1. CLI flags (from `overrides`)
/// 2. Session config.kdl
/// 3. System config.kdl
/// 4. Built-in defaults
pub fn resolve_config(data_dir: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let system = match system_config_path() {
        Some(path) => read_config(&path)?,
        None => TaskwiseConfig::default(),
    };
    let session = read_config(&session_config_path(data_dir))?;
    resolve_layers(&system, &session, overrides)
}

/// Resolve from already-loaded config layers.
pub fn resolve_layers(
    system: &TaskwiseConfig,
    session: &TaskwiseConfig,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    overrides.validate()?;
    let defaults = ResolvedConfig::default();

    let mut categories = defaults.categories.clone();
    if let Some(ref table) = system.categories {
        categories.value.merge(table);
        categories.source = ValueSource::System;
    }
    if let Some(ref table) = session.categories {
        categories.value.merge(table);
        categories.source = ValueSource::Session;
    }

    Ok(ResolvedConfig {
        default_priority: pick(
            None,
            session.default_priority,
            system.default_priority,
            defaults.default_priority.value,
        ),
        keyword_limit: pick(
            None,
            session.keyword_limit,
            system.keyword_limit,
            defaults.keyword_limit.value,
        ),
        throughput_baseline: pick(
            overrides.throughput_baseline,
            session.throughput_baseline,
            system.throughput_baseline,
            defaults.throughput_baseline.value,
        ),
        estimate_duration: pick(
            overrides.estimate_duration,
            session.estimate_duration,
            system.estimate_duration,
            defaults.estimate_duration.value,
        ),
        default_duration: pick(
            None,
            session.default_duration,
            system.default_duration,
            defaults.default_duration.value,
        ),
        strict_categories: pick(
            None,
            session.strict_categories,
            system.strict_categories,
            defaults.strict_categories.value,
        ),
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::write_config;
    use crate::test_utils::TestEnv;

    // ==================== ValueSource Tests ====================

    #[test]
    fn test_value_source_display() {
        assert_eq!(format!("{}", ValueSource::Session), "session");
        assert_eq!(format!("{}", ValueSource::System), "system");
        assert_eq!(format!("{}", ValueSource::CliFlag), "cli");
        assert_eq!(format!("{}", ValueSource::Default), "default");
        assert_eq!(serde_json::to_value(ValueSource::CliFlag).unwrap(), "cli");
    }

    // ==================== Config Resolution Tests ====================

    #[test]
    fn test_resolve_defaults() {
        let config = resolve_layers(
            &TaskwiseConfig::default(),
            &TaskwiseConfig::default(),
            &ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(config, ResolvedConfig::default());
        assert_eq!(config.default_priority.source, ValueSource::Default);
        assert_eq!(config.extractor_config().default_duration, None);
        assert!(config.task_defaults().allowed_categories.is_none());
    }

    #[test]
    fn test_session_overrides_system() {
        let system = TaskwiseConfig {
            default_priority: Some(Priority::Low),
            keyword_limit: Some(3),
            ..Default::default()
        };
        let session = TaskwiseConfig {
            default_priority: Some(Priority::High),
            ..Default::default()
        };
        let config = resolve_layers(&system, &session, &ConfigOverrides::default()).unwrap();

        assert_eq!(config.default_priority.value, Priority::High);
        assert_eq!(config.default_priority.source, ValueSource::Session);
        assert_eq!(config.keyword_limit.value, 3);
        assert_eq!(config.keyword_limit.source, ValueSource::System);
    }

    #[test]
    fn test_cli_overrides_session() {
        let session = TaskwiseConfig {
            throughput_baseline: Some(5.0),
            estimate_duration: Some(false),
            ..Default::default()
        };
        let overrides = ConfigOverrides::new()
            .with_throughput_baseline(20.0)
            .with_estimate_duration(true);
        let config =
            resolve_layers(&TaskwiseConfig::default(), &session, &overrides).unwrap();

        assert_eq!(config.throughput_baseline.value, 20.0);
        assert_eq!(config.throughput_baseline.source, ValueSource::CliFlag);
        assert_eq!(config.estimate_duration.source, ValueSource::CliFlag);
        assert_eq!(config.extractor_config().default_duration, Some(30));
        assert_eq!(config.task_defaults().priority, Priority::Medium);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = ConfigOverrides::new().with_throughput_baseline(0.0);
        let err = resolve_layers(
            &TaskwiseConfig::default(),
            &TaskwiseConfig::default(),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_categories_are_layered() {
        let mut system_table = CategoryTable::empty();
        system_table.set("garden", vec!["plants".to_string()]);
        let mut session_table = CategoryTable::empty();
        session_table.set("work", vec!["standup".to_string()]);

        let system = TaskwiseConfig {
            categories: Some(system_table),
            ..Default::default()
        };
        let session = TaskwiseConfig {
            categories: Some(session_table),
            strict_categories: Some(true),
            ..Default::default()
        };
        let config = resolve_layers(&system, &session, &ConfigOverrides::default()).unwrap();

        let table = &config.categories.value;
        assert_eq!(config.categories.source, ValueSource::Session);
        assert_eq!(table.category_for("plants"), Some("garden"));
        assert_eq!(table.category_for("standup"), Some("work"));
        assert_eq!(table.category_for("doctor"), Some("health"));

        let allowed = config.task_defaults().allowed_categories.unwrap();
        assert!(allowed.contains("garden"));
        assert!(allowed.contains("learning"));
        assert_eq!(config.aggregate_options().known_categories.len(), 5);
    }

    #[test]
    fn test_resolve_config_reads_session_file() {
        let env = TestEnv::new();
        let session = TaskwiseConfig {
            keyword_limit: Some(2),
            ..Default::default()
        };
        write_config(&session_config_path(env.data_dir.path()), &session).unwrap();

        let config = resolve_config(env.data_dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.keyword_limit.value, 2);
        assert_eq!(config.keyword_limit.source, ValueSource::Session);
        assert_eq!(config.interpreter_config().keyword_limit, 2);
    }
}
