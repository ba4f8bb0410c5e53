//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The `TaskwiseConfig` struct mirroring the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and string-based setters for `tw config set`

use crate::engine::vocab::CategoryTable;
use crate::models::Priority;
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Keys accepted by `tw config set`, besides `category.<name>`.
pub const CONFIG_KEYS: &[&str] = &[
    "default-priority",
    "keyword-limit",
    "throughput-baseline",
    "estimate-duration",
    "default-duration",
    "strict-categories",
];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// default-priority "medium"
/// keyword-limit 8
/// throughput-baseline 10.0
/// estimate-duration #false
/// default-duration 30
/// strict-categories #false
/// categories {
///     work "meeting" "call" "report"
///     garden "plants" "seeds"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskwiseConfig {
    /// Priority for tasks with no explicit or inferred priority
    pub default_priority: Option<Priority>,

    /// Number of keywords kept per context entry
    pub keyword_limit: Option<usize>,

    /// Completions per window that count as full throughput
    pub throughput_baseline: Option<f64>,

    /// Emit a default estimate when no duration keyword matched
    pub estimate_duration: Option<bool>,

    /// The default estimate, in minutes
    pub default_duration: Option<u32>,

    /// Reject categories outside the category table
    pub strict_categories: Option<bool>,

    /// Categories added to or replacing the built-in table
    pub categories: Option<CategoryTable>,
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn ignored(key: &str, value: &KdlValue) {
    tracing::warn!(key, value = %value, "ignoring invalid config value");
}

impl TaskwiseConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.keyword_limit == Some(0) {
            return Err("keyword-limit must be at least 1".to_string());
        }
        if let Some(baseline) = self.throughput_baseline {
            if !baseline.is_finite() || baseline <= 0.0 {
                return Err(format!(
                    "throughput-baseline must be a positive number, got {}",
                    baseline
                ));
            }
        }
        if self.default_duration == Some(0) {
            return Err("default-duration must be a positive number of minutes".to_string());
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Values of the wrong type are skipped with a warning.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(value) = first_value(doc, "default-priority") {
            match value.as_string().and_then(|s| s.parse::<Priority>().ok()) {
                Some(priority) => config.default_priority = Some(priority),
                None => ignored("default-priority", value),
            }
        }

        if let Some(value) = first_value(doc, "keyword-limit") {
            match value.as_integer().and_then(|i| usize::try_from(i).ok()) {
                Some(limit) => config.keyword_limit = Some(limit),
                None => ignored("keyword-limit", value),
            }
        }

        if let Some(value) = first_value(doc, "throughput-baseline") {
            match value.as_float().or_else(|| value.as_integer().map(|i| i as f64)) {
                Some(baseline) => config.throughput_baseline = Some(baseline),
                None => ignored("throughput-baseline", value),
            }
        }

        if let Some(value) = first_value(doc, "estimate-duration") {
            match value.as_bool() {
                Some(b) => config.estimate_duration = Some(b),
                None => ignored("estimate-duration", value),
            }
        }

        if let Some(value) = first_value(doc, "default-duration") {
            match value.as_integer().and_then(|i| u32::try_from(i).ok()) {
                Some(minutes) => config.default_duration = Some(minutes),
                None => ignored("default-duration", value),
            }
        }

        if let Some(value) = first_value(doc, "strict-categories") {
            match value.as_bool() {
                Some(b) => config.strict_categories = Some(b),
                None => ignored("strict-categories", value),
            }
        }

        if let Some(children) = doc.get("categories").and_then(|node| node.children()) {
            let mut table = CategoryTable::empty();
            for child in children.nodes() {
                let keywords = child
                    .entries()
                    .iter()
                    .filter(|entry| entry.name().is_none())
                    .filter_map(|entry| entry.value().as_string())
                    .map(str::to_string)
                    .collect();
                table.set(child.name().value(), keywords);
            }
            config.categories = Some(table);
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(priority) = self.default_priority {
            let mut node = KdlNode::new("default-priority");
            node.push(KdlEntry::new(KdlValue::String(priority.as_str().to_string())));
            doc.nodes_mut().push(node);
        }

        if let Some(limit) = self.keyword_limit {
            let mut node = KdlNode::new("keyword-limit");
            node.push(KdlEntry::new(KdlValue::Integer(limit as i128)));
            doc.nodes_mut().push(node);
        }

        if let Some(baseline) = self.throughput_baseline {
            let mut node = KdlNode::new("throughput-baseline");
            node.push(KdlEntry::new(KdlValue::Float(baseline)));
            doc.nodes_mut().push(node);
        }

        if let Some(estimate) = self.estimate_duration {
            let mut node = KdlNode::new("estimate-duration");
            node.push(KdlEntry::new(KdlValue::Bool(estimate)));
            doc.nodes_mut().push(node);
        }

        if let Some(minutes) = self.default_duration {
            let mut node = KdlNode::new("default-duration");
            node.push(KdlEntry::new(KdlValue::Integer(i128::from(minutes))));
            doc.nodes_mut().push(node);
        }

        if let Some(strict) = self.strict_categories {
            let mut node = KdlNode::new("strict-categories");
            node.push(KdlEntry::new(KdlValue::Bool(strict)));
            doc.nodes_mut().push(node);
        }

        if let Some(ref table) = self.categories {
            let mut children = KdlDocument::new();
            for (name, keywords) in table.entries() {
                let mut child = KdlNode::new(name.as_str());
                for keyword in keywords {
                    child.push(KdlEntry::new(KdlValue::String(keyword.clone())));
                }
                children.nodes_mut().push(child);
            }
            let mut node = KdlNode::new("categories");
            *node.children_mut() = Some(children);
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Render as formatted KDL text, ready to write to disk.
    pub fn to_kdl_string(&self) -> String {
        let mut doc = self.to_kdl();
        doc.autoformat();
        doc.to_string()
    }

    /// Set a single key from its string form (as given to `tw config set`).
    ///
    /// `category.<name>` takes a comma-separated keyword list.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        let bad = |expected: &str| format!("{} expects {}, got {:?}", key, expected, value);

        if let Some(name) = key.strip_prefix("category.") {
            if name.trim().is_empty() {
                return Err("category name must not be empty".to_string());
            }
            let keywords = value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            self.categories
                .get_or_insert_with(CategoryTable::empty)
                .set(name.trim(), keywords);
            return Ok(());
        }

        match key {
            "default-priority" => {
                let priority = value.parse::<Priority>().map_err(|_| bad("a priority"))?;
                self.default_priority = Some(priority);
            }
            "keyword-limit" => {
                self.keyword_limit = Some(value.parse::<usize>().map_err(|_| bad("an integer"))?);
            }
            "throughput-baseline" => {
                let baseline = value.parse::<f64>().map_err(|_| bad("a number"))?;
                self.throughput_baseline = Some(baseline);
            }
            "estimate-duration" => {
                let estimate = parse_bool(value).ok_or_else(|| bad("true or false"))?;
                self.estimate_duration = Some(estimate);
            }
            "default-duration" => {
                self.default_duration = Some(value.parse::<u32>().map_err(|_| bad("minutes"))?);
            }
            "strict-categories" => {
                let strict = parse_bool(value).ok_or_else(|| bad("true or false"))?;
                self.strict_categories = Some(strict);
            }
            _ => {
                return Err(format!(
                    "unknown config key {:?} (expected one of {} or category.<name>)",
                    key,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().trim_start_matches('#') {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_kdl_empty() {
        let doc = KdlDocument::new();
        assert_eq!(TaskwiseConfig::from_kdl(&doc), TaskwiseConfig::default());
    }

    #[test]
    fn test_config_from_kdl_full() {
        let kdl = r#"
            default-priority "high"
            keyword-limit 5
            throughput-baseline 12.5
            estimate-duration #true
            default-duration 45
            strict-categories #true
            categories {
                garden "plants" "Seeds"
            }
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        let config = TaskwiseConfig::from_kdl(&doc);

        assert_eq!(config.default_priority, Some(Priority::High));
        assert_eq!(config.keyword_limit, Some(5));
        assert_eq!(config.throughput_baseline, Some(12.5));
        assert_eq!(config.estimate_duration, Some(true));
        assert_eq!(config.default_duration, Some(45));
        assert_eq!(config.strict_categories, Some(true));
        let table = config.categories.unwrap();
        assert_eq!(table.category_for("seeds"), Some("garden"));
    }

    #[test]
    fn test_integer_baseline_accepted() {
        let doc: KdlDocument = "throughput-baseline 20".parse().unwrap();
        let config = TaskwiseConfig::from_kdl(&doc);
        assert_eq!(config.throughput_baseline, Some(20.0));
    }

    #[test]
    fn test_wrong_types_are_skipped() {
        let kdl = r#"
            default-priority "critical"
            keyword-limit "many"
            estimate-duration 3
        "#;
        let doc: KdlDocument = kdl.parse().unwrap();
        assert_eq!(TaskwiseConfig::from_kdl(&doc), TaskwiseConfig::default());
    }

    #[test]
    fn test_config_to_kdl_roundtrip() {
        let mut categories = CategoryTable::empty();
        categories.set("errands", vec!["pharmacy".to_string(), "bank".to_string()]);
        let config = TaskwiseConfig {
            default_priority: Some(Priority::Low),
            keyword_limit: Some(3),
            throughput_baseline: Some(7.5),
            estimate_duration: Some(true),
            default_duration: Some(20),
            strict_categories: Some(false),
            categories: Some(categories),
        };

        let text = config.to_kdl_string();
        let parsed = TaskwiseConfig::from_kdl(&text.parse().unwrap());
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_validate() {
        assert!(TaskwiseConfig::default().validate().is_ok());

        let config = TaskwiseConfig {
            throughput_baseline: Some(0.0),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("throughput-baseline"));

        let config = TaskwiseConfig {
            keyword_limit: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_keys() {
        let mut config = TaskwiseConfig::new();
        config.set("default-priority", "urgent").unwrap();
        config.set("estimate-duration", "true").unwrap();
        config.set("throughput-baseline", "4").unwrap();
        config.set("category.garden", "plants, seeds").unwrap();

        assert_eq!(config.default_priority, Some(Priority::Urgent));
        assert_eq!(config.estimate_duration, Some(true));
        assert_eq!(config.throughput_baseline, Some(4.0));
        assert_eq!(
            config.categories.unwrap().category_for("seeds"),
            Some("garden")
        );
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = TaskwiseConfig::new();
        assert!(config.set("default-priority", "critical").is_err());
        assert!(config.set("keyword-limit", "0").is_err());
        assert!(config.set("editor", "vim").unwrap_err().contains("unknown config key"));
    }
}
