//! Integration tests for configuration via CLI.
//!
//! These tests verify that:
//! - `tw config show` reports every value with its source
//! - `tw config set` writes the data-directory config.kdl
//! - Session config beats system config, CLI flags beat both
//! - Config values change engine behavior (default priority, categories)

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

fn write_system_config(env: &TestEnv, content: &str) {
    let dir = env.config_path().join("taskwise");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.kdl"), content).unwrap();
}

#[test]
fn test_config_show_defaults() {
    let env = TestEnv::init();

    let value = env.json(&["config", "show"]);
    let config = &value["config"];
    assert_eq!(config["default_priority"]["value"], "medium");
    assert_eq!(config["default_priority"]["source"], "default");
    assert_eq!(config["keyword_limit"]["value"], 8);
    assert_eq!(config["throughput_baseline"]["value"], 10.0);
    assert_eq!(config["estimate_duration"]["value"], false);
    assert_eq!(config["strict_categories"]["value"], false);
    assert!(
        value["session_path"]
            .as_str()
            .unwrap()
            .ends_with("config.kdl")
    );
}

#[test]
fn test_config_set_writes_session_file() {
    let env = TestEnv::init();

    let value = env.json(&["config", "set", "default-priority", "high"]);
    assert_eq!(value["key"], "default-priority");

    let content = fs::read_to_string(env.data_path().join("config.kdl")).unwrap();
    assert!(content.contains("default-priority"));
    assert!(content.contains("high"));

    let value = env.json(&["config", "show"]);
    assert_eq!(value["config"]["default_priority"]["value"], "high");
    assert_eq!(value["config"]["default_priority"]["source"], "session");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_set_invalid_value_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["config", "set", "keyword-limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("keyword-limit must be at least 1"));

    env.tw()
        .args(["config", "set", "default-priority", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default-priority expects a priority"));
}

#[test]
fn test_system_config_is_layered_under_session() {
    let env = TestEnv::init();
    write_system_config(&env, "keyword-limit 3\nthroughput-baseline 5.0\n");
    env.json(&["config", "set", "throughput-baseline", "20"]);

    let value = env.json(&["config", "show"]);
    let config = &value["config"];
    assert_eq!(config["keyword_limit"]["value"], 3);
    assert_eq!(config["keyword_limit"]["source"], "system");
    assert_eq!(config["throughput_baseline"]["value"], 20.0);
    assert_eq!(config["throughput_baseline"]["source"], "session");
}

#[test]
fn test_malformed_system_config_is_reported() {
    let env = TestEnv::init();
    write_system_config(&env, "keyword-limit {{{");

    env.tw()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_default_priority_applies_to_capture() {
    let env = TestEnv::init();
    env.json(&["config", "set", "default-priority", "low"]);

    let value = env.json(&["capture", "water the plants"]);
    assert_eq!(value["task"]["priority"], "low");

    let value = env.json(&["capture", "urgent: water the plants"]);
    assert_eq!(value["task"]["priority"], "urgent");
}

#[test]
fn test_custom_category_applies_to_capture() {
    let env = TestEnv::init();
    env.json(&["config", "set", "category.garden", "plants, weeding"]);

    let value = env.json(&["capture", "water the plants"]);
    assert_eq!(value["task"]["category"], "garden");

    env.tw()
        .args(["config", "show", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("garden: plants, weeding"));
}

#[test]
fn test_strict_categories_reject_unknown_label() {
    let env = TestEnv::init();
    env.json(&["config", "set", "strict-categories", "true"]);

    env.tw()
        .args(["capture", "water the plants", "--category", "garden"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized category"));

    let value = env.json(&["capture", "water the plants", "--category", "personal"]);
    assert_eq!(value["task"]["category"], "personal");
}

#[test]
fn test_estimate_duration_from_config() {
    let env = TestEnv::init();
    env.json(&["config", "set", "estimate-duration", "true"]);
    env.json(&["config", "set", "default-duration", "20"]);

    let value = env.json(&["capture", "water the plants"]);
    assert_eq!(value["task"]["estimated_duration_minutes"], 20);
}
