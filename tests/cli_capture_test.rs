//! Integration tests for `tw init` and `tw capture`.
//!
//! These tests verify that:
//! - `tw init` creates the data directory and is safe to re-run
//! - `tw capture` infers priority, category, due date and tags from text
//! - Explicit flags override inferred values
//! - Errors are reported as JSON on stderr with exit code 1

mod common;

use common::TestEnv;
use predicates::prelude::*;

const MONDAY_MORNING: &str = "2025-07-07T09:00:00Z";

// === Init Tests ===

#[test]
fn test_init_creates_storage() {
    let env = TestEnv::new();

    env.tw()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":true"));

    assert!(env.data_path().join("tasks.jsonl").exists());
    assert!(env.data_path().join("context.jsonl").exists());
}

#[test]
fn test_init_already_initialized() {
    let env = TestEnv::init();

    env.tw()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":false"));
}

#[test]
fn test_init_human_readable() {
    let env = TestEnv::new();

    env.tw()
        .args(["init", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized taskwise"));
}

#[test]
fn test_capture_requires_init() {
    let env = TestEnv::new();

    env.tw()
        .args(["capture", "call mom"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("tw init"));
}

// === Capture Tests ===

#[test]
fn test_capture_infers_attributes() {
    let env = TestEnv::init();

    let value = env.json(&[
        "capture",
        "Urgent: call client tomorrow at 2pm",
        "--now",
        MONDAY_MORNING,
    ]);
    let task = &value["task"];

    assert!(task["id"].as_str().unwrap().starts_with("tw-"));
    assert_eq!(task["title"], "Call client");
    assert_eq!(task["priority"], "urgent");
    assert_eq!(task["category"], "work");
    assert_eq!(task["due_date"], "2025-07-08T14:00:00Z");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["source"], "manual");
    assert!(
        task["tags"]
            .as_array()
            .unwrap()
            .iter()
            .any(|t| t == "call")
    );
    assert!(
        task["ai_insight"]
            .as_str()
            .unwrap()
            .starts_with("Inferred: priority urgent")
    );
    assert!(!value["reasons"].as_array().unwrap().is_empty());
}

#[test]
fn test_capture_words_are_joined() {
    let env = TestEnv::init();

    let value = env.json(&[
        "capture", "book", "dentist", "appointment", "friday", "--now", MONDAY_MORNING,
    ]);
    assert_eq!(value["task"]["category"], "health");
    assert_eq!(value["task"]["due_date"], "2025-07-11T23:59:00Z");
}

#[test]
fn test_capture_flags_override_inference() {
    let env = TestEnv::init();

    let value = env.json(&[
        "capture",
        "Urgent: call client tomorrow",
        "--title",
        "Client call",
        "--priority",
        "low",
        "--category",
        "personal",
        "--due",
        "2025-07-10",
        "--tag",
        "phone",
        "--duration",
        "45",
        "--now",
        MONDAY_MORNING,
    ]);
    let task = &value["task"];

    assert_eq!(task["title"], "Client call");
    assert_eq!(task["priority"], "low");
    assert_eq!(task["category"], "personal");
    assert_eq!(task["due_date"], "2025-07-10T00:00:00Z");
    assert_eq!(task["tags"], serde_json::json!(["phone"]));
    assert_eq!(task["estimated_duration_minutes"], 45);
}

#[test]
fn test_capture_voice_without_content_words() {
    let env = TestEnv::init();

    let value = env.json(&["capture", "urgent tomorrow", "--voice", "--now", MONDAY_MORNING]);
    assert_eq!(value["task"]["title"], "Voice task");
    assert_eq!(value["task"]["source"], "voice");
}

#[test]
fn test_capture_estimate_flag_sets_default_duration() {
    let env = TestEnv::init();

    let value = env.json(&["capture", "water the plants", "--now", MONDAY_MORNING]);
    assert!(value["task"].get("estimated_duration_minutes").is_none());

    let value = env.json(&[
        "capture",
        "water the plants",
        "--estimate",
        "--now",
        MONDAY_MORNING,
    ]);
    assert_eq!(value["task"]["estimated_duration_minutes"], 30);
}

#[test]
fn test_capture_human_readable() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "important: review the report", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Captured tw-"))
        .stdout(predicate::str::contains("[high]"));
}

#[test]
fn test_capture_persists_task() {
    let env = TestEnv::init();

    let id = env.capture("call the plumber", MONDAY_MORNING);
    let value = env.json(&["task", "show", &id]);
    assert_eq!(value["id"], id.as_str());
    assert_eq!(value["title"], "Call the plumber");
}

// === Capture Error Tests ===

#[test]
fn test_capture_unknown_priority_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "call mom", "--priority", "whenever"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unrecognized priority"));
}

#[test]
fn test_capture_blank_text_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input for text"));
}

#[test]
fn test_capture_malformed_due_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "call mom", "--due", "next tuesday-ish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input for due"));
}

#[test]
fn test_capture_zero_duration_fails() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "call mom", "--duration", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("estimated_duration_minutes"));
}

#[test]
fn test_capture_error_human_readable() {
    let env = TestEnv::init();

    env.tw()
        .args(["capture", "call mom", "--priority", "whenever", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}
