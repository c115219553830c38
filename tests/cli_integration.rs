//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. Network commands point at a
//! closed local port so the team directory is always unreachable.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Nothing listens here.
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Get the binary to test, isolated from the user's config.
fn cform(home: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("compliance-form").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("XDG_DATA_HOME", home.path().join(".local/share"))
        .env("COMPLIANCE_API_URL", UNREACHABLE);
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fill in the compliance questionnaire"))
        .stdout(predicate::str::contains("submit"));
}

#[test]
fn test_version_flag() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_alias_binary() {
    Command::cargo_bin("cform")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"));
}

// ============================================================================
// Questions Command Tests
// ============================================================================

#[test]
fn test_questions_lists_builtin_set() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. Control Name (single line)"))
        .stdout(predicate::str::contains("15. Dependencies"))
        .stdout(predicate::str::contains("Total: 15 questions"));
}

#[test]
fn test_questions_json() {
    let home = assert_fs::TempDir::new().unwrap();
    let output = cform(&home).args(["questions", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let questions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let questions = questions.as_array().unwrap();
    assert_eq!(questions.len(), 15);
    assert_eq!(questions[0]["id"], "control_name");
    assert_eq!(questions[0]["kind"], "single_line_text");
}

#[test]
fn test_questions_from_configured_schema() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("questions.toml")
        .write_str(
            r#"
            [[questions]]
            id = "scope"
            label = "Scope"
        "#,
        )
        .unwrap();
    home.child(".compliance-form.toml").write_str("[schema]\npath = \"questions.toml\"\n").unwrap();

    cform(&home)
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains(" 1. Scope"))
        .stdout(predicate::str::contains("Total: 1 questions"));
}

// ============================================================================
// Teams Command Tests
// ============================================================================

#[test]
fn test_teams_falls_back_when_unreachable() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("teams")
        .assert()
        .success()
        .stdout(predicate::str::contains("Engineering"))
        .stdout(predicate::str::contains("Operations"))
        .stdout(predicate::str::contains("showing default teams"));
}

#[test]
fn test_teams_json_fallback() {
    let home = assert_fs::TempDir::new().unwrap();
    let output = cform(&home).args(["teams", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let teams: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        teams,
        serde_json::json!([
            {"id": 1, "name": "Engineering"},
            {"id": 2, "name": "Legal"},
            {"id": 3, "name": "HR"},
            {"id": 4, "name": "Finance"},
            {"id": 5, "name": "Operations"}
        ])
    );
}

// ============================================================================
// Submit Command Tests
// ============================================================================

#[test]
fn test_submit_unknown_team_fails() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("answers.toml").write_str("control_name = \"Access Review\"\n").unwrap();

    cform(&home)
        .args(["submit", "--team", "42", "--answers", "answers.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown team '42'"));
}

#[test]
fn test_submit_blank_answers_fails() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("answers.json").write_str(r#"{"control_name": "   ", "purpose": ""}"#).unwrap();

    cform(&home)
        .args(["submit", "--team", "1", "--answers", "answers.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please answer at least one question before submitting."));
}

#[test]
fn test_submit_unknown_question_fails() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("answers.toml").write_str("not_a_question = \"x\"\n").unwrap();

    cform(&home)
        .args(["submit", "--team", "1", "--answers", "answers.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown question id 'not_a_question'"));
}

#[test]
fn test_submit_connection_failure() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child("answers.toml").write_str("control_name = \"Access Review\"\n").unwrap();

    cform(&home)
        .args(["submit", "--team", "1", "--answers", "answers.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to connect to server"));
}

#[test]
fn test_submit_missing_answers_file() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .args(["submit", "--team", "1", "--answers", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read answers file"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_shows_effective_values() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[api]"))
        .stdout(predicate::str::contains(UNREACHABLE));
}

#[test]
fn test_api_url_flag_overrides_env() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .args(["--api-url", "http://procedures.example:8080", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://procedures.example:8080"));
}

#[test]
fn test_invalid_config_file_fails() {
    let home = assert_fs::TempDir::new().unwrap();
    home.child(".compliance-form.toml").write_str("[api\n").unwrap();

    cform(&home).arg("config").assert().failure();
}

#[test]
fn test_health_unreachable_fails() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not reachable"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    let home = assert_fs::TempDir::new().unwrap();
    cform(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compliance-form"));
}
