//! Integration tests for the yamlbind CLI
//!
//! These tests run the actual binary against temporary YAML files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn yamlbind_cmd() -> Command {
    Command::cargo_bin("yamlbind").unwrap()
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let file = dir.path().join("config.yml");
    fs::write(&file, body).unwrap();
    file.to_str().unwrap().to_string()
}

#[test]
fn test_help_flag() {
    yamlbind_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dotted-path YAML config"));
}

// ============================================================================
// get / set
// ============================================================================

#[test]
fn test_get_scalar() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database:\n  host: local\n  port: 5432\n");

    yamlbind_cmd()
        .args(["get", &file, "database.host"])
        .assert()
        .success()
        .stdout("local\n");

    yamlbind_cmd()
        .args(["get", &file, "database.port"])
        .assert()
        .success()
        .stdout("5432\n");
}

#[test]
fn test_get_section_as_json() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database:\n  host: local\n  port: 5432\n");

    yamlbind_cmd()
        .args(["get", &file, "database", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"host\": \"local\""))
        .stdout(predicate::str::contains("\"port\": 5432"));
}

#[test]
fn test_get_missing_path_fails_with_fix() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database:\n  host: local\n");

    yamlbind_cmd()
        .args(["get", &file, "database.port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YB-012"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_set_creates_sections_and_saves() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "name: demo\n");

    yamlbind_cmd()
        .args(["set", &file, "database.port", "6543"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set"));

    let saved = fs::read_to_string(&file).unwrap();
    assert!(saved.contains("port: 6543"));
    assert!(saved.contains("name: demo"));

    yamlbind_cmd()
        .args(["get", &file, "database.port"])
        .assert()
        .success()
        .stdout("6543\n");
}

#[test]
fn test_invalid_yaml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database: [unclosed\n");

    yamlbind_cmd()
        .args(["get", &file, "database"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML parse error"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_passes_when_paths_present() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database:\n  host: local\n  port: 5432\n");

    yamlbind_cmd()
        .args(["check", &file, "--section", "database", "-r", "host", "-r", "port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 required path(s) present"));
}

#[test]
fn test_check_lists_missing_paths() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "database:\n  host: local\n");

    yamlbind_cmd()
        .args(["check", &file, "--section", "database", "-r", "host", "-r", "port"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("database.port"))
        .stdout(predicate::str::contains("database.host").not());
}

#[test]
fn test_check_json_report() {
    let dir = TempDir::new().unwrap();
    let file = write_config(&dir, "server:\n  name: api\n");

    let output = yamlbind_cmd()
        .args(["check", &file, "-r", "server.name", "-r", "server.port", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ok"], false);
    assert_eq!(report["checked"], 2);
    assert_eq!(report["errors"], serde_json::json!(["server.port"]));
}

#[test]
fn test_check_does_not_modify_file() {
    let dir = TempDir::new().unwrap();
    let body = "database:\n  host: local\n";
    let file = write_config(&dir, body);

    yamlbind_cmd()
        .args(["check", &file, "-r", "database.host"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&file).unwrap(), body);
}

// ============================================================================
// compare
// ============================================================================

#[test]
fn test_compare_versions() {
    yamlbind_cmd()
        .args(["compare", "1.2", "1.2.0"])
        .assert()
        .success()
        .stdout("EQUAL\n");

    yamlbind_cmd()
        .args(["compare", "2.0", "1.9.9"])
        .assert()
        .success()
        .stdout("GREATER\n");

    yamlbind_cmd()
        .args(["compare", "1.0", "1.0.1"])
        .assert()
        .success()
        .stdout("LESSER\n");
}

#[test]
fn test_compare_rejects_non_numeric() {
    yamlbind_cmd()
        .args(["compare", "1.a", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YB-020"));
}
