#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Binary-level tests: exit codes, stdout/stderr, catalogs

mod common;

use common::fixture;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_connector-gen"))
        .current_dir(dir)
        .env_remove("CONNECTOR_GEN_CONFIG")
        .env_remove("CONNECTOR_GEN_OUTPUT_DIR")
        .env_remove("CONNECTOR_GEN_MAX_TIER")
        .env_remove("RUST_LOG")
        .env("CONNECTOR_GEN_LOG_LEVEL", "error")
        .args(args)
        .output()
        .expect("run cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_nodes() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["list-nodes"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("slack"));
    assert!(out.contains("gmail"));
}

#[test]
fn test_unknown_service_exits_with_alternatives() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["generate", "fax"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error: Node 'fax' not found"), "{err}");
    assert!(err.contains("Available services:"), "{err}");
    assert!(err.contains("• gmail"), "{err}");
}

#[test]
fn test_unknown_operation_lists_operations() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["preview", "slack", "--operation", "nonexistent"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Available operations:"), "{err}");
    assert!(err.contains("• send"), "{err}");
}

#[test]
fn test_generate_writes_into_default_output_dir() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["generate", "slack", "--operation", "send"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let connector = dir
        .path()
        .join("connectors/generated/communication/slack-send-message");
    assert!(connector.join("slack-send-message.element.json").is_file());
    assert!(connector.join("connector.json").is_file());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["generate", "gmail", "--dry-run", "-d", "out"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("dry run"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_catalog_option_registers_service() {
    let dir = TempDir::new().unwrap();
    let catalog = fixture("acme.yaml");
    let catalog = catalog.to_str().unwrap();

    let output = run(dir.path(), &["--catalog", catalog, "list-operations", "acme"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("create"));

    let output = run(
        dir.path(),
        &["--catalog", catalog, "generate-multi", "acme", "--tier", "3"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir
        .path()
        .join("connectors/generated/integration/acme/acme-setup.bpmn")
        .is_file());
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("connector-gen.toml"), "output_dir = \"custom\"\n").unwrap();
    let output = run(dir.path(), &["generate", "slack"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join("custom/communication/slack-send-message").is_dir());
}

#[test]
fn test_unparsable_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("connector-gen.toml"), "output_dir = [").unwrap();
    let output = run(dir.path(), &["list-nodes"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse config"));
}

#[test]
fn test_audit_fail_on_error_exit_code() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.element.json"), r#"{"properties": [{}]}"#).unwrap();

    let output = run(dir.path(), &["audit", "."]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("missing_label"));

    let output = run(dir.path(), &["audit", ".", "--fail-on-error"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_preview_single_file() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["preview", "slack", "--file", "metadata"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("📄 Connector Metadata (connector.json)"));
    assert!(!out.contains("📄 n8n Workflow"));
}
