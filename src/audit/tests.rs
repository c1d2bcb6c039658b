#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the audit checks

use super::{audit_directory, audit_element_template, audit_file, audit_metadata, Severity};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn kinds(issues: &[super::AuditIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.kind.as_str()).collect()
}

fn well_formed() -> serde_json::Value {
    json!({
        "groups": [{"id": "operation", "label": "Operation"}, {"id": "input", "label": "Input"}],
        "properties": [
            {
                "id": "operation",
                "label": "Operation",
                "type": "Dropdown",
                "binding": {"type": "camunda:inputParameter", "name": "operation"},
                "group": "operation"
            },
            {
                "id": "param_text",
                "label": "Text",
                "type": "String",
                "description": "Message text",
                "binding": {"type": "camunda:inputParameter", "name": "text"},
                "group": "input",
                "condition": {"type": "simple", "property": "operation", "equals": "message:send"}
            }
        ]
    })
}

#[test]
fn test_well_formed_template_is_clean() {
    let issues = audit_element_template(&well_formed(), "t.element.json");
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_duplicate_id_detected() {
    let mut template = well_formed();
    template["properties"][1]["id"] = json!("operation");
    let issues = audit_element_template(&template, "t");
    assert_eq!(kinds(&issues), vec!["duplicate_id"]);
    assert_eq!(issues[0].severity, Severity::Error);
}

#[test]
fn test_orphaned_condition_detected() {
    let mut template = well_formed();
    template["properties"][1]["condition"]["property"] = json!("resource");
    let issues = audit_element_template(&template, "t");
    assert_eq!(kinds(&issues), vec!["orphaned_condition"]);
    assert!(issues[0].message.contains("resource"));
}

#[test]
fn test_condition_shapes() {
    let mut template = well_formed();
    template["properties"][1]["condition"] = json!({"type": "simple", "property": "operation"});
    assert_eq!(kinds(&audit_element_template(&template, "t")), vec!["missing_equals"]);

    template["properties"][1]["condition"] =
        json!({"type": "oneOf", "property": "operation", "oneOf": []});
    assert_eq!(kinds(&audit_element_template(&template, "t")), vec!["empty_one_of"]);
}

#[test]
fn test_missing_label_type_binding() {
    let template = json!({
        "groups": [],
        "properties": [{"label": "", "binding": {"type": "camunda:inputParameter"}}]
    });
    let issues = audit_element_template(&template, "t");
    assert_eq!(
        kinds(&issues),
        vec!["missing_label", "missing_type", "missing_binding"]
    );
}

#[test]
fn test_operation_group_requires_condition() {
    let template = json!({
        "groups": [{"id": "group-send", "label": "Send"}],
        "properties": [{
            "id": "send_text",
            "label": "Text",
            "type": "String",
            "binding": {"type": "camunda:inputParameter", "name": "text"},
            "group": "group-send"
        }]
    });
    let issues = audit_element_template(&template, "t");
    assert_eq!(kinds(&issues), vec!["unconditioned_operation_property"]);
}

#[test]
fn test_required_input_without_description_and_unknown_group_warn() {
    let mut template = well_formed();
    template["properties"][1]
        .as_object_mut()
        .unwrap()
        .remove("description");
    template["properties"][1]["constraints"] = json!({"notEmpty": true});
    template["properties"][0]["group"] = json!("connection");
    let issues = audit_element_template(&template, "t");
    assert_eq!(kinds(&issues), vec!["unknown_group", "missing_description"]);
    assert!(issues.iter().all(|i| i.severity == Severity::Warning));
}

#[test]
fn test_optional_input_without_description_is_info() {
    let mut template = well_formed();
    template["properties"][1]
        .as_object_mut()
        .unwrap()
        .remove("description");
    let issues = audit_element_template(&template, "t");
    assert_eq!(kinds(&issues), vec!["missing_description"]);
    assert_eq!(issues[0].severity, Severity::Info);

    let report = super::AuditReport {
        files_checked: 1,
        issues,
    };
    assert!(!report.has_errors());
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_missing_properties_array() {
    let issues = audit_element_template(&json!({"name": "x"}), "t");
    assert_eq!(kinds(&issues), vec!["missing_properties"]);
}

#[test]
fn test_metadata_required_fields_and_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# x").unwrap();
    let metadata = json!({
        "id": "slack-send-message",
        "name": "",
        "version": "1.0.0",
        "files": {"readme": "README.md", "elementTemplate": "slack-send-message.element.json"}
    });
    let issues = audit_metadata(&metadata, dir.path(), "connector.json");
    assert_eq!(
        kinds(&issues),
        vec!["missing_field", "missing_field", "missing_file"]
    );
    assert!(issues[2].location.ends_with("files.elementTemplate"));
}

#[test]
fn test_invalid_json_reported_as_issue() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.element.json");
    fs::write(&path, "{ not json").unwrap();
    let issues = audit_file(&path).unwrap();
    assert_eq!(kinds(&issues), vec!["invalid_json"]);
}

#[test]
fn test_audit_directory_walks_tree() {
    let dir = TempDir::new().unwrap();
    let connector = dir.path().join("communication").join("slack");
    fs::create_dir_all(&connector).unwrap();
    fs::write(
        connector.join("slack.element.json"),
        serde_json::to_string(&well_formed()).unwrap(),
    )
    .unwrap();
    fs::write(
        connector.join("connector.json"),
        r#"{"id":"slack","name":"Slack","description":"d","version":"2.0.0","files":{"elementTemplate":"slack.element.json"}}"#,
    )
    .unwrap();
    fs::write(connector.join("slack.element.json.backup-2024"), "{}").unwrap();
    fs::write(connector.join("notes.json"), "{}").unwrap();

    let report = audit_directory(dir.path()).unwrap();
    assert_eq!(report.files_checked, 2);
    assert!(!report.has_errors(), "{:?}", report.issues);
}

#[test]
fn test_audit_directory_missing_root() {
    let dir = TempDir::new().unwrap();
    assert!(audit_directory(&dir.path().join("absent")).is_err());
}
