//! Unit tests for the operation registry and extraction

use super::*;
use crate::schema::{OperationParameter, ParamOption, ParameterType};
use std::io::Write;

fn builtin() -> NodeRegistry {
    NodeRegistry::with_builtin().unwrap()
}

#[test]
fn test_builtin_nodes_in_registration_order() {
    let registry = builtin();
    assert_eq!(registry.list_available_nodes(), vec!["slack", "gmail"]);
    assert!(registry.node_exists("slack"));
    assert!(registry.node_exists("GMAIL"));
    assert!(!registry.node_exists("discord"));
}

#[test]
fn test_list_node_operations() {
    let registry = builtin();
    assert_eq!(registry.list_node_operations("slack").unwrap(), vec!["send"]);
    assert_eq!(
        registry.list_node_operations("gmail").unwrap(),
        vec!["send", "get", "reply", "addLabel"]
    );
}

#[test]
fn test_get_node_operation_matches_code_or_name_case_insensitively() {
    let registry = builtin();
    let by_code = registry.get_node_operation("gmail", "ADDLABEL").unwrap();
    let by_name = registry.get_node_operation("Gmail", "add label").unwrap();
    assert_eq!(by_code, by_name);
    assert_eq!(by_code.connector_id(), "gmail-add-label-message");
}

#[test]
fn test_unknown_operation_lists_registered_codes() {
    let registry = builtin();
    let err = registry.get_node_operation("slack", "nonexistent").unwrap_err();
    match &err {
        RegistryError::OperationNotFound {
            node,
            operation,
            available,
        } => {
            assert_eq!(node, "slack");
            assert_eq!(operation, "nonexistent");
            assert_eq!(available, &vec!["send".to_string()]);
        }
        other => panic!("Expected OperationNotFound, got {other:?}"),
    }
    assert_eq!(err.available(), ["send".to_string()]);
    assert!(err.to_string().contains("Available operations: send"));
}

#[test]
fn test_unknown_node_lists_registered_nodes() {
    let err = builtin().get_node_operations("discord").unwrap_err();
    assert_eq!(err.available(), ["slack".to_string(), "gmail".to_string()]);
    assert_eq!(
        err.to_string(),
        "Node 'discord' not found. Available nodes: slack, gmail"
    );
}

#[test]
fn test_register_rejects_invalid_schema() {
    let mut registry = builtin();
    let mut entry = registry.node("slack").unwrap().clone();
    entry.operations[0]
        .parameters
        .push(OperationParameter::new("channel", "Again", ParameterType::String));
    let err = registry.register(entry).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidSchema { .. }));
}

#[test]
fn test_register_rejects_duplicate_operation_codes() {
    let mut registry = NodeRegistry::new();
    let mut entry = builtin().node("gmail").unwrap().clone();
    let first = entry.operations[0].clone();
    entry.operations.push(first);
    assert!(registry.register(entry).is_err());
}

#[test]
fn test_classify_operation_tier() {
    let plain = OperationParameter::new("to", "To", ParameterType::String);
    let choice = OperationParameter::new("kind", "Kind", ParameterType::Options)
        .with_options(vec![ParamOption::new("A", "a")]);
    let displayed = OperationParameter::new("x", "X", ParameterType::String)
        .with_description("Only on display");
    let nested = OperationParameter::new("options", "Options", ParameterType::Collection);
    let binary = OperationParameter::new("binaryProperty", "Binary", ParameterType::String);

    assert_eq!(classify_operation_tier(&[]), 1);
    assert_eq!(classify_operation_tier(&[plain.clone()]), 1);
    assert_eq!(classify_operation_tier(&[plain.clone(), choice.clone()]), 2);
    assert_eq!(classify_operation_tier(&[displayed]), 2);
    assert_eq!(classify_operation_tier(&[choice.clone(), nested]), 3);
    assert_eq!(classify_operation_tier(&[binary]), 3);
    // pure
    assert_eq!(
        classify_operation_tier(&[plain.clone(), choice.clone()]),
        classify_operation_tier(&[plain, choice])
    );
}

#[test]
fn test_extract_gmail_schema() {
    let schema = builtin().extract_node_schema("gmail").unwrap();
    assert_eq!(schema.node_name, "Gmail");
    assert_eq!(schema.display_name, "Gmail Connector");
    assert_eq!(schema.category, "communication");
    assert_eq!(schema.color, "#EA4335");
    assert_eq!(schema.tags, vec!["gmail", "integration", "automation"]);
    let resources: Vec<&str> = schema.resources.iter().map(|r| r.value.as_str()).collect();
    assert_eq!(resources, vec!["message", "draft", "label", "thread"]);

    let send = &schema.resources[0].operations[0];
    let names: Vec<&str> = send.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["sendTo", "subject", "emailType", "message"]);
    assert_eq!(send.tier, 2);

    let get_all = schema.resources[0]
        .operations
        .iter()
        .find(|op| op.value == "getAll")
        .unwrap();
    assert_eq!(get_all.tier, 3);

    let thread_get = &schema.resources[3].operations[0];
    assert_eq!(thread_get.tier, 1);
}

#[test]
fn test_extraction_keeps_first_of_duplicate_fields() {
    let mut registry = NodeRegistry::new();
    let mut entry = builtin().node("slack").unwrap().clone();
    let definition = entry.definition.as_mut().unwrap();
    definition.fields.push(
        FieldDefinition::new(
            OperationParameter::new("text", "Text Again", ParameterType::String)
                .with_description("later duplicate"),
        )
        .shown_for("message", &["send"]),
    );
    registry.register(entry).unwrap();

    let schema = registry.extract_node_schema("slack").unwrap();
    let send = &schema.resources[0].operations[0];
    let texts: Vec<&OperationParameter> =
        send.parameters.iter().filter(|p| p.name == "text").collect();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].display_name, "Message Text");
}

#[test]
fn test_extraction_placeholder_without_definition() {
    let mut registry = NodeRegistry::new();
    let mut entry = builtin().node("slack").unwrap().clone();
    entry.node_id = "mattermost".to_string();
    entry.definition = None;
    for op in &mut entry.operations {
        op.node_id = "mattermost".to_string();
    }
    registry.register(entry).unwrap();

    let schema = registry.extract_node_schema("mattermost").unwrap();
    assert_eq!(schema.category, "integration");
    assert_eq!(schema.color, "#6B7280");
    assert_eq!(schema.description, "Mattermost integration connector");
    assert_eq!(schema.operation_count(), 1);
    let (resource, op) = schema.operations().next().unwrap();
    assert_eq!((resource.value.as_str(), op.value.as_str()), ("message", "send"));
    assert!(op.parameters.is_empty());
    assert_eq!(op.tier, 1);
}

const YAML_CATALOG: &str = r#"
operations:
  - nodeId: Acme
    nodeName: Acme
    resource: ticket
    resourceName: Ticket
    operation: create
    operationName: Create
    displayName: Acme - Create Ticket
    category: productivity
    parameters:
      - { name: title, displayName: Title, type: string, required: true }
      - name: priority
        displayName: Priority
        type: options
        options:
          - { name: Low, value: low }
          - { name: High, value: high }
definitions:
  acme:
    resources:
      - value: ticket
        name: Ticket
        operations:
          - { value: create, name: Create }
    fields:
      - name: title
        displayName: Title
        type: string
        displayOptions:
          show:
            resource: [ticket]
"#;

#[test]
fn test_load_yaml_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.yaml");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(YAML_CATALOG.as_bytes())
        .unwrap();

    let mut registry = builtin();
    assert_eq!(registry.load_catalog(&path).unwrap(), 1);
    assert_eq!(registry.list_available_nodes(), vec!["slack", "gmail", "acme"]);

    let op = registry.get_node_operation("acme", "create").unwrap();
    assert_eq!(op.parameters[1].kind, ParameterType::Options);
    let schema = registry.extract_node_schema("acme").unwrap();
    assert_eq!(schema.resources[0].operations[0].parameters.len(), 1);
}

#[test]
fn test_load_json_catalog_appends_to_existing_node() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra.json");
    let mut op = builtin().get_node_operation("slack", "send").unwrap().clone();
    op.operation = "update".to_string();
    op.operation_name = "Update".to_string();
    let body = serde_json::json!({ "operations": [op] });
    std::fs::write(&path, serde_json::to_string(&body).unwrap()).unwrap();

    let mut registry = builtin();
    registry.load_catalog(&path).unwrap();
    assert_eq!(
        registry.list_node_operations("slack").unwrap(),
        vec!["send", "update"]
    );
}

#[test]
fn test_load_catalog_rejects_invalid_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, YAML_CATALOG.replace("name: priority", "name: \"pri ority\"")).unwrap();

    let mut registry = builtin();
    let err = registry.load_catalog(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parameter name must be an identifier"));
    assert!(!registry.node_exists("acme"));
}

#[test]
fn test_load_catalog_rejects_invalid_definition() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad-definition.yaml");
    let catalog = YAML_CATALOG.replace(
        "          - { value: create, name: Create }",
        "          - { value: create, name: Create }\n          - { value: create, name: Create Again }",
    );
    std::fs::write(&path, catalog).unwrap();

    let mut registry = builtin();
    let err = registry.load_catalog(&path).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate operation value"));
    assert!(!registry.node_exists("acme"));
}

#[test]
fn test_register_rejects_choice_field_without_options() {
    let mut registry = builtin();
    let mut entry = registry.node("gmail").unwrap().clone();
    let definition = entry.definition.as_mut().unwrap();
    let resource = definition.resources[0].value.clone();
    let operation = definition.resources[0].operations[0].value.clone();
    definition.fields.insert(
        0,
        FieldDefinition::new(OperationParameter::new("mode", "Mode", ParameterType::Options))
            .shown_for(&resource, &[&operation]),
    );

    let err = registry.register(entry).unwrap_err();
    assert!(err.to_string().contains("requires options"));
    assert!(registry.extract_node_schema("gmail").is_ok());
}
