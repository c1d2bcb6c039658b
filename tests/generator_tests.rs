#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end generation over every registered service

mod common;

use common::registry_with_fixture;
use connector_gen::audit::{audit_directory, audit_element_template, Severity};
use connector_gen::generator::{
    generate_connectors, generate_multi_connector, preview_multi_connector, DocumentKind,
    GeneratorOptions,
};
use connector_gen::manifest::build_manifest;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_every_single_operation_generates_and_audits_clean() {
    let registry = registry_with_fixture();
    let dir = TempDir::new().unwrap();
    let options = GeneratorOptions::new(dir.path());

    let mut expected = 0;
    for node in registry.list_available_nodes() {
        let schemas = registry.get_node_operations(&node).unwrap().to_vec();
        expected += schemas.len();
        for item in generate_connectors(&schemas, &options) {
            assert!(item.is_ok(), "{}/{}: {:?}", item.node_id, item.operation, item.outcome);
        }
    }

    let report = audit_directory(dir.path()).unwrap();
    assert_eq!(report.files_checked, expected * 2);
    assert!(!report.has_errors(), "{:?}", report.issues);

    let manifest = build_manifest(dir.path()).unwrap();
    assert!(manifest.skipped.is_empty());
    assert_eq!(manifest.manifest.stats.total_connectors, expected);
}

#[test]
fn test_every_multi_connector_audits_clean() {
    let registry = registry_with_fixture();
    for node in registry.list_available_nodes() {
        let schema = registry.extract_node_schema(&node).unwrap().filter_by_tier(3);
        let preview = preview_multi_connector(&schema).unwrap();

        let element = preview.document(DocumentKind::ElementTemplate).unwrap();
        let template: Value = serde_json::from_str(&element.contents).unwrap();
        let errors: Vec<_> = audit_element_template(&template, &element.filename)
            .into_iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert!(errors.is_empty(), "{node}: {errors:?}");

        let ids: HashSet<&str> = template["properties"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        for property in template["properties"].as_array().unwrap() {
            if let Some(target) = property["condition"]["property"].as_str() {
                assert!(ids.contains(target), "{node}: dangling condition on {target}");
            }
        }

        let workflow = preview.document(DocumentKind::Workflow).unwrap();
        let workflow: Value = serde_json::from_str(&workflow.contents).unwrap();
        assert!(!workflow["nodes"].as_array().unwrap().is_empty());

        for kind in [DocumentKind::ExampleBpmn, DocumentKind::SetupBpmn] {
            let bpmn = preview.document(kind).unwrap();
            assert!(bpmn.contents.starts_with("<?xml"), "{node}: {}", bpmn.filename);
        }
    }
}

#[test]
fn test_multi_generation_written_tree_audits_clean() {
    let registry = registry_with_fixture();
    let dir = TempDir::new().unwrap();
    let options = GeneratorOptions::new(dir.path());
    for node in registry.list_available_nodes() {
        let schema = registry.extract_node_schema(&node).unwrap().filter_by_tier(2);
        if schema.operation_count() == 0 {
            continue;
        }
        generate_multi_connector(&schema, &options).unwrap();
    }
    let report = audit_directory(dir.path()).unwrap();
    assert!(!report.has_errors(), "{:?}", report.issues);

    let manifest = build_manifest(dir.path()).unwrap().manifest;
    assert_eq!(
        manifest.stats.multi_operation,
        manifest.stats.total_connectors
    );
}

#[test]
fn test_regeneration_is_monotonic() {
    let registry = registry_with_fixture();
    let schema = registry.get_node_operation("acme", "create").unwrap().clone();
    let dir = TempDir::new().unwrap();
    let options = GeneratorOptions::new(dir.path());

    let mut versions = Vec::new();
    for _ in 0..3 {
        let item = generate_connectors(std::slice::from_ref(&schema), &options)
            .pop()
            .unwrap();
        versions.push(item.outcome.unwrap().version);
    }
    assert_eq!(versions, vec!["1.0.0", "1.0.1", "1.0.2"]);

    let metadata: Value = serde_json::from_str(
        &fs::read_to_string(
            dir.path()
                .join("productivity")
                .join("acme-create-ticket")
                .join("connector.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(metadata["version"], "1.0.2");
    assert_eq!(metadata["authentication"], "api-key");
}
