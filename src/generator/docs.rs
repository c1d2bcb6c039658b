//! README generation.
//!
//! The built-in READMEs are askama templates under `templates/`. A custom
//! README template is a minijinja file rendered against [`readme_context`]
//! or [`multi_readme_context`].

use anyhow::Context;
use askama::Template;
use minijinja::Environment;
use serde_json::{json, Value};
use std::path::Path;

use crate::naming::{connector_id, template_id, webhook_path, webhook_url, TEMPLATE_NAMESPACE};
use crate::schema::{MultiOperationSchema, OperationSchema};
use crate::type_map::{generate_output_mapping, generate_payload_template};

use super::metadata::{multi_schema_category, schema_category};
use super::templates::{
    MultiReadmeTemplate, ReadmeOperation, ReadmeParameter, ReadmeResource, ReadmeTemplate,
};

/// Built-in README for a single operation
pub fn generate_readme(schema: &OperationSchema) -> anyhow::Result<String> {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);
    let rendered = ReadmeTemplate {
        display_name: schema.display_name.clone(),
        description: schema.description.clone(),
        connector_id: id.clone(),
        node_name: schema.node_name.clone(),
        resource_name: schema.resource_name.clone(),
        operation_name: schema.operation_name.clone(),
        category: schema_category(schema),
        webhook_path: webhook_path(&id),
        webhook_url: webhook_url(&id),
        credentials: schema.credentials.clone(),
        parameters: schema
            .parameters
            .iter()
            .map(|p| ReadmeParameter {
                name: p.name.clone(),
                display_name: p.display_name.clone(),
                kind: p.kind.to_string(),
                required: p.required,
                description: p.description.clone().unwrap_or_default(),
            })
            .collect(),
        payload: generate_payload_template(&schema.parameters),
        output_mapping: generate_output_mapping(),
    }
    .render()?;
    Ok(rendered)
}

/// Built-in README for a multi-operation connector
pub fn generate_multi_readme(schema: &MultiOperationSchema) -> anyhow::Result<String> {
    let rendered = MultiReadmeTemplate {
        node_id: schema.node_id.clone(),
        node_name: schema.node_name.clone(),
        display_name: schema.display_name.clone(),
        description: schema.description.clone(),
        resource_names: schema
            .resources
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        operation_count: schema.operation_count(),
        resources: schema
            .resources
            .iter()
            .map(|r| ReadmeResource {
                name: r.name.clone(),
                operations: r
                    .operations
                    .iter()
                    .map(|op| ReadmeOperation {
                        name: op.name.clone(),
                        description: op.description.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
    .render()?;
    Ok(rendered)
}

/// Variables available to a custom README template for one operation
///
/// `schema` holds the operation schema as serialized in catalogs; the derived
/// identifiers and JSON fragments sit next to it.
pub fn readme_context(schema: &OperationSchema) -> Value {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);
    json!({
        "schema": schema,
        "multiOperation": false,
        "connectorId": id,
        "templateId": template_id(&id),
        "webhookPath": webhook_path(&id),
        "webhookUrl": webhook_url(&id),
        "category": schema_category(schema),
        "payload": generate_payload_template(&schema.parameters),
        "outputMapping": generate_output_mapping(),
    })
}

/// Variables available to a custom README template for a multi-operation connector
pub fn multi_readme_context(schema: &MultiOperationSchema) -> Value {
    json!({
        "schema": schema,
        "multiOperation": true,
        "connectorId": schema.node_id,
        "templateId": format!("{TEMPLATE_NAMESPACE}.{}", schema.node_id),
        "webhookPath": webhook_path(&schema.node_id),
        "webhookUrl": webhook_url(&schema.node_id),
        "category": multi_schema_category(schema),
        "operationCount": schema.operation_count(),
        "outputMapping": generate_output_mapping(),
    })
}

/// Render a minijinja README template file against `context`
pub fn render_custom_readme(template: &Path, context: &Value) -> anyhow::Result<String> {
    let source = std::fs::read_to_string(template)
        .with_context(|| format!("Failed to read README template {}", template.display()))?;
    let mut env = Environment::new();
    env.add_template("readme", &source)
        .with_context(|| format!("Invalid README template {}", template.display()))?;
    let tmpl = env.get_template("readme")?;
    tmpl.render(context)
        .with_context(|| format!("Failed to render README template {}", template.display()))
}
