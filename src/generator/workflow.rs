//! n8n workflow generation.
//!
//! Every workflow is the same four-node graph:
//!
//! ```text
//! Webhook ──> <service node> ──> Respond to Webhook
//!                   │                    ^
//!                   └─(error)─> Format Error Response
//! ```
//!
//! Both response paths speak the `{ success, statusCode, responseBody, error }`
//! envelope the Catalyst bridge expects.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::naming::{connector_id, to_title_case, webhook_path};
use crate::schema::{MultiOperationSchema, OperationSchema};

const WEBHOOK_NODE: &str = "Webhook";
const ERROR_NODE: &str = "Format Error Response";
const RESPOND_NODE: &str = "Respond to Webhook";

const SUCCESS_RESPONSE: &str =
    "={{ { success: true, statusCode: 200, responseBody: $json, error: null } }}";

const SINGLE_ERROR_CODE: &str = r#"// Format error response for connector failure
const error = $input.item.json.error || $input.item.json;

let errorMessage = 'Configuration needed. Please check node settings in n8n.';
if (error.message) {
  errorMessage = error.message;
}

return {
  json: {
    success: false,
    statusCode: 500,
    error: errorMessage,
    responseBody: null
  }
};"#;

/// n8n node type versions known to work per service
const NODE_TYPE_VERSIONS: &[(&str, f64)] = &[
    ("slack", 2.2),
    ("gmail", 2.1),
    ("googleSheets", 4.5),
    ("notion", 2.2),
    ("airtable", 2.1),
    ("discord", 2.1),
    ("telegram", 1.2),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub name: String,
    pub nodes: Vec<WorkflowNode>,
    pub connections: BTreeMap<String, NodeConnections>,
    pub active: bool,
    pub settings: WorkflowSettings,
    pub meta: WorkflowMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub parameters: Map<String, Value>,
    #[serde(rename = "type")]
    pub kind: String,
    pub type_version: Value,
    pub position: [i32; 2],
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConnections {
    pub main: Vec<Vec<ConnectionTarget>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Vec<Vec<ConnectionTarget>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    pub execution_order: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowMeta {
    pub description: String,
}

/// Render a workflow as pretty JSON
pub fn to_json(workflow: &Workflow) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(workflow)?)
}

/// `typeVersion` as n8n writes it: integral versions without a fraction
fn type_version(version: f64) -> Value {
    if version.fract() == 0.0 {
        Value::from(version as i64)
    } else {
        Value::from(version)
    }
}

/// Type version of a service node, `1` for services without a known version
pub fn node_type_version(node_id: &str) -> Value {
    let version = NODE_TYPE_VERSIONS
        .iter()
        .find(|(id, _)| *id == node_id)
        .map(|(_, version)| *version)
        .unwrap_or(1.0);
    type_version(version)
}

/// `={{ $json.body.<name> }}`
pub fn body_expression(name: &str) -> String {
    format!("={{{{ $json.body.{name} }}}}")
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn gmail_send_parameters() -> Map<String, Value> {
    object(json!({
        "sendTo": body_expression("to"),
        "subject": body_expression("subject"),
        "emailType": "text",
        "message": body_expression("message"),
        "options": {
            "ccList": body_expression("cc"),
            "bccList": body_expression("bcc"),
        },
    }))
}

fn slack_send_parameters() -> Map<String, Value> {
    object(json!({
        "select": "channel",
        "channelId": {
            "__rl": true,
            "value": body_expression("channel"),
            "mode": "id",
        },
        "text": body_expression("text"),
        "otherOptions": {},
    }))
}

/// Resource, operation and one body expression per parameter
fn generic_parameters(schema: &OperationSchema) -> Map<String, Value> {
    let mut params = Map::new();
    if !schema.resource.is_empty() {
        params.insert("resource".to_string(), Value::from(schema.resource.as_str()));
    }
    if !schema.operation.is_empty() {
        params.insert("operation".to_string(), Value::from(schema.operation.as_str()));
    }
    for param in &schema.parameters {
        params.insert(param.name.clone(), Value::from(body_expression(&param.name)));
    }
    params
}

/// Service node configuration, using the service's own field layout where known
pub fn service_parameters(schema: &OperationSchema) -> Map<String, Value> {
    match (schema.node_id.as_str(), schema.operation.as_str()) {
        ("gmail", "send") => gmail_send_parameters(),
        ("slack", "send") => slack_send_parameters(),
        _ => generic_parameters(schema),
    }
}

fn webhook_node(path: String) -> WorkflowNode {
    WorkflowNode {
        parameters: object(json!({
            "httpMethod": "POST",
            "path": path,
            "responseMode": "responseNode",
            "options": {},
        })),
        kind: "n8n-nodes-base.webhook".to_string(),
        type_version: type_version(2.1),
        position: [0, 0],
        id: "webhook-1".to_string(),
        name: WEBHOOK_NODE.to_string(),
        webhook_id: Some(path),
    }
}

fn service_node(node_id: &str, name: &str, parameters: Map<String, Value>, x: i32) -> WorkflowNode {
    WorkflowNode {
        parameters,
        kind: format!("n8n-nodes-base.{node_id}"),
        type_version: node_type_version(node_id),
        position: [x, 0],
        id: "service-1".to_string(),
        name: name.to_string(),
        webhook_id: None,
    }
}

fn error_node(code: String, x: i32) -> WorkflowNode {
    let mut parameters = Map::new();
    parameters.insert("jsCode".to_string(), Value::from(code));
    WorkflowNode {
        parameters,
        kind: "n8n-nodes-base.code".to_string(),
        type_version: type_version(2.0),
        position: [x, 100],
        id: "error-format-1".to_string(),
        name: ERROR_NODE.to_string(),
        webhook_id: None,
    }
}

fn respond_node(x: i32) -> WorkflowNode {
    WorkflowNode {
        parameters: object(json!({
            "respondWith": "json",
            "responseBody": SUCCESS_RESPONSE,
        })),
        kind: "n8n-nodes-base.respondToWebhook".to_string(),
        type_version: type_version(1.1),
        position: [x, 0],
        id: "respond-1".to_string(),
        name: RESPOND_NODE.to_string(),
        webhook_id: None,
    }
}

fn target(node: &str) -> Vec<Vec<ConnectionTarget>> {
    vec![vec![ConnectionTarget {
        node: node.to_string(),
        kind: "main".to_string(),
        index: 0,
    }]]
}

/// trigger -> service, service -> respond, service error -> formatter -> respond
fn connections(service: &str) -> BTreeMap<String, NodeConnections> {
    let mut connections = BTreeMap::new();
    connections.insert(
        WEBHOOK_NODE.to_string(),
        NodeConnections {
            main: target(service),
            error: None,
        },
    );
    connections.insert(
        service.to_string(),
        NodeConnections {
            main: target(RESPOND_NODE),
            error: Some(target(ERROR_NODE)),
        },
    );
    connections.insert(
        ERROR_NODE.to_string(),
        NodeConnections {
            main: target(RESPOND_NODE),
            error: None,
        },
    );
    connections
}

/// Workflow for a single operation
pub fn generate_workflow(schema: &OperationSchema) -> Workflow {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);
    let service = format!(
        "{} {}",
        to_title_case(&schema.operation),
        to_title_case(&schema.resource)
    );

    Workflow {
        name: schema.display_name.clone(),
        nodes: vec![
            webhook_node(webhook_path(&id)),
            service_node(&schema.node_id, &service, service_parameters(schema), 220),
            error_node(SINGLE_ERROR_CODE.to_string(), 440),
            respond_node(660),
        ],
        connections: connections(&service),
        active: true,
        settings: WorkflowSettings {
            execution_order: "v1".to_string(),
        },
        meta: WorkflowMeta {
            description: format!(
                "Catalyst connector webhook for {}. Configure credentials in n8n after importing.",
                schema.display_name
            ),
        },
    }
}

fn multi_error_code(schema: &MultiOperationSchema) -> String {
    let resources: Vec<&str> = schema.resources.iter().map(|r| r.name.as_str()).collect();
    let node_name = schema.node_name.replace('`', "\\`");
    format!(
        r#"// Format error response
const error = $input.item.json.error || $input.item.json;

let errorMessage = `Connector not configured. Please:
1. Open the {node_name} node in n8n
2. Select a Resource ({resources})
3. Select an Operation
4. Configure OAuth credentials
5. Save and activate workflow`;

if (error.message) {{
  errorMessage = error.message;
}}

return {{
  json: {{
    success: false,
    statusCode: 500,
    error: errorMessage,
    responseBody: null
  }}
}};"#,
        resources = resources.join(", ").replace('`', "\\`"),
    )
}

/// Template workflow for every operation of a service
///
/// The service node is left for the user to point at a resource and
/// operation; every parameter name across all operations is pre-mapped to the
/// request body. The workflow starts inactive.
pub fn generate_multi_workflow(schema: &MultiOperationSchema) -> Workflow {
    let names: BTreeSet<&str> = schema
        .operations()
        .flat_map(|(_, op)| op.parameters.iter().map(|p| p.name.as_str()))
        .collect();
    let mut parameters = Map::new();
    for name in names {
        parameters.insert(name.to_string(), Value::from(body_expression(name)));
    }

    Workflow {
        name: format!("Catalyst {} Template", schema.display_name),
        nodes: vec![
            webhook_node(webhook_path(&schema.node_id)),
            service_node(&schema.node_id, &schema.node_name, parameters, 300),
            error_node(multi_error_code(schema), 520),
            respond_node(740),
        ],
        connections: connections(&schema.node_name),
        active: false,
        settings: WorkflowSettings {
            execution_order: "v1".to_string(),
        },
        meta: WorkflowMeta {
            description: format!(
                "Catalyst {} Template - Configure resource, operation, and credentials in n8n after importing. Supports {} resources with {} operations.",
                schema.display_name,
                schema.resources.len(),
                schema.operation_count()
            ),
        },
    }
}
