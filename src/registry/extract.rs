//! Typed node definitions and multi-operation schema extraction.
//!
//! A [`NodeDefinition`] mirrors the shape of an n8n node description: a list
//! of resources with their operations, plus one flat field list where each
//! field declares the resource/operation combinations it is shown for.
//! [`extract_node_schema`] folds that into a [`MultiOperationSchema`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistryError;
use crate::schema::{
    MultiOperationSchema, OperationEntry, OperationParameter, ParameterType, ResourceEntry,
};

use super::NodeEntry;

/// `displayOptions.show` predicate of a field
///
/// An empty list places no constraint on that key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShowPredicate {
    #[serde(default)]
    pub resource: Vec<String>,
    #[serde(default)]
    pub operation: Vec<String>,
}

impl ShowPredicate {
    pub fn matches(&self, resource: &str, operation: &str) -> bool {
        (self.resource.is_empty() || self.resource.iter().any(|r| r == resource))
            && (self.operation.is_empty() || self.operation.iter().any(|o| o == operation))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub show: ShowPredicate,
}

/// One field of a node and where it is visible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(flatten)]
    pub parameter: OperationParameter,
    #[serde(default)]
    pub display_options: DisplayOptions,
}

impl FieldDefinition {
    pub fn new(parameter: OperationParameter) -> Self {
        FieldDefinition {
            parameter,
            display_options: DisplayOptions::default(),
        }
    }

    /// Restrict the field to the given resource and operations
    pub fn shown_for(mut self, resource: &str, operations: &[&str]) -> Self {
        self.display_options.show.resource = vec![resource.to_string()];
        self.display_options.show.operation = operations.iter().map(|o| o.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

/// Full description of a node: resources, operations and fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub credentials: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl NodeDefinition {
    /// Parameters visible for one (resource, operation) pair
    ///
    /// When several fields share a name, the first declared one wins.
    pub fn parameters_for(&self, resource: &str, operation: &str) -> Vec<OperationParameter> {
        let mut parameters: Vec<OperationParameter> = Vec::new();
        for field in &self.fields {
            if !field.display_options.show.matches(resource, operation) {
                continue;
            }
            if parameters.iter().any(|p| p.name == field.parameter.name) {
                debug!(
                    resource,
                    operation,
                    field = %field.parameter.name,
                    "Dropping duplicate field definition"
                );
                continue;
            }
            parameters.push(field.parameter.clone());
        }
        parameters
    }
}

/// Quality tier of an operation from its parameters
///
/// - 3: a collection parameter, or anything binary
/// - 2: a choice parameter, or a description mentioning "display"
/// - 1: otherwise
pub fn classify_operation_tier(parameters: &[OperationParameter]) -> u8 {
    let complex = parameters.iter().any(|p| {
        p.kind.is_collection()
            || p.name.contains("binary")
            || p.kind == ParameterType::Other("binary".to_string())
    });
    if complex {
        return 3;
    }
    let moderate = parameters.iter().any(|p| {
        p.kind.is_choice()
            || p.description
                .as_deref()
                .is_some_and(|d| d.contains("display"))
    });
    if moderate {
        2
    } else {
        1
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn extraction_category(node_id: &str) -> &'static str {
    match node_id.to_lowercase().as_str() {
        "gmail" | "slack" | "discord" => "communication",
        "google-sheets" => "data-storage",
        "github" => "developer-tools",
        "jira" => "productivity",
        _ => "integration",
    }
}

fn extraction_color(node_id: &str) -> &'static str {
    match node_id.to_lowercase().as_str() {
        "gmail" => "#EA4335",
        "slack" => "#4A154B",
        "discord" => "#5865F2",
        "github" => "#181717",
        _ => "#6B7280",
    }
}

/// Placeholder structure for nodes registered without a definition
fn placeholder_resources() -> Vec<ResourceEntry> {
    vec![ResourceEntry {
        value: "message".to_string(),
        name: "Message".to_string(),
        operations: vec![OperationEntry {
            value: "send".to_string(),
            name: "Send".to_string(),
            description: "Send a message".to_string(),
            parameters: Vec::new(),
            tier: 1,
        }],
    }]
}

/// Build the multi-operation schema of a registered node
pub(super) fn extract_from_entry(entry: &NodeEntry) -> Result<MultiOperationSchema, RegistryError> {
    let node_id = entry.node_id.as_str();
    let node_name = capitalize(node_id);

    let (description, icon, credentials, resources) = match &entry.definition {
        Some(definition) => {
            let resources = definition
                .resources
                .iter()
                .map(|resource| ResourceEntry {
                    value: resource.value.clone(),
                    name: resource.name.clone(),
                    operations: resource
                        .operations
                        .iter()
                        .map(|op| {
                            let parameters = definition.parameters_for(&resource.value, &op.value);
                            OperationEntry {
                                value: op.value.clone(),
                                name: op.name.clone(),
                                description: op.description.clone(),
                                tier: classify_operation_tier(&parameters),
                                parameters,
                            }
                        })
                        .collect(),
                })
                .collect();
            (
                definition.description.clone(),
                definition.icon.clone(),
                definition.credentials.clone(),
                resources,
            )
        }
        None => {
            debug!(node = node_id, "No node definition registered, using placeholder");
            (String::new(), None, Vec::new(), placeholder_resources())
        }
    };

    let schema = MultiOperationSchema {
        node_id: node_id.to_string(),
        node_name: node_name.clone(),
        display_name: format!("{node_name} Connector"),
        description: if description.is_empty() {
            format!("{node_name} integration connector")
        } else {
            description
        },
        icon,
        color: extraction_color(node_id).to_string(),
        credentials,
        category: extraction_category(node_id).to_string(),
        tags: vec![
            node_id.to_lowercase(),
            "integration".to_string(),
            "automation".to_string(),
        ],
        resources,
    };
    schema.validate()?;
    debug!(
        node = node_id,
        resources = schema.resources.len(),
        operations = schema.operation_count(),
        "Extracted multi-operation schema"
    );
    Ok(schema)
}
