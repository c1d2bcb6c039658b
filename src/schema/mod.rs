//! # Operation Schemas
//!
//! Typed description of the operations a connector exposes. Generators
//! consume these types only; anything loosely typed (catalog files, extracted
//! node definitions) is converted and validated before it reaches them.
//!
//! - [`OperationSchema`] - one operation of one service, the unit of the
//!   single-operation pipeline
//! - [`MultiOperationSchema`] - every resource and operation of one service
//!
//! Validation ([`OperationSchema::validate`], [`MultiOperationSchema::validate`])
//! enforces the invariants generators rely on:
//!
//! - parameter names are identifiers usable as `${name}` variables and JSON keys
//! - parameter names are unique within an operation and do not shadow the
//!   reserved connection/envelope bindings ([`RESERVED_NAMES`])
//! - `options` is present exactly when the type is a choice type, with unique values
//! - operation values are unique within a resource, resource values within a schema

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::error::RegistryError;
use crate::naming::connector_id;

#[cfg(test)]
mod tests;

/// Binding names the generators reserve for connection and envelope fields
pub const RESERVED_NAMES: &[&str] = &[
    "webhookUrl",
    "timeout",
    "payload",
    "outputMapping",
    "resource",
    "operation",
];

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex should be valid")
});

/// Generic parameter type vocabulary
///
/// Unrecognised type names are kept verbatim in [`ParameterType::Other`] so
/// that catalogs written for newer node versions still load; they degrade to a
/// plain string field at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Options,
    MultiOptions,
    DateTime,
    Json,
    FixedCollection,
    Collection,
    Other(String),
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Options => "options",
            ParameterType::MultiOptions => "multiOptions",
            ParameterType::DateTime => "dateTime",
            ParameterType::Json => "json",
            ParameterType::FixedCollection => "fixedCollection",
            ParameterType::Collection => "collection",
            ParameterType::Other(name) => name,
        }
    }

    /// `options` and `multiOptions`
    pub fn is_choice(&self) -> bool {
        matches!(self, ParameterType::Options | ParameterType::MultiOptions)
    }

    /// `fixedCollection` and `collection`
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            ParameterType::FixedCollection | ParameterType::Collection
        )
    }

    /// Collections plus free-form `json`
    pub fn is_nested(&self) -> bool {
        self.is_collection() || matches!(self, ParameterType::Json)
    }
}

impl From<&str> for ParameterType {
    fn from(name: &str) -> Self {
        match name {
            "string" => ParameterType::String,
            "number" => ParameterType::Number,
            "boolean" => ParameterType::Boolean,
            "options" => ParameterType::Options,
            "multiOptions" => ParameterType::MultiOptions,
            "dateTime" => ParameterType::DateTime,
            "json" => ParameterType::Json,
            "fixedCollection" => ParameterType::FixedCollection,
            "collection" => ParameterType::Collection,
            other => ParameterType::Other(other.to_string()),
        }
    }
}

impl From<String> for ParameterType {
    fn from(name: String) -> Self {
        ParameterType::from(name.as_str())
    }
}

impl From<ParameterType> for String {
    fn from(kind: ParameterType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a choice parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOption {
    pub name: String,
    pub value: String,
}

impl ParamOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        ParamOption {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One input field of an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParameter {
    /// Variable name and JSON key
    pub name: String,
    /// Human label
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Ordered choices; non-empty exactly for choice types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParamOption>,
}

impl OperationParameter {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: ParameterType,
    ) -> Self {
        OperationParameter {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            required: false,
            default: None,
            description: None,
            placeholder: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_options(mut self, options: Vec<ParamOption>) -> Self {
        self.options = options;
        self
    }
}

/// One operation of one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSchema {
    pub node_id: String,
    pub node_name: String,
    pub resource: String,
    pub resource_name: String,
    pub operation: String,
    pub operation_name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub credentials: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl OperationSchema {
    /// Primary key of the generated connector
    pub fn connector_id(&self) -> String {
        connector_id(&self.node_id, &self.resource, &self.operation)
    }

    /// Check the invariants generators rely on
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (field, value) in [
            ("nodeId", &self.node_id),
            ("resource", &self.resource),
            ("operation", &self.operation),
        ] {
            if value.trim().is_empty() {
                return Err(RegistryError::invalid(
                    self.location(),
                    format!("{field} must not be empty"),
                ));
            }
        }
        validate_parameters(&self.location(), &self.parameters)
    }

    fn location(&self) -> String {
        format!("{}/{}/{}", self.node_id, self.resource, self.operation)
    }
}

/// One operation within a [`ResourceEntry`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationEntry {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    /// Complexity tier, 1 (simple) to 3 (complex)
    pub tier: u8,
}

/// One resource of a service and its operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub value: String,
    pub name: String,
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
}

/// Every resource and operation of one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiOperationSchema {
    pub node_id: String,
    pub node_name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub credentials: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// Combined operation selector value, `"<resource>:<operation>"`
pub fn operation_selector(resource: &str, operation: &str) -> String {
    format!("{resource}:{operation}")
}

impl MultiOperationSchema {
    /// All `(resource, operation)` pairs in declaration order
    pub fn operations(&self) -> impl Iterator<Item = (&ResourceEntry, &OperationEntry)> {
        self.resources
            .iter()
            .flat_map(|r| r.operations.iter().map(move |op| (r, op)))
    }

    pub fn operation_count(&self) -> usize {
        self.resources.iter().map(|r| r.operations.len()).sum()
    }

    /// Drop operations above `max_tier`, then resources left without operations
    pub fn filter_by_tier(&self, max_tier: u8) -> MultiOperationSchema {
        let resources = self
            .resources
            .iter()
            .map(|r| ResourceEntry {
                value: r.value.clone(),
                name: r.name.clone(),
                operations: r
                    .operations
                    .iter()
                    .filter(|op| op.tier <= max_tier)
                    .cloned()
                    .collect(),
            })
            .filter(|r| !r.operations.is_empty())
            .collect();
        MultiOperationSchema {
            resources,
            ..self.clone()
        }
    }

    /// Check the invariants generators rely on
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.node_id.trim().is_empty() {
            return Err(RegistryError::invalid("<schema>", "nodeId must not be empty"));
        }
        let mut resources = HashSet::new();
        for resource in &self.resources {
            let location = format!("{}/{}", self.node_id, resource.value);
            if !resources.insert(resource.value.as_str()) {
                return Err(RegistryError::invalid(location, "duplicate resource value"));
            }
            let mut operations = HashSet::new();
            for op in &resource.operations {
                let op_location = format!("{}/{}", location, op.value);
                if !operations.insert(op.value.as_str()) {
                    return Err(RegistryError::invalid(op_location, "duplicate operation value"));
                }
                if !(1..=3).contains(&op.tier) {
                    return Err(RegistryError::invalid(
                        op_location,
                        format!("tier {} is outside 1..=3", op.tier),
                    ));
                }
                validate_parameters(&op_location, &op.parameters)?;
            }
        }
        Ok(())
    }
}

/// Validate one operation's parameter list
pub fn validate_parameters(
    location: &str,
    parameters: &[OperationParameter],
) -> Result<(), RegistryError> {
    let mut names = HashSet::new();
    for param in parameters {
        let param_location = format!("{}/{}", location, param.name);
        if !IDENTIFIER.is_match(&param.name) {
            return Err(RegistryError::invalid(
                param_location,
                "parameter name must be an identifier ([A-Za-z_][A-Za-z0-9_]*)",
            ));
        }
        if RESERVED_NAMES.contains(&param.name.as_str()) {
            return Err(RegistryError::invalid(
                param_location,
                format!("'{}' is reserved for generated fields", param.name),
            ));
        }
        if !names.insert(param.name.as_str()) {
            return Err(RegistryError::invalid(param_location, "duplicate parameter name"));
        }
        match (param.kind.is_choice(), param.options.is_empty()) {
            (true, true) => {
                return Err(RegistryError::invalid(
                    param_location,
                    format!("type '{}' requires options", param.kind),
                ))
            }
            (false, false) => {
                return Err(RegistryError::invalid(
                    param_location,
                    format!("type '{}' must not declare options", param.kind),
                ))
            }
            _ => {}
        }
        let mut values = HashSet::new();
        for option in &param.options {
            if !values.insert(option.value.as_str()) {
                return Err(RegistryError::invalid(
                    param_location,
                    format!("duplicate option value '{}'", option.value),
                ));
            }
        }
    }
    Ok(())
}
