//! # Operation Schema Registry
//!
//! The canonical source of [`OperationSchema`]s. Services ("nodes") are
//! registered explicitly as [`NodeEntry`] values, either from the built-in
//! loader table ([`builtin::BUILTIN_NODES`]) or from YAML/JSON catalog files.
//! Every entry is validated on the way in, so generators can assume
//! well-formed input.
//!
//! ## Lookup Surface
//!
//! - [`NodeRegistry::list_available_nodes`]
//! - [`NodeRegistry::node_exists`]
//! - [`NodeRegistry::list_node_operations`]
//! - [`NodeRegistry::get_node_operations`]
//! - [`NodeRegistry::get_node_operation`] (case-insensitive on operation code or name)
//! - [`NodeRegistry::extract_node_schema`] (multi-operation schema)
//!
//! Lookups fail with [`RegistryError`] carrying the valid alternatives.
//!
//! ## Catalog Files
//!
//! ```yaml
//! operations:
//!   - nodeId: acme
//!     nodeName: Acme
//!     resource: ticket
//!     resourceName: Ticket
//!     operation: create
//!     operationName: Create
//!     displayName: Acme - Create Ticket
//!     category: productivity
//!     parameters:
//!       - { name: title, displayName: Title, type: string, required: true }
//! definitions:
//!   acme:
//!     resources: [...]
//!     fields: [...]
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::schema::{MultiOperationSchema, OperationSchema};

pub mod builtin;
pub mod extract;

#[cfg(test)]
mod tests;

pub use extract::{
    classify_operation_tier, DisplayOptions, FieldDefinition, NodeDefinition,
    OperationDefinition, ResourceDefinition, ShowPredicate,
};

/// One registered service
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    /// Lowercase service identifier
    pub node_id: String,
    /// Single-operation schemas, in declaration order
    pub operations: Vec<OperationSchema>,
    /// Resource/operation/field structure used for multi-operation extraction
    pub definition: Option<NodeDefinition>,
}

impl NodeEntry {
    fn find_operation(&self, operation: &str) -> Option<&OperationSchema> {
        self.operations.iter().find(|op| {
            op.operation.eq_ignore_ascii_case(operation)
                || op.operation_name.eq_ignore_ascii_case(operation)
        })
    }

    fn operation_codes(&self) -> Vec<String> {
        self.operations.iter().map(|op| op.operation.clone()).collect()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.node_id.is_empty() {
            return Err(RegistryError::invalid("<node>", "node id must not be empty"));
        }
        let mut codes = HashSet::new();
        for op in &self.operations {
            op.validate()?;
            if !op.node_id.eq_ignore_ascii_case(&self.node_id) {
                return Err(RegistryError::invalid(
                    format!("{}/{}", self.node_id, op.operation),
                    format!("operation belongs to node '{}'", op.node_id),
                ));
            }
            if !codes.insert(op.operation.to_lowercase()) {
                return Err(RegistryError::invalid(
                    format!("{}/{}", self.node_id, op.operation),
                    "duplicate operation code",
                ));
            }
        }
        if self.definition.is_some() {
            extract::extract_from_entry(self)?;
        }
        Ok(())
    }
}

/// Catalog of known services
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<NodeEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    operations: Vec<OperationSchema>,
    #[serde(default)]
    definitions: BTreeMap<String, NodeDefinition>,
}

impl NodeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        NodeRegistry::default()
    }

    /// Registry holding every built-in service
    pub fn with_builtin() -> Result<Self, RegistryError> {
        let mut registry = NodeRegistry::new();
        for (node_id, loader) in builtin::BUILTIN_NODES {
            let mut entry = loader();
            entry.node_id = node_id.to_string();
            registry.register(entry)?;
        }
        Ok(registry)
    }

    /// Register a service, replacing any previous entry with the same id
    pub fn register(&mut self, mut entry: NodeEntry) -> Result<(), RegistryError> {
        entry.node_id = entry.node_id.to_lowercase();
        entry.validate()?;
        debug!(
            node = %entry.node_id,
            operations = entry.operations.len(),
            has_definition = entry.definition.is_some(),
            "Registering node"
        );
        match self.nodes.iter_mut().find(|n| n.node_id == entry.node_id) {
            Some(existing) => *existing = entry,
            None => self.nodes.push(entry),
        }
        Ok(())
    }

    /// Register additional services from a YAML (`.yaml`/`.yml`) or JSON catalog
    ///
    /// Operations for an already registered service are appended to it.
    /// Returns the number of operations loaded.
    pub fn load_catalog(&mut self, path: &Path) -> anyhow::Result<usize> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let catalog: CatalogFile = if path
            .extension()
            .map(|s| s == "yaml" || s == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML catalog {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON catalog {}", path.display()))?
        };

        let mut grouped: BTreeMap<String, Vec<OperationSchema>> = BTreeMap::new();
        for op in catalog.operations {
            grouped.entry(op.node_id.to_lowercase()).or_default().push(op);
        }
        let mut definitions: BTreeMap<String, NodeDefinition> = catalog
            .definitions
            .into_iter()
            .map(|(node_id, definition)| (node_id.to_lowercase(), definition))
            .collect();
        let mut loaded = 0;
        for (node_id, operations) in grouped {
            loaded += operations.len();
            let definition = definitions.remove(&node_id);
            let entry = match self.nodes.iter().find(|n| n.node_id == node_id) {
                Some(existing) => {
                    let mut merged = existing.clone();
                    merged.operations.extend(operations);
                    if definition.is_some() {
                        merged.definition = definition;
                    }
                    merged
                }
                None => NodeEntry {
                    node_id,
                    operations,
                    definition,
                },
            };
            self.register(entry)
                .with_context(|| format!("Invalid catalog {}", path.display()))?;
        }
        for (node_id, definition) in definitions {
            let mut entry = self
                .nodes
                .iter()
                .find(|n| n.node_id == node_id)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Catalog {} defines '{}' without any operations",
                        path.display(),
                        node_id
                    )
                })?;
            entry.definition = Some(definition);
            self.register(entry)?;
        }
        info!(path = %path.display(), operations = loaded, "Loaded catalog");
        Ok(loaded)
    }

    /// Registered service ids in registration order
    pub fn list_available_nodes(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.node_id.clone()).collect()
    }

    pub fn node_exists(&self, node_id: &str) -> bool {
        self.nodes
            .iter()
            .any(|n| n.node_id.eq_ignore_ascii_case(node_id))
    }

    /// Registered entry of a service
    pub fn node(&self, node_id: &str) -> Result<&NodeEntry, RegistryError> {
        self.nodes
            .iter()
            .find(|n| n.node_id.eq_ignore_ascii_case(node_id))
            .ok_or_else(|| RegistryError::NodeNotFound {
                node: node_id.to_string(),
                available: self.list_available_nodes(),
            })
    }

    /// Operation codes of a service
    pub fn list_node_operations(&self, node_id: &str) -> Result<Vec<String>, RegistryError> {
        Ok(self.node(node_id)?.operation_codes())
    }

    /// Every operation of a service
    pub fn get_node_operations(&self, node_id: &str) -> Result<&[OperationSchema], RegistryError> {
        Ok(&self.node(node_id)?.operations)
    }

    /// One operation, matched case-insensitively on its code or display name
    pub fn get_node_operation(
        &self,
        node_id: &str,
        operation: &str,
    ) -> Result<&OperationSchema, RegistryError> {
        let node = self.node(node_id)?;
        node.find_operation(operation)
            .ok_or_else(|| RegistryError::OperationNotFound {
                node: node_id.to_string(),
                operation: operation.to_string(),
                available: node.operation_codes(),
            })
    }

    /// Multi-operation schema of a service
    ///
    /// Services registered without a [`NodeDefinition`] yield a placeholder
    /// schema with a single `message`/`send` operation.
    pub fn extract_node_schema(&self, node_id: &str) -> Result<MultiOperationSchema, RegistryError> {
        extract::extract_from_entry(self.node(node_id)?)
    }
}
