//! `connector.json` generation.
//!
//! The metadata document identifies a connector, records its semantic
//! version and quality classification, and lists the sibling files of the
//! connector directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::naming::connector_id;
use crate::schema::{MultiOperationSchema, OperationParameter, OperationSchema};
use crate::type_map::{determine_category, generate_tags, service_color, service_icon};

/// Version of a freshly generated single-operation connector
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Version of a freshly generated multi-operation connector
pub const DEFAULT_MULTI_VERSION: &str = "2.0.0";

pub const METADATA_FILE: &str = "connector.json";
pub const README_FILE: &str = "README.md";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multi_operation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_count: Option<usize>,
    /// Resource display names (multi-operation only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MetadataSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<String>,
    pub quality: QualityRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub files: MetadataFiles,
}

/// Where a single-operation connector came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub node: String,
    pub resource: String,
    pub operation: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub tier: u8,
    pub generated: bool,
    pub reviewed: bool,
    pub tested: bool,
}

impl QualityRecord {
    fn generated(tier: u8) -> Self {
        QualityRecord {
            tier,
            generated: true,
            reviewed: false,
            tested: false,
        }
    }
}

/// Sibling file names inside the connector directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataFiles {
    pub readme: String,
    pub n8n_workflow: String,
    pub element_template: String,
    pub example_bpmn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_bpmn: Option<String>,
}

impl MetadataFiles {
    /// File names of a single-operation connector
    pub fn single(connector_id: &str) -> Self {
        MetadataFiles {
            readme: README_FILE.to_string(),
            n8n_workflow: format!("{connector_id}.n8n.json"),
            element_template: format!("{connector_id}.element.json"),
            example_bpmn: format!("{connector_id}.bpmn"),
            setup_bpmn: None,
        }
    }

    /// File names of a multi-operation connector
    pub fn multi(node_id: &str) -> Self {
        MetadataFiles {
            readme: README_FILE.to_string(),
            n8n_workflow: format!("{node_id}-template.n8n.json"),
            element_template: format!("{node_id}.element.json"),
            example_bpmn: format!("{node_id}-example.bpmn"),
            setup_bpmn: Some(format!("{node_id}-setup.bpmn")),
        }
    }

    /// Every referenced file name
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![
            self.readme.as_str(),
            self.n8n_workflow.as_str(),
            self.element_template.as_str(),
            self.example_bpmn.as_str(),
        ];
        if let Some(setup) = &self.setup_bpmn {
            names.push(setup);
        }
        names
    }
}

/// Category of a single-operation connector, derived from the service name when unset
pub fn schema_category(schema: &OperationSchema) -> String {
    if schema.category.trim().is_empty() {
        determine_category(&schema.node_name).to_string()
    } else {
        schema.category.clone()
    }
}

/// Category of a multi-operation connector, derived from the service name when unset
pub fn multi_schema_category(schema: &MultiOperationSchema) -> String {
    if schema.category.trim().is_empty() {
        determine_category(&schema.node_name).to_string()
    } else {
        schema.category.clone()
    }
}

/// Quality tier from summed complexity weights
///
/// Choice parameters weigh 1, nested and JSON parameters 3, and more than one
/// credential type adds 2. Sums up to 2 are tier 1, up to 5 tier 2.
pub fn quality_tier(parameters: &[OperationParameter], credentials: &[String]) -> u8 {
    let mut score: u32 = parameters
        .iter()
        .map(|p| {
            if p.kind.is_nested() {
                3
            } else if p.kind.is_choice() {
                1
            } else {
                0
            }
        })
        .sum();
    if credentials.len() > 1 {
        score += 2;
    }
    match score {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    }
}

/// Metadata for a single-operation connector at `version`
pub fn generate_metadata(schema: &OperationSchema, version: &str) -> ConnectorMetadata {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);
    let category = schema_category(schema);
    let tags = if schema.tags.is_empty() {
        generate_tags(&schema.node_id, &schema.resource, &schema.operation, &category)
    } else {
        schema.tags.clone()
    };
    let color = if schema.color.is_empty() {
        service_color(&schema.node_name).to_string()
    } else {
        schema.color.clone()
    };

    ConnectorMetadata {
        id: id.clone(),
        name: schema.display_name.clone(),
        description: schema.description.clone(),
        version: version.to_string(),
        kind: "integration".to_string(),
        multi_operation: false,
        operation_count: None,
        resources: Vec::new(),
        category,
        subcategory: Some(schema.subcategory.clone()).filter(|s| !s.is_empty()),
        icon: format!("ph-{}-logo", schema.node_id),
        color,
        tags,
        source: Some(MetadataSource {
            kind: "n8n".to_string(),
            node: schema.node_id.clone(),
            resource: schema.resource.clone(),
            operation: schema.operation.clone(),
            version: "1.0".to_string(),
        }),
        credentials: Vec::new(),
        quality: QualityRecord::generated(quality_tier(&schema.parameters, &schema.credentials)),
        authentication: (!schema.credentials.is_empty()).then(|| "api-key".to_string()),
        featured: false,
        created_at: Utc::now(),
        files: MetadataFiles::single(&id),
    }
}

/// Metadata for a multi-operation connector at `version`
///
/// The quality tier is the highest tier among the included operations.
pub fn generate_multi_metadata(schema: &MultiOperationSchema, version: &str) -> ConnectorMetadata {
    let tier = schema
        .operations()
        .map(|(_, op)| op.tier)
        .max()
        .unwrap_or(1);
    let icon = schema
        .icon
        .clone()
        .filter(|icon| !icon.is_empty())
        .unwrap_or_else(|| service_icon(&schema.node_id).to_string());
    let color = if schema.color.is_empty() {
        service_color(&schema.node_name).to_string()
    } else {
        schema.color.clone()
    };

    ConnectorMetadata {
        id: schema.node_id.clone(),
        name: schema.display_name.clone(),
        description: schema.description.clone(),
        version: version.to_string(),
        kind: "integration".to_string(),
        multi_operation: true,
        operation_count: Some(schema.operation_count()),
        resources: schema.resources.iter().map(|r| r.name.clone()).collect(),
        category: multi_schema_category(schema),
        subcategory: None,
        icon,
        color,
        tags: schema.tags.clone(),
        source: None,
        credentials: schema.credentials.clone(),
        quality: QualityRecord::generated(tier),
        authentication: (!schema.credentials.is_empty()).then(|| "api-key".to_string()),
        featured: false,
        created_at: Utc::now(),
        files: MetadataFiles::multi(&schema.node_id),
    }
}

pub fn to_json(metadata: &ConnectorMetadata) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}
