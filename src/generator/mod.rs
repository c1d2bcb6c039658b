//! # Generator Module
//!
//! Turns operation schemas into connector documents and writes them to disk.
//!
//! ## Overview
//!
//! Each document format has its own pure generator; none of them touch the
//! filesystem:
//!
//! - **[`element_template`]** - Camunda element template (`*.element.json`)
//! - **[`workflow`]** - n8n webhook workflow (`*.n8n.json`)
//! - **[`bpmn`]** - example process and setup wizard (`*.bpmn`)
//! - **[`docs`]** - `README.md`, built in or from a custom template
//! - **[`metadata`]** - `connector.json`
//!
//! The orchestrator in [`connector`] renders every document in memory,
//! computes the next metadata version, backs up previously generated
//! diagrams and workflows, then stages and persists the whole set.
//!
//! ## Generated Structure
//!
//! Single-operation connector:
//!
//! ```text
//! <output_dir>/<category>/<connector-id>/
//! ├── <connector-id>.element.json
//! ├── <connector-id>.n8n.json
//! ├── <connector-id>.bpmn
//! ├── README.md
//! └── connector.json
//! ```
//!
//! Multi-operation connector:
//!
//! ```text
//! <output_dir>/<category>/<node-id>/
//! ├── <node-id>.element.json
//! ├── <node-id>-template.n8n.json
//! ├── <node-id>-example.bpmn
//! ├── <node-id>-setup.bpmn
//! ├── README.md
//! └── connector.json
//! ```
//!
//! Regenerating a connector over an existing `connector.json` bumps the patch
//! version and, unless `force` is set, leaves `*.backup-<timestamp>` copies of
//! the diagrams and workflow next to the new files.
//!
//! ## Programmatic Usage
//!
//! ```rust,no_run
//! use connector_gen::generator::{generate_multi_connector, GeneratorOptions};
//! use connector_gen::registry::NodeRegistry;
//!
//! let registry = NodeRegistry::with_builtin()?;
//! let schema = registry.extract_node_schema("gmail")?.filter_by_tier(2);
//! let options = GeneratorOptions::new("connectors/generated").with_dry_run(true);
//! let result = generate_multi_connector(&schema, &options)?;
//! assert!(result.dry_run);
//! # Ok::<(), anyhow::Error>(())
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub mod bpmn;
pub mod connector;
pub mod docs;
pub mod element_template;
pub mod metadata;
mod templates;
pub mod workflow;


pub use connector::{
    compare_connector, generate_connector, generate_connectors, generate_multi_connector,
    preview_connector, preview_multi_connector, Comparison, ConnectorPreview, CountPair,
};

/// Options shared by every generation entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Root of the generated tree; connectors land in `<output_dir>/<category>/<id>`
    pub output_dir: PathBuf,
    /// Overwrite without leaving backups of the previous diagrams and workflow
    pub force: bool,
    /// Render everything and report the result without touching the filesystem
    pub dry_run: bool,
    /// Custom minijinja README template
    pub readme_template: Option<PathBuf>,
}

impl GeneratorOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        GeneratorOptions {
            output_dir: output_dir.into(),
            force: false,
            dry_run: false,
            readme_template: None,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_readme_template(mut self, template: Option<PathBuf>) -> Self {
        self.readme_template = template;
        self
    }
}

/// A degraded-mode fallback taken during generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationWarning {
    /// Parameter type outside the known vocabulary, rendered as a plain string field
    #[serde(rename_all = "camelCase")]
    UnknownParameterType { parameter: String, type_name: String },
    /// Existing `connector.json` could not be read for a version bump
    #[serde(rename_all = "camelCase")]
    MalformedMetadata {
        path: PathBuf,
        reason: String,
        fallback_version: String,
    },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationWarning::UnknownParameterType {
                parameter,
                type_name,
            } => write!(
                f,
                "Parameter '{parameter}' has unknown type '{type_name}', using a String field"
            ),
            GenerationWarning::MalformedMetadata {
                path,
                reason,
                fallback_version,
            } => write!(
                f,
                "Could not read existing metadata {} ({reason}), using version {fallback_version}",
                path.display()
            ),
        }
    }
}

/// Which document of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    ElementTemplate,
    Workflow,
    ExampleBpmn,
    SetupBpmn,
    Readme,
    Metadata,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::ElementTemplate => "Element Template",
            DocumentKind::Workflow => "n8n Workflow",
            DocumentKind::ExampleBpmn => "BPMN Example",
            DocumentKind::SetupBpmn => "Setup BPMN",
            DocumentKind::Readme => "README",
            DocumentKind::Metadata => "Connector Metadata",
        }
    }
}

/// One rendered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub kind: DocumentKind,
    /// File name inside the connector directory
    pub filename: String,
    pub contents: String,
}

/// Result of generating one connector
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFiles {
    /// Connector identifier (the node id for multi-operation connectors)
    pub connector_id: String,
    /// Connector directory
    pub directory: PathBuf,
    /// File names inside `directory`, in write order
    pub files: Vec<String>,
    /// Version recorded in `connector.json`
    pub version: String,
    /// Backup copies made before overwriting
    pub backups: Vec<PathBuf>,
    pub warnings: Vec<GenerationWarning>,
    /// Nothing was written
    pub dry_run: bool,
}

/// Outcome of one schema in a batch
#[derive(Debug)]
pub struct BatchItem {
    pub node_id: String,
    pub operation: String,
    /// Generated files, or the error chain rendered as a message
    pub outcome: Result<GeneratedFiles, String>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
