//! # connector-gen
//!
//! **connector-gen** turns one canonical description of a third-party service
//! operation into the set of documents a Catalyst connector is made of:
//!
//! - a Camunda element template (`*.element.json`) rendering the task form,
//! - an n8n workflow (`*.n8n.json`) executing the call behind a webhook,
//! - an example BPMN process and, for multi-operation connectors, a setup wizard,
//! - a `README.md` and a `connector.json` metadata document.
//!
//! Every document is derived from the same [`schema::OperationSchema`] (or its
//! multi-operation superset [`schema::MultiOperationSchema`]) so identifiers,
//! parameter names and default values stay consistent across formats.
//!
//! ## Architecture
//!
//! - **[`naming`]** - identifier derivation (connector id, template id, webhook path)
//! - **[`type_map`]** - parameter type to form field mapping, payload/output mapping,
//!   category/color/tag/icon classifiers
//! - **[`schema`]** - typed operation schemas with boundary validation
//! - **[`registry`]** - the catalog of known services and the typed extraction path
//! - **[`generator`]** - pure document generators plus the on-disk orchestrator
//! - **[`audit`]** - structural checks over generated documents
//! - **[`manifest`]** - catalog manifest over a generated connector tree
//! - **[`config`]**, **[`logging`]**, **[`cli`]** - ambient plumbing for the binary
//!
//! ## Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(connector-gen)
//!     participant Registry as registry::NodeRegistry
//!     participant Gen as generator
//!     participant FS as File System
//!
//!     CLI->>Registry: get_node_operation("slack", "send")
//!     Registry-->>CLI: OperationSchema
//!     CLI->>Gen: generate_connector(&schema, &options)
//!     Gen->>Gen: render element / workflow / bpmn / readme / metadata
//!     Gen->>FS: back up previous .bpmn and .n8n.json
//!     Gen->>FS: stage + persist all documents
//!     Gen-->>CLI: GeneratedFiles
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use connector_gen::generator::{generate_connector, GeneratorOptions};
//! use connector_gen::registry::NodeRegistry;
//!
//! let registry = NodeRegistry::with_builtin()?;
//! let schema = registry.get_node_operation("slack", "send")?;
//! let options = GeneratorOptions::new("connectors/generated");
//! let result = generate_connector(schema, &options)?;
//! println!("wrote {} files to {}", result.files.len(), result.directory.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod registry;
pub mod schema;
pub mod type_map;

pub use error::RegistryError;
pub use generator::{
    generate_connector, generate_connectors, generate_multi_connector, preview_connector,
    GeneratedFiles, GeneratorOptions,
};
pub use registry::NodeRegistry;
pub use schema::{MultiOperationSchema, OperationParameter, OperationSchema, ParameterType};
