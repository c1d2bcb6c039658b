//! Connector orchestration: render every document, version, back up, write.

use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

use crate::naming::sanitize_filename;
use crate::schema::{MultiOperationSchema, OperationSchema};

use super::bpmn::{generate_example_bpmn, generate_multi_example_bpmn, generate_setup_bpmn};
use super::docs::{
    generate_multi_readme, generate_readme, multi_readme_context, readme_context,
    render_custom_readme,
};
use super::element_template::{
    self, generate_element_template, generate_multi_element_template, parameter_warnings,
};
use super::metadata::{
    self, generate_metadata, generate_multi_metadata, multi_schema_category, schema_category,
    MetadataFiles, DEFAULT_MULTI_VERSION, DEFAULT_VERSION, METADATA_FILE,
};
use super::workflow::{self, generate_multi_workflow, generate_workflow};
use super::{BatchItem, Document, DocumentKind, GeneratedFiles, GenerationWarning, GeneratorOptions};

/// Every document of a connector, rendered in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorPreview {
    pub connector_id: String,
    /// Documents in write order
    pub documents: Vec<Document>,
    pub warnings: Vec<GenerationWarning>,
}

impl ConnectorPreview {
    pub fn document(&self, kind: DocumentKind) -> Option<&Document> {
        self.documents.iter().find(|d| d.kind == kind)
    }
}

/// Generated vs. existing count for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountPair {
    pub generated: usize,
    pub existing: usize,
}

impl CountPair {
    pub fn matches(&self) -> bool {
        self.generated == self.existing
    }
}

/// Structural comparison against a previously generated connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub connector_id: String,
    /// Element template property counts; `None` when no existing template was found
    pub element: Option<CountPair>,
    /// Workflow node counts; `None` when no existing workflow was found
    pub workflow: Option<CountPair>,
}

#[derive(Debug, Deserialize)]
struct ExistingMetadata {
    version: String,
}

/// Increment the patch component of `major.minor.patch`
pub fn bump_patch(version: &str) -> anyhow::Result<String> {
    let parts: Vec<&str> = version.trim().split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        anyhow::bail!("'{version}' is not a major.minor.patch version");
    };
    let major: u64 = major.parse().with_context(|| format!("invalid major in '{version}'"))?;
    let minor: u64 = minor.parse().with_context(|| format!("invalid minor in '{version}'"))?;
    let patch: u64 = patch.parse().with_context(|| format!("invalid patch in '{version}'"))?;
    Ok(format!("{major}.{minor}.{}", patch + 1))
}

fn read_bumped_version(path: &Path) -> anyhow::Result<String> {
    let contents = fs::read_to_string(path)?;
    let existing: ExistingMetadata = serde_json::from_str(&contents)?;
    let next = bump_patch(&existing.version)?;
    debug!(from = %existing.version, to = %next, "Bumping connector version");
    Ok(next)
}

/// Version for the next generation at `metadata_path`
///
/// Absent metadata yields `default`; unreadable metadata yields `default`
/// plus a [`GenerationWarning::MalformedMetadata`].
pub fn next_version(metadata_path: &Path, default: &str) -> (String, Option<GenerationWarning>) {
    if !metadata_path.exists() {
        return (default.to_string(), None);
    }
    match read_bumped_version(metadata_path) {
        Ok(version) => (version, None),
        Err(err) => {
            let warning = GenerationWarning::MalformedMetadata {
                path: metadata_path.to_path_buf(),
                reason: format!("{err:#}"),
                fallback_version: default.to_string(),
            };
            warn!(path = %metadata_path.display(), error = %err, "Could not read existing metadata, using version {default}");
            (default.to_string(), Some(warning))
        }
    }
}

/// `2024-05-01T10-20-30-123Z`: ISO 8601 with `:` and `.` replaced by `-`
pub fn backup_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

fn render_readme(
    built_in: impl FnOnce() -> anyhow::Result<String>,
    context: impl FnOnce() -> Value,
    template: Option<&Path>,
) -> anyhow::Result<String> {
    match template {
        Some(path) => render_custom_readme(path, &context()),
        None => built_in(),
    }
}

fn document(kind: DocumentKind, filename: &str, contents: String) -> Document {
    debug!(kind = kind.label(), file = filename, bytes = contents.len(), "Rendered document");
    Document {
        kind,
        filename: filename.to_string(),
        contents,
    }
}

fn render_single(
    schema: &OperationSchema,
    version: &str,
    readme_template: Option<&Path>,
) -> anyhow::Result<ConnectorPreview> {
    let id = schema.connector_id();
    let files = MetadataFiles::single(&id);

    let element = element_template::to_json(&generate_element_template(schema))
        .context("Failed to render element template")?;
    let flow = workflow::to_json(&generate_workflow(schema)).context("Failed to render workflow")?;
    let bpmn = generate_example_bpmn(schema).context("Failed to render example BPMN")?;
    let readme = render_readme(
        || generate_readme(schema),
        || readme_context(schema),
        readme_template,
    )
    .context("Failed to render README")?;
    let meta = metadata::to_json(&generate_metadata(schema, version))
        .context("Failed to render connector metadata")?;

    Ok(ConnectorPreview {
        connector_id: id,
        documents: vec![
            document(DocumentKind::ElementTemplate, &files.element_template, element),
            document(DocumentKind::Workflow, &files.n8n_workflow, flow),
            document(DocumentKind::ExampleBpmn, &files.example_bpmn, bpmn),
            document(DocumentKind::Readme, &files.readme, readme),
            document(DocumentKind::Metadata, METADATA_FILE, meta),
        ],
        warnings: parameter_warnings(&schema.parameters),
    })
}

fn render_multi(
    schema: &MultiOperationSchema,
    version: &str,
    readme_template: Option<&Path>,
) -> anyhow::Result<ConnectorPreview> {
    let files = MetadataFiles::multi(&schema.node_id);
    let setup_file = files
        .setup_bpmn
        .clone()
        .unwrap_or_else(|| format!("{}-setup.bpmn", schema.node_id));

    let element = element_template::to_json(&generate_multi_element_template(schema))
        .context("Failed to render element template")?;
    let flow =
        workflow::to_json(&generate_multi_workflow(schema)).context("Failed to render workflow")?;
    let example = generate_multi_example_bpmn(schema).context("Failed to render example BPMN")?;
    let setup = generate_setup_bpmn(schema).context("Failed to render setup BPMN")?;
    let readme = render_readme(
        || generate_multi_readme(schema),
        || multi_readme_context(schema),
        readme_template,
    )
    .context("Failed to render README")?;
    let meta = metadata::to_json(&generate_multi_metadata(schema, version))
        .context("Failed to render connector metadata")?;

    let mut seen = HashSet::new();
    let warnings = parameter_warnings(
        schema
            .operations()
            .flat_map(|(_, op)| op.parameters.iter())
            .filter(|p| seen.insert(p.name.as_str())),
    );

    Ok(ConnectorPreview {
        connector_id: schema.node_id.clone(),
        documents: vec![
            document(DocumentKind::ElementTemplate, &files.element_template, element),
            document(DocumentKind::Workflow, &files.n8n_workflow, flow),
            document(DocumentKind::ExampleBpmn, &files.example_bpmn, example),
            document(DocumentKind::SetupBpmn, &setup_file, setup),
            document(DocumentKind::Readme, &files.readme, readme),
            document(DocumentKind::Metadata, METADATA_FILE, meta),
        ],
        warnings,
    })
}

/// Every document of a single-operation connector at the initial version
///
/// Uses the built-in README and never touches the filesystem.
pub fn preview_connector(schema: &OperationSchema) -> anyhow::Result<ConnectorPreview> {
    schema.validate()?;
    render_single(schema, DEFAULT_VERSION, None)
}

/// Every document of a multi-operation connector at the initial version
pub fn preview_multi_connector(schema: &MultiOperationSchema) -> anyhow::Result<ConnectorPreview> {
    schema.validate()?;
    render_multi(schema, DEFAULT_MULTI_VERSION, None)
}

/// Copy `names` that exist in `directory` to `<name>.backup-<timestamp>`
fn backup_existing(directory: &Path, names: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let timestamp = backup_timestamp();
    let mut backups = Vec::new();
    for name in names {
        let source = directory.join(name);
        if !source.exists() {
            continue;
        }
        let target = directory.join(format!("{name}.backup-{timestamp}"));
        fs::copy(&source, &target).with_context(|| {
            format!("Failed to back up {} to {}", source.display(), target.display())
        })?;
        debug!(backup = %target.display(), "Created backup");
        backups.push(target);
    }
    Ok(backups)
}

/// Temporary file created with the mode `fs::write` would give (0o666 minus umask)
#[cfg(unix)]
fn staging_file(directory: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(directory)
}

#[cfg(not(unix))]
fn staging_file(directory: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().tempfile_in(directory)
}

/// Write every document to a temporary file in `directory`, then persist them all
///
/// Nothing is renamed into place until every temporary file has been written,
/// so a failure while writing leaves the previous documents untouched.
fn write_documents(directory: &Path, documents: &[Document]) -> anyhow::Result<()> {
    let mut staged = Vec::with_capacity(documents.len());
    for doc in documents {
        let mut tmp = staging_file(directory)
            .with_context(|| format!("Failed to create temporary file in {}", directory.display()))?;
        tmp.write_all(doc.contents.as_bytes())
            .with_context(|| format!("Failed to stage {}", doc.filename))?;
        staged.push((tmp, directory.join(&doc.filename)));
    }
    for (tmp, path) in staged {
        tmp.persist(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Version, back up, and write a rendered connector
fn emit(
    rendered: ConnectorPreview,
    directory: PathBuf,
    version: String,
    mut warnings: Vec<GenerationWarning>,
    backup_names: &[&str],
    options: &GeneratorOptions,
) -> anyhow::Result<GeneratedFiles> {
    warnings.extend(rendered.warnings);
    for warning in &warnings {
        if let GenerationWarning::UnknownParameterType { .. } = warning {
            warn!(connector = %rendered.connector_id, "{warning}");
        }
    }

    let files: Vec<String> = rendered.documents.iter().map(|d| d.filename.clone()).collect();
    let mut backups = Vec::new();

    if options.dry_run {
        info!(connector = %rendered.connector_id, directory = %directory.display(), "Dry run, nothing written");
    } else {
        fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create {}", directory.display()))?;
        if directory.join(METADATA_FILE).exists() && !options.force {
            backups = backup_existing(&directory, backup_names)?;
        }
        write_documents(&directory, &rendered.documents)?;
        info!(
            connector = %rendered.connector_id,
            directory = %directory.display(),
            version = %version,
            files = files.len(),
            "Connector written"
        );
    }

    Ok(GeneratedFiles {
        connector_id: rendered.connector_id,
        directory,
        files,
        version,
        backups,
        warnings,
        dry_run: options.dry_run,
    })
}

/// Generate one single-operation connector into `<output_dir>/<category>/<connector-id>/`
///
/// An existing `connector.json` bumps the patch version. Unless `force` is
/// set, the previous BPMN and workflow are copied to timestamped backups first.
/// In dry-run mode the same result is returned without touching the filesystem.
pub fn generate_connector(
    schema: &OperationSchema,
    options: &GeneratorOptions,
) -> anyhow::Result<GeneratedFiles> {
    schema.validate()?;
    let id = schema.connector_id();
    let directory = options
        .output_dir
        .join(sanitize_filename(&schema_category(schema)))
        .join(&id);

    let (version, warning) = next_version(&directory.join(METADATA_FILE), DEFAULT_VERSION);
    let rendered = render_single(schema, &version, options.readme_template.as_deref())
        .with_context(|| format!("Failed to render connector {id}"))?;

    let files = MetadataFiles::single(&id);
    emit(
        rendered,
        directory,
        version,
        warning.into_iter().collect(),
        &[files.example_bpmn.as_str(), files.n8n_workflow.as_str()],
        options,
    )
}

/// Generate a multi-operation connector into `<output_dir>/<category>/<node-id>/`
pub fn generate_multi_connector(
    schema: &MultiOperationSchema,
    options: &GeneratorOptions,
) -> anyhow::Result<GeneratedFiles> {
    schema.validate()?;
    if schema.operation_count() == 0 {
        anyhow::bail!("'{}' has no operations to generate", schema.node_id);
    }
    let directory = options
        .output_dir
        .join(sanitize_filename(&multi_schema_category(schema)))
        .join(&schema.node_id);

    let (version, warning) = next_version(&directory.join(METADATA_FILE), DEFAULT_MULTI_VERSION);
    let rendered = render_multi(schema, &version, options.readme_template.as_deref())
        .with_context(|| format!("Failed to render connector {}", schema.node_id))?;

    let files = MetadataFiles::multi(&schema.node_id);
    let mut backup_names = vec![files.example_bpmn.as_str(), files.n8n_workflow.as_str()];
    if let Some(setup) = &files.setup_bpmn {
        backup_names.push(setup);
    }
    emit(
        rendered,
        directory,
        version,
        warning.into_iter().collect(),
        &backup_names,
        options,
    )
}

/// Generate every schema, collecting one outcome per schema
///
/// A failing schema is logged and recorded; the batch continues.
pub fn generate_connectors(schemas: &[OperationSchema], options: &GeneratorOptions) -> Vec<BatchItem> {
    schemas
        .iter()
        .map(|schema| {
            let outcome = generate_connector(schema, options).map_err(|err| {
                warn!(node = %schema.node_id, operation = %schema.operation, error = %format!("{err:#}"), "Connector generation failed");
                format!("{}/{}: {err:#}", schema.node_id, schema.operation)
            });
            if let Ok(generated) = &outcome {
                debug!(connector = %generated.connector_id, "Generated");
            }
            BatchItem {
                node_id: schema.node_id.clone(),
                operation: schema.operation.clone(),
                outcome,
            }
        })
        .collect()
}

fn existing_count(path: &Path, key: &str) -> anyhow::Result<Option<usize>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(
        value.get(key).and_then(Value::as_array).map_or(0, Vec::len),
    ))
}

/// Compare property and node counts with the connector files in `existing_dir`
pub fn compare_connector(schema: &OperationSchema, existing_dir: &Path) -> anyhow::Result<Comparison> {
    let id = schema.connector_id();
    let files = MetadataFiles::single(&id);
    let generated_properties = generate_element_template(schema).properties.len();
    let generated_nodes = generate_workflow(schema).nodes.len();

    let element = existing_count(&existing_dir.join(&files.element_template), "properties")?
        .map(|existing| CountPair {
            generated: generated_properties,
            existing,
        });
    let workflow = existing_count(&existing_dir.join(&files.n8n_workflow), "nodes")?.map(
        |existing| CountPair {
            generated: generated_nodes,
            existing,
        },
    );

    Ok(Comparison {
        connector_id: id,
        element,
        workflow,
    })
}
