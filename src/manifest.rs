//! Catalog manifest over a generated connector tree.
//!
//! Scans `<root>/<category>/<connector>/connector.json` and collects every
//! valid metadata document into a single manifest, with `path` and `category`
//! taken from the folder layout rather than from the document itself.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const MANIFEST_VERSION: &str = "1.0.0";

/// Fields a metadata document needs to be listed
const REQUIRED_FIELDS: [&str; 3] = ["id", "name", "description"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub stats: ManifestStats,
    /// Metadata documents, sorted by category then folder
    pub connectors: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStats {
    pub total_connectors: usize,
    pub multi_operation: usize,
    pub by_category: BTreeMap<String, usize>,
}

/// Connector folder left out of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConnector {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ManifestReport {
    pub manifest: Manifest,
    pub skipped: Vec<SkippedConnector>,
}

fn sorted_dirs(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and check one connector folder
fn read_connector(folder: &Path, category: &str) -> Result<Map<String, Value>, String> {
    let metadata_path = folder.join("connector.json");
    if !metadata_path.is_file() {
        return Err("no connector.json".to_string());
    }
    let contents = fs::read_to_string(&metadata_path).map_err(|e| e.to_string())?;
    let value: Value =
        serde_json::from_str(&contents).map_err(|e| format!("invalid connector.json: {e}"))?;
    let Value::Object(mut metadata) = value else {
        return Err("connector.json is not an object".to_string());
    };
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| {
            metadata
                .get(*f)
                .and_then(Value::as_str)
                .map_or(true, str::is_empty)
        })
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    metadata.insert(
        "path".to_string(),
        Value::from(format!("{category}/{}", file_name(folder))),
    );
    metadata.insert("category".to_string(), Value::from(category));
    Ok(metadata)
}

/// Build a manifest of every connector under `root`
///
/// Invalid connector folders are skipped with a warning and reported in
/// [`ManifestReport::skipped`].
pub fn build_manifest(root: &Path) -> anyhow::Result<ManifestReport> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut connectors = Vec::new();
    let mut skipped = Vec::new();
    let mut stats = ManifestStats::default();

    for category_dir in sorted_dirs(root)? {
        let category = file_name(&category_dir);
        for folder in sorted_dirs(&category_dir)? {
            match read_connector(&folder, &category) {
                Ok(metadata) => {
                    stats.total_connectors += 1;
                    if metadata.get("multiOperation").and_then(Value::as_bool) == Some(true) {
                        stats.multi_operation += 1;
                    }
                    *stats.by_category.entry(category.clone()).or_default() += 1;
                    connectors.push(Value::Object(metadata));
                }
                Err(reason) => {
                    warn!(folder = %folder.display(), %reason, "Skipping connector");
                    skipped.push(SkippedConnector {
                        path: folder,
                        reason,
                    });
                }
            }
        }
    }

    Ok(ManifestReport {
        manifest: Manifest {
            version: MANIFEST_VERSION.to_string(),
            generated_at: Utc::now(),
            stats,
            connectors,
        },
        skipped,
    })
}

/// Write a manifest as pretty JSON, creating the parent directory
pub fn write_manifest(manifest: &Manifest, output: &Path) -> anyhow::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))
}
