//! # Audit Module
//!
//! Read-only consistency checks over generated connector documents.
//!
//! ## Checks Performed
//!
//! Element templates (`*.element.json`):
//!
//! 1. **Property completeness** - every property has a label, a type and a binding
//! 2. **Unique ids** - no two properties share an `id`
//! 3. **Condition references** - every `condition.property` names an existing property id
//! 4. **Condition shape** - `simple` carries `equals`, `oneOf` a non-empty value list
//! 5. **Operation groups** - properties in `group-*` groups must be conditional
//! 6. **Groups** - property groups are declared in `groups`
//! 7. **Descriptions** - required input parameters should describe themselves
//!    (a warning); optional ones without a description are reported as info
//!
//! Metadata (`connector.json`): required `id`, `name`, `description` and
//! `version`, and every file listed under `files` exists next to it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use connector_gen::audit::{audit_directory, print_audit_issues};
//! use std::path::Path;
//!
//! let report = audit_directory(Path::new("connectors/generated"))?;
//! print_audit_issues(&report.issues);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Context;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

#[cfg(test)]
mod tests;

const ELEMENT_SUFFIX: &str = ".element.json";
const METADATA_FILE: &str = "connector.json";

/// Severity level for audit issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The document is inconsistent and will misbehave downstream
    Error,
    /// Likely a problem, the document still loads
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// An issue found in a generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditIssue {
    /// Where the issue occurred (e.g. "slack.element.json: properties[3] (param_text)")
    pub location: String,
    pub severity: Severity,
    /// Type of issue (e.g. "duplicate_id", "orphaned_condition")
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl AuditIssue {
    pub fn new(
        location: impl Into<String>,
        severity: Severity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AuditIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Result of auditing a file or a directory tree
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Documents audited
    pub files_checked: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn error_count(&self) -> usize {
        count(&self.issues, Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        count(&self.issues, Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.issues)
    }
}

fn count(issues: &[AuditIssue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

pub fn has_errors(issues: &[AuditIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn property_location(source: &str, index: usize, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{source}: properties[{index}] ({id})"),
        None => format!("{source}: properties[{index}]"),
    }
}

/// Audit one element template document
///
/// `source` names the document in issue locations.
pub fn audit_element_template(template: &Value, source: &str) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let Some(properties) = template.get("properties").and_then(Value::as_array) else {
        issues.push(AuditIssue::new(
            source,
            Severity::Error,
            "missing_properties",
            "Element template has no properties array",
        ));
        return issues;
    };

    let declared_groups: HashSet<&str> = template
        .get("groups")
        .and_then(Value::as_array)
        .map(|groups| groups.iter().filter_map(|g| non_empty_str(g, "id")).collect())
        .unwrap_or_default();

    let mut ids = HashSet::new();
    for (index, property) in properties.iter().enumerate() {
        let id = non_empty_str(property, "id");
        if let Some(id) = id {
            if !ids.insert(id) {
                issues.push(
                    AuditIssue::new(
                        property_location(source, index, Some(id)),
                        Severity::Error,
                        "duplicate_id",
                        format!("Property id '{id}' is used more than once"),
                    )
                    .with_suggestion("Give every property a unique id"),
                );
            }
        }
    }

    for (index, property) in properties.iter().enumerate() {
        let location = property_location(source, index, non_empty_str(property, "id"));
        audit_property(property, &location, &ids, &declared_groups, &mut issues);
    }
    issues
}

fn audit_property(
    property: &Value,
    location: &str,
    ids: &HashSet<&str>,
    declared_groups: &HashSet<&str>,
    issues: &mut Vec<AuditIssue>,
) {
    if non_empty_str(property, "label").is_none() {
        issues.push(AuditIssue::new(
            location,
            Severity::Error,
            "missing_label",
            "Property has no label",
        ));
    }
    if non_empty_str(property, "type").is_none() {
        issues.push(AuditIssue::new(
            location,
            Severity::Error,
            "missing_type",
            "Property has no type",
        ));
    }
    let binding = property.get("binding");
    let bound = binding.is_some_and(|b| {
        non_empty_str(b, "type").is_some() && non_empty_str(b, "name").is_some()
    });
    if !bound {
        issues.push(
            AuditIssue::new(
                location,
                Severity::Error,
                "missing_binding",
                "Property binding needs a type and a name",
            )
            .with_suggestion("Bind the property to a camunda:inputParameter"),
        );
    }

    let group = non_empty_str(property, "group");
    let condition = property.get("condition");
    if let Some(group) = group {
        if !declared_groups.contains(group) {
            issues.push(AuditIssue::new(
                location,
                Severity::Warning,
                "unknown_group",
                format!("Group '{group}' is not declared in groups"),
            ));
        }
        if group.starts_with("group-") && condition.is_none() {
            issues.push(
                AuditIssue::new(
                    location,
                    Severity::Error,
                    "unconditioned_operation_property",
                    format!("Property in operation group '{group}' has no condition"),
                )
                .with_suggestion("Condition the property on the operation selector"),
            );
        }
        if group == "input" && non_empty_str(property, "description").is_none() {
            let severity = if is_required(property) {
                Severity::Warning
            } else {
                Severity::Info
            };
            issues.push(AuditIssue::new(
                location,
                severity,
                "missing_description",
                "Input parameter has no description",
            ));
        }
    }

    if let Some(condition) = condition {
        audit_condition(condition, location, ids, issues);
    }
}

fn is_required(property: &Value) -> bool {
    property
        .pointer("/constraints/notEmpty")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn audit_condition(
    condition: &Value,
    location: &str,
    ids: &HashSet<&str>,
    issues: &mut Vec<AuditIssue>,
) {
    match non_empty_str(condition, "property") {
        Some(target) if !ids.contains(target) => issues.push(
            AuditIssue::new(
                location,
                Severity::Error,
                "orphaned_condition",
                format!("Condition references unknown property '{target}'"),
            )
            .with_suggestion("Reference the id of an existing property"),
        ),
        Some(_) => {}
        None => issues.push(AuditIssue::new(
            location,
            Severity::Error,
            "orphaned_condition",
            "Condition has no property",
        )),
    }

    match condition.get("type").and_then(Value::as_str) {
        Some("simple") => {
            if condition.get("equals").map_or(true, Value::is_null) {
                issues.push(AuditIssue::new(
                    location,
                    Severity::Error,
                    "missing_equals",
                    "Simple condition has no equals value",
                ));
            }
        }
        Some("oneOf") => {
            let values = condition.get("oneOf").and_then(Value::as_array);
            if values.map_or(true, Vec::is_empty) {
                issues.push(AuditIssue::new(
                    location,
                    Severity::Error,
                    "empty_one_of",
                    "oneOf condition has no values",
                ));
            }
        }
        other => issues.push(AuditIssue::new(
            location,
            Severity::Error,
            "unknown_condition",
            format!("Unsupported condition type {}", other.unwrap_or("(none)")),
        )),
    }
}

/// Audit one `connector.json` document located in `directory`
pub fn audit_metadata(metadata: &Value, directory: &Path, source: &str) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    for field in ["id", "name", "description", "version"] {
        if non_empty_str(metadata, field).is_none() {
            issues.push(AuditIssue::new(
                source,
                Severity::Error,
                "missing_field",
                format!("Metadata has no '{field}'"),
            ));
        }
    }

    match metadata.get("files").and_then(Value::as_object) {
        Some(files) => {
            for (key, name) in files {
                let Some(name) = name.as_str() else {
                    continue;
                };
                if !directory.join(name).is_file() {
                    issues.push(
                        AuditIssue::new(
                            format!("{source}: files.{key}"),
                            Severity::Error,
                            "missing_file",
                            format!("Referenced file '{name}' does not exist"),
                        )
                        .with_suggestion("Regenerate the connector"),
                    );
                }
            }
        }
        None => issues.push(AuditIssue::new(
            source,
            Severity::Warning,
            "missing_files",
            "Metadata does not list its files",
        )),
    }
    issues
}

fn is_element_template(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(ELEMENT_SUFFIX))
}

fn is_metadata(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(METADATA_FILE)
}

/// Audit a single element template or `connector.json` file
///
/// Unreadable JSON is reported as an `invalid_json` issue.
pub fn audit_file(path: &Path) -> anyhow::Result<Vec<AuditIssue>> {
    let source = path.display().to_string();
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {source}"))?;
    let value: Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(err) => {
            return Ok(vec![AuditIssue::new(
                source,
                Severity::Error,
                "invalid_json",
                format!("Not valid JSON: {err}"),
            )])
        }
    };
    if is_metadata(path) {
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(audit_metadata(&value, directory, &source))
    } else {
        Ok(audit_element_template(&value, &source))
    }
}

/// Audit every element template and `connector.json` under `root`
///
/// `root` may also be a single file.
pub fn audit_directory(root: &Path) -> anyhow::Result<AuditReport> {
    let mut report = AuditReport::default();
    if root.is_file() {
        report.issues = audit_file(root)?;
        report.files_checked = 1;
        return Ok(report);
    }
    if !root.is_dir() {
        anyhow::bail!("{} does not exist", root.display());
    }

    let mut paths: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_element_template(p) || is_metadata(p))
        .collect();
    paths.sort();

    for path in paths {
        tracing::debug!(file = %path.display(), "Auditing");
        report.issues.extend(audit_file(&path)?);
        report.files_checked += 1;
    }
    Ok(report)
}

/// Print audit issues grouped by severity
pub fn print_audit_issues(issues: &[AuditIssue]) {
    if issues.is_empty() {
        println!("✅ No audit issues found!");
        return;
    }

    let errors: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Error).collect();
    let warnings: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Warning).collect();
    let infos: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Info).collect();

    println!("\n📋 Audit Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (heading, group) in [
        ("❌ Errors (must fix):", &errors),
        ("⚠️  Warnings (should fix):", &warnings),
        ("ℹ️  Info:", &infos),
    ] {
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group.iter() {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}
