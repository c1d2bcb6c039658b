//! # Type Mapping
//!
//! Maps the generic parameter vocabulary onto element template field kinds and
//! renders the JSON fragments every connector shares: the request payload
//! template and the response output mapping.
//!
//! Also hosts the keyword classifiers used to derive a category, brand color,
//! tag list and icon for a service from its name. All classifiers are
//! first-match-wins over static tables with a default bucket.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::schema::{OperationParameter, ParameterType};

/// Element template field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    String,
    Text,
    Dropdown,
    Boolean,
    Hidden,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Text => "Text",
            FieldKind::Dropdown => "Dropdown",
            FieldKind::Boolean => "Boolean",
            FieldKind::Hidden => "Hidden",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a parameter type to the field kind used in element templates
///
/// Booleans become a two-choice dropdown, nested types a JSON text area.
/// Unknown types fall back to [`FieldKind::String`]; see [`is_mapped`].
pub fn map_type_to_field_kind(kind: &ParameterType) -> FieldKind {
    match kind {
        ParameterType::String | ParameterType::Number | ParameterType::DateTime => {
            FieldKind::String
        }
        ParameterType::Boolean | ParameterType::Options | ParameterType::MultiOptions => {
            FieldKind::Dropdown
        }
        ParameterType::Json | ParameterType::FixedCollection | ParameterType::Collection => {
            FieldKind::Text
        }
        ParameterType::Other(_) => FieldKind::String,
    }
}

/// `false` when [`map_type_to_field_kind`] used its fallback
pub fn is_mapped(kind: &ParameterType) -> bool {
    !matches!(kind, ParameterType::Other(_))
}

/// `${name}`
pub fn variable_expression(name: &str) -> String {
    format!("${{{name}}}")
}

/// Payload object mapping each parameter name to its `${name}` variable,
/// pretty-printed with parameter order preserved
pub fn generate_payload_template(parameters: &[OperationParameter]) -> String {
    payload_template(parameters.iter().map(|p| p.name.as_str()))
}

/// Payload template over an arbitrary ordered name list
pub fn payload_template<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut payload = Map::new();
    for name in names {
        payload.insert(name.to_string(), Value::String(variable_expression(name)));
    }
    pretty(&Value::Object(payload))
}

/// The response envelope every connector exposes
pub fn generate_output_mapping() -> String {
    let mut mapping = Map::new();
    mapping.insert("success".to_string(), Value::from("$.success"));
    mapping.insert("statusCode".to_string(), Value::from("$.statusCode"));
    mapping.insert("error".to_string(), Value::from("$.error"));
    pretty(&Value::Object(mapping))
}

fn pretty(value: &Value) -> String {
    // Serializing a Value built from strings cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "communication",
        &[
            "slack", "discord", "telegram", "teams", "whatsapp", "twilio", "mattermost", "email",
            "gmail", "outlook", "sendgrid", "mailchimp", "smtp",
        ],
    ),
    (
        "productivity",
        &["sheets", "drive", "notion", "airtable", "trello", "asana", "monday"],
    ),
    ("business", &["salesforce", "hubspot", "pipedrive", "zoho"]),
    (
        "developer-tools",
        &["github", "gitlab", "jira", "linear", "http", "webhook", "api"],
    ),
    ("data", &["postgres", "mysql", "mongodb", "supabase", "redis"]),
    ("ai", &["openai", "anthropic", "ai", "gpt", "claude"]),
];

/// Category bucket of a service, `integrations` when no keyword matches
pub fn determine_category(service: &str) -> &'static str {
    let service = service.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| service.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or("integrations")
}

const SERVICE_COLORS: &[(&str, &str)] = &[
    ("slack", "#4A154B"),
    ("discord", "#5865F2"),
    ("telegram", "#0088cc"),
    ("github", "#24292e"),
    ("gitlab", "#FC6D26"),
    ("notion", "#000000"),
    ("airtable", "#18BFFF"),
    ("trello", "#0079BF"),
    ("salesforce", "#00A1E0"),
    ("hubspot", "#FF7A59"),
    ("jira", "#0052CC"),
    ("google", "#4285F4"),
    ("microsoft", "#00A4EF"),
    ("stripe", "#635BFF"),
    ("shopify", "#96BF48"),
    ("openai", "#10a37f"),
    ("anthropic", "#d97757"),
];

pub const DEFAULT_COLOR: &str = "#6366f1";

/// Brand color of a service
pub fn service_color(service: &str) -> &'static str {
    let service = service.to_lowercase();
    SERVICE_COLORS
        .iter()
        .find(|(keyword, _)| service.contains(keyword))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Lowercased, de-duplicated tags in first-seen order
pub fn generate_tags(node: &str, resource: &str, operation: &str, category: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in [node, resource, operation, category] {
        let tag = tag.to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

const SERVICE_ICONS: &[(&str, &str)] = &[
    ("gmail", "icons/gmail.svg"),
    ("outlook", "ph-envelope"),
    ("smtp", "ph-paper-plane-tilt"),
    ("email", "ph-envelope-simple"),
    ("slack", "icons/slack.svg"),
    ("discord", "ph-discord-logo"),
    ("telegram", "ph-telegram-logo"),
    ("whatsapp", "ph-whatsapp-logo"),
    ("teams", "ph-microsoft-teams-logo"),
    ("twitter", "ph-twitter-logo"),
    ("facebook", "ph-facebook-logo"),
    ("linkedin", "ph-linkedin-logo"),
    ("instagram", "ph-instagram-logo"),
    ("google-sheets", "ph-table"),
    ("google-drive", "ph-google-drive-logo"),
    ("dropbox", "ph-dropbox-logo"),
    ("onedrive", "ph-folder-simple"),
    ("airtable", "ph-database"),
    ("github", "ph-github-logo"),
    ("gitlab", "ph-gitlab-logo"),
    ("jira", "ph-kanban"),
    ("trello", "ph-trello-logo"),
    ("notion", "ph-note"),
    ("asana", "ph-check-square"),
    ("http", "ph-plugs-connected"),
    ("webhook", "ph-webhook"),
    ("api", "ph-cloud-arrow-up"),
    ("google-analytics", "ph-chart-line"),
    ("mixpanel", "ph-chart-bar"),
    ("segment", "ph-broadcast"),
    ("salesforce", "ph-briefcase"),
    ("hubspot", "ph-user-circle-gear"),
    ("pipedrive", "ph-funnel"),
    ("zendesk", "ph-headset"),
    ("stripe", "ph-credit-card"),
    ("paypal", "ph-paypal-logo"),
    ("shopify", "ph-storefront"),
    ("calendar", "ph-calendar"),
    ("todo", "ph-check-circle"),
    ("notes", "ph-note-pencil"),
    ("openai", "ph-brain"),
    ("anthropic", "ph-robot"),
    ("grok", "ph-brain"),
    ("ai", "ph-cpu"),
];

pub const DEFAULT_ICON: &str = "ph-plug";

/// Icon for a service: exact key, then substring match either way
pub fn service_icon(service: &str) -> &'static str {
    let service = service.to_lowercase();
    if service.is_empty() {
        return DEFAULT_ICON;
    }
    if let Some((_, icon)) = SERVICE_ICONS.iter().find(|(key, _)| *key == service) {
        return icon;
    }
    SERVICE_ICONS
        .iter()
        .find(|(key, _)| service.contains(key) || key.contains(service.as_str()))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

#[cfg(test)]
mod tests;
