//! Identifier derivation shared by every generator.
//!
//! All functions are total and deterministic: the same input always yields the
//! same identifier, which is what keeps on-disk paths stable across runs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Namespace prefix of element template ids.
pub const TEMPLATE_NAMESPACE: &str = "io.catalyst.template";

/// Prefix of every generated webhook path.
pub const WEBHOOK_PREFIX: &str = "catalyst-";

/// Base URL of the n8n webhook endpoint inside the Catalyst network.
pub const WEBHOOK_BASE_URL: &str = "http://catalyst-n8n:5678/webhook";

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel boundary regex should be valid"));

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_\s]+").expect("separator regex should be valid"));

static WORD_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_\s]+").expect("word split regex should be valid"));

static UNSAFE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("filename regex should be valid"));

/// `addLabel` -> `add-label`, `Send Message` -> `send-message`
pub fn to_kebab_case(input: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(input, "$1-$2");
    let dashed = SEPARATORS.replace_all(&split, "-");
    dashed.to_lowercase()
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn words(input: &str) -> impl Iterator<Item = &str> {
    WORD_SPLIT.split(input).filter(|w| !w.is_empty())
}

/// `send-message` -> `SendMessage`
pub fn to_pascal_case(input: &str) -> String {
    words(input).map(capitalize_word).collect()
}

/// `send-message` -> `sendMessage`
pub fn to_camel_case(input: &str) -> String {
    let pascal = to_pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `send-message` -> `Send Message`
pub fn to_title_case(input: &str) -> String {
    words(input).map(capitalize_word).collect::<Vec<_>>().join(" ")
}

/// Connector identifier in the fixed `service-operation-resource` order.
///
/// ```
/// use connector_gen::naming::connector_id;
/// assert_eq!(connector_id("gmail", "message", "addLabel"), "gmail-add-label-message");
/// ```
pub fn connector_id(node_id: &str, resource: &str, operation: &str) -> String {
    format!(
        "{}-{}-{}",
        to_kebab_case(node_id),
        to_kebab_case(operation),
        to_kebab_case(resource)
    )
}

/// Human-readable connector name, e.g. `Slack - Send Message`.
pub fn connector_display_name(node_name: &str, resource: &str, operation: &str) -> String {
    format!(
        "{} - {} {}",
        node_name,
        to_title_case(operation),
        to_title_case(resource)
    )
}

pub fn template_id(connector_id: &str) -> String {
    format!("{TEMPLATE_NAMESPACE}.{connector_id}")
}

pub fn webhook_path(connector_id: &str) -> String {
    format!("{WEBHOOK_PREFIX}{connector_id}")
}

pub fn webhook_url(connector_id: &str) -> String {
    format!("{WEBHOOK_BASE_URL}/{}", webhook_path(connector_id))
}

pub fn process_id(connector_id: &str) -> String {
    format!("{connector_id}-example")
}

/// Replace anything outside `[A-Za-z0-9_-]` with `-` and lowercase the result.
pub fn sanitize_filename(input: &str) -> String {
    UNSAFE_FILENAME.replace_all(input, "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("addLabel"), "add-label");
        assert_eq!(to_kebab_case("Send Message"), "send-message");
        assert_eq!(to_kebab_case("google_sheets"), "google-sheets");
        assert_eq!(to_kebab_case("slack"), "slack");
    }

    #[test]
    fn test_pascal_camel_title() {
        assert_eq!(to_pascal_case("send-message"), "SendMessage");
        assert_eq!(to_camel_case("send-message"), "sendMessage");
        assert_eq!(to_title_case("send_message"), "Send Message");
        assert_eq!(to_title_case("MESSAGE"), "Message");
        assert_eq!(to_pascal_case(""), "");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_connector_identifiers() {
        let id = connector_id("slack", "message", "send");
        assert_eq!(id, "slack-send-message");
        assert_eq!(template_id(&id), "io.catalyst.template.slack-send-message");
        assert_eq!(webhook_path(&id), "catalyst-slack-send-message");
        assert_eq!(
            webhook_url(&id),
            "http://catalyst-n8n:5678/webhook/catalyst-slack-send-message"
        );
        assert_eq!(process_id(&id), "slack-send-message-example");
    }

    #[test]
    fn test_connector_id_is_stable_path_segment() {
        let triples = [
            ("slack", "message", "send"),
            ("Gmail", "Message", "addLabel"),
            ("google sheets", "sheet row", "appendOrUpdate"),
        ];
        for (node, resource, operation) in triples {
            let first = connector_id(node, resource, operation);
            let second = connector_id(node, resource, operation);
            assert_eq!(first, second);
            assert!(!first.contains('/') && !first.contains('\\'));
            assert!(!first.contains(' '));
            assert_eq!(first, first.to_lowercase());
        }
    }

    #[test]
    fn test_display_name_and_sanitize() {
        assert_eq!(
            connector_display_name("Gmail", "message", "addLabel"),
            "Gmail - Addlabel Message"
        );
        assert_eq!(sanitize_filename("My File.json"), "my-file-json");
    }
}
