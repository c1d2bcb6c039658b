//! Unit tests for type mapping and service classifiers

use super::*;
use crate::schema::OperationParameter;

#[test]
fn test_field_kind_table() {
    let cases = [
        (ParameterType::String, FieldKind::String),
        (ParameterType::Number, FieldKind::String),
        (ParameterType::DateTime, FieldKind::String),
        (ParameterType::Boolean, FieldKind::Dropdown),
        (ParameterType::Options, FieldKind::Dropdown),
        (ParameterType::MultiOptions, FieldKind::Dropdown),
        (ParameterType::Json, FieldKind::Text),
        (ParameterType::FixedCollection, FieldKind::Text),
        (ParameterType::Collection, FieldKind::Text),
    ];
    for (kind, expected) in cases {
        assert_eq!(map_type_to_field_kind(&kind), expected, "{kind}");
        assert!(is_mapped(&kind));
    }
}

#[test]
fn test_unknown_type_fails_open() {
    let kind = ParameterType::Other("resourceLocator".to_string());
    assert_eq!(map_type_to_field_kind(&kind), FieldKind::String);
    assert!(!is_mapped(&kind));
}

#[test]
fn test_payload_template_preserves_order() {
    let params = vec![
        OperationParameter::new("to", "To", ParameterType::String),
        OperationParameter::new("subject", "Subject", ParameterType::String),
        OperationParameter::new("bcc", "BCC", ParameterType::String),
    ];
    let payload = generate_payload_template(&params);
    assert_eq!(
        payload,
        "{\n  \"to\": \"${to}\",\n  \"subject\": \"${subject}\",\n  \"bcc\": \"${bcc}\"\n}"
    );

    let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();
    let keys: Vec<&str> = parsed
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["to", "subject", "bcc"]);
}

#[test]
fn test_payload_template_empty() {
    assert_eq!(generate_payload_template(&[]), "{}");
}

#[test]
fn test_output_mapping_is_fixed_envelope() {
    let mapping: serde_json::Value = serde_json::from_str(&generate_output_mapping()).unwrap();
    assert_eq!(
        mapping,
        serde_json::json!({
            "success": "$.success",
            "statusCode": "$.statusCode",
            "error": "$.error"
        })
    );
}

#[test]
fn test_determine_category_first_match_wins() {
    assert_eq!(determine_category("Slack"), "communication");
    assert_eq!(determine_category("gmail"), "communication");
    assert_eq!(determine_category("googleSheets"), "productivity");
    assert_eq!(determine_category("HubSpot"), "business");
    assert_eq!(determine_category("github"), "developer-tools");
    assert_eq!(determine_category("postgres"), "data");
    assert_eq!(determine_category("openai"), "ai");
    assert_eq!(determine_category("xyz"), "integrations");
}

#[test]
fn test_service_color() {
    assert_eq!(service_color("slack"), "#4A154B");
    assert_eq!(service_color("googleSheets"), "#4285F4");
    assert_eq!(service_color("unknown"), DEFAULT_COLOR);
}

#[test]
fn test_generate_tags_dedups_in_order() {
    assert_eq!(
        generate_tags("Slack", "message", "send", "communication"),
        vec!["slack", "message", "send", "communication"]
    );
    assert_eq!(
        generate_tags("notes", "Notes", "create", "productivity"),
        vec!["notes", "create", "productivity"]
    );
}

#[test]
fn test_service_icon_lookup() {
    assert_eq!(service_icon("gmail"), "icons/gmail.svg");
    assert_eq!(service_icon("google-sheets"), "ph-table");
    assert_eq!(service_icon("slackbot"), "icons/slack.svg");
    assert_eq!(service_icon(""), DEFAULT_ICON);
    assert_eq!(service_icon("zzz"), DEFAULT_ICON);
}
