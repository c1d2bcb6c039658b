use super::*;
use serde_json::json;

fn param(name: &str, kind: ParameterType) -> OperationParameter {
    OperationParameter::new(name, name, kind)
}

fn schema_with(parameters: Vec<OperationParameter>) -> OperationSchema {
    OperationSchema {
        node_id: "acme".to_string(),
        node_name: "Acme".to_string(),
        resource: "ticket".to_string(),
        resource_name: "Ticket".to_string(),
        operation: "create".to_string(),
        operation_name: "Create".to_string(),
        display_name: "Acme - Create Ticket".to_string(),
        description: String::new(),
        icon: String::new(),
        color: String::new(),
        credentials: vec![],
        parameters,
        category: "integrations".to_string(),
        subcategory: String::new(),
        tags: vec![],
    }
}

#[test]
fn test_parameter_type_round_trips_known_and_unknown_names() {
    assert_eq!(ParameterType::from("multiOptions"), ParameterType::MultiOptions);
    assert_eq!(
        ParameterType::from("resourceLocator"),
        ParameterType::Other("resourceLocator".to_string())
    );
    let parsed: OperationParameter = serde_json::from_value(json!({
        "name": "file",
        "displayName": "File",
        "type": "resourceLocator"
    }))
    .unwrap();
    assert_eq!(parsed.kind.as_str(), "resourceLocator");
    assert!(!parsed.required);

    let back = serde_json::to_value(&parsed).unwrap();
    assert_eq!(back["type"], "resourceLocator");
    assert!(back.get("options").is_none());
}

#[test]
fn test_type_predicates() {
    assert!(ParameterType::Options.is_choice());
    assert!(ParameterType::MultiOptions.is_choice());
    assert!(!ParameterType::Boolean.is_choice());
    assert!(ParameterType::Collection.is_collection());
    assert!(!ParameterType::Json.is_collection());
    assert!(ParameterType::Json.is_nested());
}

#[test]
fn test_validate_accepts_well_formed_schema() {
    let schema = schema_with(vec![
        param("title", ParameterType::String).required(),
        param("priority", ParameterType::Options).with_options(vec![
            ParamOption::new("Low", "low"),
            ParamOption::new("High", "high"),
        ]),
    ]);
    assert!(schema.validate().is_ok());
    assert_eq!(schema.connector_id(), "acme-create-ticket");
}

#[test]
fn test_validate_rejects_duplicate_names() {
    let schema = schema_with(vec![
        param("title", ParameterType::String),
        param("title", ParameterType::Number),
    ]);
    let err = schema.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate parameter name"));
    assert!(err.available().is_empty());
}

#[test]
fn test_validate_rejects_non_identifier_names() {
    for bad in ["", "1st", "with space", "dash-ed", "${x}"] {
        let schema = schema_with(vec![param(bad, ParameterType::String)]);
        assert!(schema.validate().is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn test_validate_rejects_reserved_names() {
    for reserved in RESERVED_NAMES {
        let schema = schema_with(vec![param(reserved, ParameterType::String)]);
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("reserved"), "{reserved}");
    }
}

#[test]
fn test_validate_options_iff_choice_type() {
    let missing = schema_with(vec![param("priority", ParameterType::Options)]);
    assert!(missing.validate().is_err());

    let stray = schema_with(vec![param("title", ParameterType::String)
        .with_options(vec![ParamOption::new("A", "a")])]);
    assert!(stray.validate().is_err());

    let dup = schema_with(vec![param("priority", ParameterType::MultiOptions)
        .with_options(vec![ParamOption::new("A", "a"), ParamOption::new("B", "a")])]);
    let err = dup.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate option value 'a'"));
}

fn multi() -> MultiOperationSchema {
    MultiOperationSchema {
        node_id: "acme".to_string(),
        node_name: "Acme".to_string(),
        display_name: "Acme Connector".to_string(),
        description: String::new(),
        icon: None,
        color: "#000000".to_string(),
        credentials: vec![],
        category: "integrations".to_string(),
        tags: vec![],
        resources: vec![
            ResourceEntry {
                value: "ticket".to_string(),
                name: "Ticket".to_string(),
                operations: vec![
                    OperationEntry {
                        value: "create".to_string(),
                        name: "Create".to_string(),
                        description: String::new(),
                        parameters: vec![],
                        tier: 1,
                    },
                    OperationEntry {
                        value: "bulk".to_string(),
                        name: "Bulk".to_string(),
                        description: String::new(),
                        parameters: vec![],
                        tier: 3,
                    },
                ],
            },
            ResourceEntry {
                value: "report".to_string(),
                name: "Report".to_string(),
                operations: vec![OperationEntry {
                    value: "export".to_string(),
                    name: "Export".to_string(),
                    description: String::new(),
                    parameters: vec![],
                    tier: 3,
                }],
            },
        ],
    }
}

#[test]
fn test_filter_by_tier_drops_operations_and_empty_resources() {
    let schema = multi();
    assert_eq!(schema.operation_count(), 3);

    let filtered = schema.filter_by_tier(2);
    assert_eq!(filtered.operation_count(), 1);
    assert_eq!(filtered.resources.len(), 1);
    assert_eq!(filtered.resources[0].value, "ticket");

    let pairs: Vec<String> = schema
        .operations()
        .map(|(r, op)| operation_selector(&r.value, &op.value))
        .collect();
    assert_eq!(pairs, vec!["ticket:create", "ticket:bulk", "report:export"]);
}

#[test]
fn test_multi_validate_rejects_duplicate_operation_and_bad_tier() {
    let mut dup = multi();
    dup.resources[0].operations[1].value = "create".to_string();
    assert!(dup.validate().is_err());

    let mut tier = multi();
    tier.resources[1].operations[0].tier = 4;
    assert!(tier.validate().unwrap_err().to_string().contains("tier 4"));

    assert!(multi().validate().is_ok());
}
