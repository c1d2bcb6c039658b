//! Camunda element template generation.
//!
//! Both variants share the fixed connection properties (implementation class,
//! webhook URL, timeout) and the trailing output mapping. The multi-operation
//! variant adds an `operation` dropdown keyed by `"<resource>:<operation>"`
//! selectors and shows every other property conditionally:
//!
//! - one property per unique parameter name, visible for every operation that
//!   declares it (`simple` condition for one operation, `oneOf` for several)
//! - one payload property per operation
//!
//! Every property of the multi-operation template carries an `id`, and every
//! `condition.property` references the `operation` property.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::naming::{connector_id, template_id, webhook_url, TEMPLATE_NAMESPACE};
use crate::schema::{
    operation_selector, MultiOperationSchema, OperationParameter, OperationSchema, ParameterType,
};
use crate::type_map::{
    generate_output_mapping, generate_payload_template, is_mapped, map_type_to_field_kind,
    payload_template, variable_expression, FieldKind,
};

use super::GenerationWarning;

pub const ELEMENT_TEMPLATE_SCHEMA: &str =
    "https://unpkg.com/@camunda/element-templates-json-schema/resources/schema.json";

/// Java delegate executing every Catalyst service task
pub const BRIDGE_CLASS: &str = "io.catalyst.bridge.CatalystBridge";

/// Default timeout in seconds written into templates and example diagrams
pub const DEFAULT_TIMEOUT: &str = "30";

/// Layers icon shown in the modeler palette
pub const TEMPLATE_ICON: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='18' height='18' viewBox='0 0 24 24' fill='none' stroke='%2306b6d4' stroke-width='2'%3E%3Cpath d='M12 2L2 7l10 5 10-5-10-5z'/%3E%3Cpath d='M2 17l10 5 10-5'/%3E%3Cpath d='M2 12l10 5 10-5'/%3E%3C/svg%3E";

/// Id of the operation selector property in multi-operation templates
pub const OPERATION_PROPERTY: &str = "operation";

const INPUT_PARAMETER: &str = "camunda:inputParameter";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTemplate {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub name: String,
    pub id: String,
    pub description: String,
    pub version: u32,
    pub applies_to: Vec<String>,
    pub icon: TemplateIcon,
    pub groups: Vec<TemplateGroup>,
    pub properties: Vec<TemplateProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateIcon {
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateGroup {
    pub id: String,
    pub label: String,
}

impl TemplateGroup {
    fn new(id: &str, label: &str) -> Self {
        TemplateGroup {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl Binding {
    fn input(name: &str) -> Self {
        Binding {
            kind: INPUT_PARAMETER.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub not_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    fn new(name: &str, value: &str) -> Self {
        Choice {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Visibility condition on another property's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Condition {
    #[serde(rename = "simple")]
    Simple { property: String, equals: String },
    #[serde(rename = "oneOf")]
    OneOf {
        property: String,
        #[serde(rename = "oneOf")]
        one_of: Vec<String>,
    },
}

impl Condition {
    /// `simple` for a single selector, `oneOf` for several
    pub fn on_selectors(property: &str, mut selectors: Vec<String>) -> Self {
        if selectors.len() == 1 {
            Condition::Simple {
                property: property.to_string(),
                equals: selectors.remove(0),
            }
        } else {
            Condition::OneOf {
                property: property.to_string(),
                one_of: selectors,
            }
        }
    }

    pub fn property(&self) -> &str {
        match self {
            Condition::Simple { property, .. } | Condition::OneOf { property, .. } => property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub binding: Binding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl TemplateProperty {
    fn new(label: &str, kind: FieldKind, binding: Binding) -> Self {
        TemplateProperty {
            id: None,
            label: label.to_string(),
            kind,
            value: None,
            description: None,
            binding,
            group: None,
            constraints: None,
            choices: None,
            condition: None,
        }
    }

    fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    fn not_empty(mut self) -> Self {
        self.constraints = Some(Constraints { not_empty: true });
        self
    }
}

/// Render an element template as pretty JSON
pub fn to_json(template: &ElementTemplate) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(template)?)
}

/// Warnings for parameter types rendered through the String fallback
pub fn parameter_warnings<'a>(
    parameters: impl IntoIterator<Item = &'a OperationParameter>,
) -> Vec<GenerationWarning> {
    parameters
        .into_iter()
        .filter(|p| !is_mapped(&p.kind))
        .map(|p| GenerationWarning::UnknownParameterType {
            parameter: p.name.clone(),
            type_name: p.kind.to_string(),
        })
        .collect()
}

/// String form of a default value as it appears in a form field
pub fn default_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn connection_properties(url: String, with_ids: bool) -> Vec<TemplateProperty> {
    let mut implementation = TemplateProperty::new(
        "Implementation",
        FieldKind::Hidden,
        Binding {
            kind: "property".to_string(),
            name: "camunda:class".to_string(),
        },
    )
    .value(BRIDGE_CLASS);
    let mut webhook =
        TemplateProperty::new("n8n Webhook URL", FieldKind::String, Binding::input("webhookUrl"))
            .value(url)
            .group("connection")
            .not_empty();
    let mut timeout =
        TemplateProperty::new("Timeout (seconds)", FieldKind::String, Binding::input("timeout"))
            .value(DEFAULT_TIMEOUT)
            .group("connection");
    if with_ids {
        implementation = implementation.id("implementation");
        webhook = webhook.id("webhookUrl");
        timeout = timeout.id("timeout");
    }
    vec![implementation, webhook, timeout]
}

fn output_mapping_property() -> TemplateProperty {
    TemplateProperty::new("Output Mapping", FieldKind::Text, Binding::input("outputMapping"))
        .value(generate_output_mapping())
        .group("output")
}

/// Form field for one parameter: type-mapped, `${name}` valued, choices for
/// enumerated and boolean types
fn parameter_property(param: &OperationParameter) -> TemplateProperty {
    let mut property = TemplateProperty::new(
        &param.display_name,
        map_type_to_field_kind(&param.kind),
        Binding::input(&param.name),
    )
    .value(variable_expression(&param.name))
    .group("input");
    property.description = param.description.clone();

    if param.kind.is_choice() {
        property.choices = Some(
            param
                .options
                .iter()
                .map(|o| Choice::new(&o.name, &o.value))
                .collect(),
        );
        let value = param
            .default
            .as_ref()
            .map(default_as_string)
            .or_else(|| param.options.first().map(|o| o.value.clone()))
            .unwrap_or_default();
        property = property.value(value);
    } else if param.kind == ParameterType::Boolean {
        property.choices = Some(vec![Choice::new("True", "true"), Choice::new("False", "false")]);
        let value = param
            .default
            .as_ref()
            .map(default_as_string)
            .unwrap_or_else(|| "false".to_string());
        property = property.value(value);
    }

    if param.required {
        property = property.not_empty();
    }
    property
}

/// Element template for a single operation
pub fn generate_element_template(schema: &OperationSchema) -> ElementTemplate {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);

    let mut properties = connection_properties(webhook_url(&id), false);
    properties.extend(schema.parameters.iter().map(parameter_property));
    properties.push(
        TemplateProperty::new("Payload", FieldKind::Text, Binding::input("payload"))
            .value(generate_payload_template(&schema.parameters))
            .group("payload"),
    );
    properties.push(output_mapping_property());

    ElementTemplate {
        schema: ELEMENT_TEMPLATE_SCHEMA.to_string(),
        name: format!("Catalyst - {}", schema.display_name),
        id: template_id(&id),
        description: schema.description.clone(),
        version: 1,
        applies_to: vec!["bpmn:ServiceTask".to_string()],
        icon: TemplateIcon {
            contents: TEMPLATE_ICON.to_string(),
        },
        groups: vec![
            TemplateGroup::new("connection", "Connection"),
            TemplateGroup::new("input", "Input"),
            TemplateGroup::new("payload", "Payload"),
            TemplateGroup::new("output", "Output"),
        ],
        properties,
    }
}

/// Parameter shared by one or more operations of a multi-operation schema
struct SharedParameter<'a> {
    first: &'a OperationParameter,
    selectors: Vec<String>,
    all_required: bool,
}

/// Unique parameter names in first-seen order with the selectors using them
fn shared_parameters(schema: &MultiOperationSchema) -> Vec<SharedParameter<'_>> {
    let mut shared: Vec<SharedParameter<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for (resource, op) in schema.operations() {
        let selector = operation_selector(&resource.value, &op.value);
        for param in &op.parameters {
            match index.get(param.name.as_str()) {
                Some(&i) => {
                    let entry = &mut shared[i];
                    entry.selectors.push(selector.clone());
                    entry.all_required &= param.required;
                }
                None => {
                    index.insert(param.name.as_str(), shared.len());
                    shared.push(SharedParameter {
                        first: param,
                        selectors: vec![selector.clone()],
                        all_required: param.required,
                    });
                }
            }
        }
    }
    shared
}

/// Element template for every operation of a service
pub fn generate_multi_element_template(schema: &MultiOperationSchema) -> ElementTemplate {
    let mut properties = connection_properties(webhook_url(&schema.node_id), true);

    let choices: Vec<Choice> = schema
        .operations()
        .map(|(resource, op)| {
            Choice::new(
                &format!("{} - {}", resource.name, op.name),
                &operation_selector(&resource.value, &op.value),
            )
        })
        .collect();
    let first_selector = choices.first().map(|c| c.value.clone()).unwrap_or_default();
    let mut selector = TemplateProperty::new("Operation", FieldKind::Dropdown, Binding::input("operation"))
        .id(OPERATION_PROPERTY)
        .value(first_selector)
        .group("operation")
        .not_empty();
    selector.description = Some("Resource and operation to execute".to_string());
    selector.choices = Some(choices);
    properties.push(selector);

    for shared in shared_parameters(schema) {
        let mut property = parameter_property(shared.first).id(format!("param_{}", shared.first.name));
        property.constraints = shared
            .all_required
            .then_some(Constraints { not_empty: true });
        property.condition = Some(Condition::on_selectors(OPERATION_PROPERTY, shared.selectors));
        properties.push(property);
    }

    for (resource, op) in schema.operations() {
        let selector = operation_selector(&resource.value, &op.value);
        let mut payload = TemplateProperty::new("Payload", FieldKind::Text, Binding::input("payload"))
            .id(format!("payload:{selector}"))
            .value(payload_template(op.parameters.iter().map(|p| p.name.as_str())))
            .group("payload");
        payload.condition = Some(Condition::Simple {
            property: OPERATION_PROPERTY.to_string(),
            equals: selector,
        });
        properties.push(payload);
    }

    properties.push(output_mapping_property().id("outputMapping"));

    ElementTemplate {
        schema: ELEMENT_TEMPLATE_SCHEMA.to_string(),
        name: format!("Catalyst - {}", schema.display_name),
        id: format!("{TEMPLATE_NAMESPACE}.{}", schema.node_id),
        description: schema.description.clone(),
        version: 2,
        applies_to: vec!["bpmn:ServiceTask".to_string()],
        icon: TemplateIcon {
            contents: TEMPLATE_ICON.to_string(),
        },
        groups: vec![
            TemplateGroup::new("connection", "Connection"),
            TemplateGroup::new("operation", "Operation"),
            TemplateGroup::new("input", "Input"),
            TemplateGroup::new("payload", "Payload"),
            TemplateGroup::new("output", "Output"),
        ],
        properties,
    }
}
