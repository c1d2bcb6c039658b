//! BPMN process generation: the example process for single- and
//! multi-operation connectors and the multi-operation setup wizard.
//!
//! Form fields and input parameters are derived from the same parameter list
//! as the element template, so the example's service task binds exactly the
//! variables the template exposes.

use askama::Template;

use crate::naming::{
    connector_id, process_id, template_id, to_title_case, webhook_url, TEMPLATE_NAMESPACE,
};
use crate::schema::{operation_selector, MultiOperationSchema, OperationParameter, OperationSchema};
use crate::type_map::{generate_output_mapping, generate_payload_template, variable_expression};

use super::element_template::DEFAULT_TIMEOUT;
use super::templates::{
    ExampleBpmnTemplate, FormField, InputParameter, MultiExampleBpmnTemplate, SetupBpmnTemplate,
    SetupOperation, SetupResource,
};

/// Parameters shown in the multi-operation example's input form
const SAMPLE_PARAMETERS: usize = 5;

/// Operations listed per resource in the setup wizard
const LISTED_OPERATIONS: usize = 5;

/// Escape `& < > " '` for attribute and text content
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Description for form fields whose parameter has none
pub fn default_description(param: &OperationParameter) -> String {
    let lower = param.name.to_lowercase();
    let label = param.display_name.to_lowercase();
    let kind = param.kind.as_str();

    for (needle, text) in [
        ("messageid", "The unique identifier of the message"),
        ("draftid", "The unique identifier of the draft"),
        ("threadid", "The unique identifier of the thread"),
        ("labelid", "The unique identifier of the label"),
        ("subject", "The subject line of the email"),
    ] {
        if lower.contains(needle) {
            return text.to_string();
        }
    }
    if lower.contains("message") && !lower.contains("id") {
        return "The content/body of the email message".to_string();
    }
    if lower.contains("emailtype") || lower.contains("email_type") {
        return "Whether to send as plain text or HTML formatted email".to_string();
    }
    if kind == "collection" && lower.contains("option") {
        return "Additional options for this operation".to_string();
    }
    if kind == "collection" && lower.contains("filter") {
        return "Filters to narrow down results".to_string();
    }
    if lower.contains("notice") || param.display_name.chars().count() > 50 {
        return "Informational text to guide the user".to_string();
    }
    if param.kind.is_choice() {
        return format!("Select {label} from available options");
    }
    match kind {
        "boolean" => format!("Enable or disable {label}"),
        "number" => format!("Numeric value for {label}"),
        _ => format!("Specify {label} for this operation"),
    }
}

/// Default shown in the input form: the parameter default, else its placeholder
///
/// Empty objects and arrays render as an empty string.
fn form_default(param: &OperationParameter) -> String {
    use serde_json::Value;
    match &param.default {
        Some(Value::Null) | None => param.placeholder.clone().unwrap_or_default(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) if map.is_empty() => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(other) => other.to_string(),
    }
}

fn form_field(param: &OperationParameter) -> FormField {
    let description = param
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| default_description(param));
    FormField {
        id: escape_xml(&param.name),
        label: escape_xml(&format!("{} - {}", param.display_name, description)),
        default_value: escape_xml(&form_default(param)),
        description: escape_xml(&description),
    }
}

fn input_parameter(param: &OperationParameter) -> InputParameter {
    InputParameter {
        name: escape_xml(&param.name),
        expression: escape_xml(&variable_expression(&param.name)),
    }
}

/// Start, input form, service task, review task, end
pub fn generate_example_bpmn(schema: &OperationSchema) -> anyhow::Result<String> {
    let id = connector_id(&schema.node_id, &schema.resource, &schema.operation);
    let task_name = format!(
        "{} {} {}",
        to_title_case(&schema.node_name),
        to_title_case(&schema.operation),
        to_title_case(&schema.resource)
    );
    let rendered = ExampleBpmnTemplate {
        connector_id: escape_xml(&id),
        process_id: escape_xml(&process_id(&id)),
        process_name: escape_xml(&format!("{} Example", schema.display_name)),
        task_name: escape_xml(&task_name),
        template_id: escape_xml(&template_id(&id)),
        timeout: DEFAULT_TIMEOUT.to_string(),
        webhook_url: escape_xml(&webhook_url(&id)),
        payload: escape_xml(&generate_payload_template(&schema.parameters)),
        output_mapping: escape_xml(&generate_output_mapping()),
        form_fields: schema.parameters.iter().map(form_field).collect(),
        input_parameters: schema.parameters.iter().map(input_parameter).collect(),
    }
    .render()?;
    Ok(rendered)
}

fn resource_names(schema: &MultiOperationSchema) -> String {
    schema
        .resources
        .iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Example process demonstrating the first operation of the first resource
///
/// The service task selects that operation through the same
/// `"<resource>:<operation>"` selector the element template uses. Unlike the
/// single-operation example it binds no `payload` or `outputMapping`: the
/// template workflow maps request fields itself, and only the first few
/// parameters are put on the input form.
pub fn generate_multi_example_bpmn(schema: &MultiOperationSchema) -> anyhow::Result<String> {
    let (resource, operation) = schema
        .operations()
        .next()
        .ok_or_else(|| anyhow::anyhow!("'{}' has no operations to demonstrate", schema.node_id))?;
    let sample: Vec<&OperationParameter> =
        operation.parameters.iter().take(SAMPLE_PARAMETERS).collect();

    let rendered = MultiExampleBpmnTemplate {
        node_id: escape_xml(&schema.node_id),
        process_id: escape_xml(&format!("Process_{}_example", schema.node_id)),
        process_name: escape_xml(&format!("{} - Example Usage", schema.display_name)),
        display_name: escape_xml(&schema.display_name),
        template_id: escape_xml(&format!("{TEMPLATE_NAMESPACE}.{}", schema.node_id)),
        timeout: DEFAULT_TIMEOUT.to_string(),
        webhook_url: escape_xml(&webhook_url(&schema.node_id)),
        resource_name: escape_xml(&resource.name),
        operation_name: escape_xml(&operation.name),
        selector: escape_xml(&operation_selector(&resource.value, &operation.value)),
        resource_count: schema.resources.len(),
        operation_count: schema.operation_count(),
        resource_names: escape_xml(&resource_names(schema)),
        form_fields: sample.iter().map(|p| form_field(p)).collect(),
        input_parameters: sample.iter().map(|p| input_parameter(p)).collect(),
    }
    .render()?;
    Ok(rendered)
}

/// Five user tasks walking through importing and configuring the connector
pub fn generate_setup_bpmn(schema: &MultiOperationSchema) -> anyhow::Result<String> {
    let (first_resource, first_operation) = schema
        .operations()
        .next()
        .ok_or_else(|| anyhow::anyhow!("'{}' has no operations to set up", schema.node_id))?;

    let resources = schema
        .resources
        .iter()
        .map(|r| SetupResource {
            name: escape_xml(&r.name),
            operation_count: r.operations.len(),
            operations: r
                .operations
                .iter()
                .take(LISTED_OPERATIONS)
                .map(|op| SetupOperation {
                    name: escape_xml(&op.name),
                    description: escape_xml(&op.description),
                })
                .collect(),
            more: r.operations.len().saturating_sub(LISTED_OPERATIONS),
        })
        .collect();

    let rendered = SetupBpmnTemplate {
        node_id: escape_xml(&schema.node_id),
        node_name: escape_xml(&schema.node_name),
        process_id: escape_xml(&format!("Process_{}_setup", schema.node_id)),
        process_name: escape_xml(&format!("{} - Setup Guide", schema.display_name)),
        display_name: escape_xml(&schema.display_name),
        resource_count: schema.resources.len(),
        operation_count: schema.operation_count(),
        resource_names: escape_xml(&resource_names(schema)),
        first_resource: escape_xml(&first_resource.name),
        first_operation: escape_xml(&first_operation.name),
        resources,
    }
    .render()?;
    Ok(rendered)
}
