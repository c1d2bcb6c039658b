use askama::Template;

/// One `camunda:formField` of the input user task
///
/// All fields are XML-escaped before rendering.
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: String,
    pub label: String,
    pub default_value: String,
    pub description: String,
}

/// One `camunda:inputParameter` mapping a form variable into the service task
#[derive(Debug, Clone)]
pub struct InputParameter {
    pub name: String,
    pub expression: String,
}

/// Example process for a single-operation connector
#[derive(Template)]
#[template(path = "example.bpmn.txt", escape = "none")]
pub struct ExampleBpmnTemplate {
    pub connector_id: String,
    pub process_id: String,
    pub process_name: String,
    pub task_name: String,
    pub template_id: String,
    pub timeout: String,
    pub webhook_url: String,
    pub payload: String,
    pub output_mapping: String,
    pub form_fields: Vec<FormField>,
    pub input_parameters: Vec<InputParameter>,
}

/// Example process for a multi-operation connector
#[derive(Template)]
#[template(path = "example_multi.bpmn.txt", escape = "none")]
pub struct MultiExampleBpmnTemplate {
    pub node_id: String,
    pub process_id: String,
    pub process_name: String,
    pub display_name: String,
    pub template_id: String,
    pub timeout: String,
    pub webhook_url: String,
    pub resource_name: String,
    pub operation_name: String,
    pub selector: String,
    pub resource_count: usize,
    pub operation_count: usize,
    pub resource_names: String,
    pub form_fields: Vec<FormField>,
    pub input_parameters: Vec<InputParameter>,
}

/// Operation line of the setup wizard's closing task
#[derive(Debug, Clone)]
pub struct SetupOperation {
    pub name: String,
    pub description: String,
}

/// Resource section of the setup wizard
#[derive(Debug, Clone)]
pub struct SetupResource {
    pub name: String,
    pub operation_count: usize,
    /// First few operations
    pub operations: Vec<SetupOperation>,
    /// Operations not listed
    pub more: usize,
}

/// Five-step setup wizard process
#[derive(Template)]
#[template(path = "setup.bpmn.txt", escape = "none")]
pub struct SetupBpmnTemplate {
    pub node_id: String,
    pub node_name: String,
    pub process_id: String,
    pub process_name: String,
    pub display_name: String,
    pub resource_count: usize,
    pub operation_count: usize,
    pub resource_names: String,
    pub first_resource: String,
    pub first_operation: String,
    pub resources: Vec<SetupResource>,
}

/// Parameter row of the README
#[derive(Debug, Clone)]
pub struct ReadmeParameter {
    pub name: String,
    pub display_name: String,
    pub kind: String,
    pub required: bool,
    pub description: String,
}

/// README of a single-operation connector
#[derive(Template)]
#[template(path = "readme.md.txt", escape = "none")]
pub struct ReadmeTemplate {
    pub display_name: String,
    pub description: String,
    pub connector_id: String,
    pub node_name: String,
    pub resource_name: String,
    pub operation_name: String,
    pub category: String,
    pub webhook_path: String,
    pub webhook_url: String,
    pub credentials: Vec<String>,
    pub parameters: Vec<ReadmeParameter>,
    pub payload: String,
    pub output_mapping: String,
}

/// Operation line of the multi-operation README
#[derive(Debug, Clone)]
pub struct ReadmeOperation {
    pub name: String,
    pub description: String,
}

/// Resource section of the multi-operation README
#[derive(Debug, Clone)]
pub struct ReadmeResource {
    pub name: String,
    pub operations: Vec<ReadmeOperation>,
}

/// README of a multi-operation connector
#[derive(Template)]
#[template(path = "readme_multi.md.txt", escape = "none")]
pub struct MultiReadmeTemplate {
    pub node_id: String,
    pub node_name: String,
    pub display_name: String,
    pub description: String,
    pub resource_names: String,
    pub operation_count: usize,
    pub resources: Vec<ReadmeResource>,
}
