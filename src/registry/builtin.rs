//! Built-in service catalog: Slack and Gmail.

use crate::schema::{OperationParameter, OperationSchema, ParamOption, ParameterType};

use super::extract::{FieldDefinition, NodeDefinition, OperationDefinition, ResourceDefinition};
use super::NodeEntry;

/// Loader for one built-in service
pub type NodeLoader = fn() -> NodeEntry;

/// Built-in services keyed by service id, in registration order
pub const BUILTIN_NODES: &[(&str, NodeLoader)] = &[("slack", slack), ("gmail", gmail)];

fn string(name: &str, display_name: &str) -> OperationParameter {
    OperationParameter::new(name, display_name, ParameterType::String)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Slack
// ---------------------------------------------------------------------------

fn slack_send_message() -> OperationSchema {
    OperationSchema {
        node_id: "slack".to_string(),
        node_name: "Slack".to_string(),
        resource: "message".to_string(),
        resource_name: "Message".to_string(),
        operation: "send".to_string(),
        operation_name: "Send".to_string(),
        display_name: "Slack - Send Message".to_string(),
        description: "Send a message to a Slack channel".to_string(),
        icon: "file:slack.svg".to_string(),
        color: "#4A154B".to_string(),
        credentials: strings(&["slackApi", "slackOAuth2Api"]),
        parameters: vec![
            string("channel", "Channel")
                .required()
                .with_description(
                    "The Slack channel to send the message to (e.g., #general or channel ID)",
                )
                .with_placeholder("#general"),
            string("text", "Message Text")
                .required()
                .with_description("The text content of the message to send")
                .with_placeholder("Hello from Catalyst!"),
        ],
        category: "communication".to_string(),
        subcategory: "messaging".to_string(),
        tags: strings(&["slack", "message", "chat", "notification", "communication"]),
    }
}

fn slack_definition() -> NodeDefinition {
    NodeDefinition {
        description: "Consume the Slack API".to_string(),
        icon: Some("file:slack.svg".to_string()),
        credentials: strings(&["slackApi", "slackOAuth2Api"]),
        resources: vec![
            ResourceDefinition {
                value: "message".to_string(),
                name: "Message".to_string(),
                operations: vec![
                    op("send", "Send", "Send a message to a channel"),
                    op("update", "Update", "Update a previously sent message"),
                    op("delete", "Delete", "Delete a message"),
                ],
            },
            ResourceDefinition {
                value: "channel".to_string(),
                name: "Channel".to_string(),
                operations: vec![
                    op("create", "Create", "Create a channel"),
                    op("archive", "Archive", "Archive a channel"),
                ],
            },
        ],
        fields: vec![
            FieldDefinition::new(
                string("channel", "Channel")
                    .required()
                    .with_description("Channel ID or name, e.g. #general")
                    .with_placeholder("#general"),
            )
            .shown_for("message", &["send", "update", "delete"]),
            FieldDefinition::new(
                string("text", "Message Text")
                    .required()
                    .with_description("The text content of the message"),
            )
            .shown_for("message", &["send", "update"]),
            FieldDefinition::new(
                string("ts", "Message Timestamp")
                    .required()
                    .with_description("Timestamp of the message to change"),
            )
            .shown_for("message", &["update", "delete"]),
            FieldDefinition::new(
                string("channelName", "Channel Name")
                    .required()
                    .with_description("Name of the channel to create"),
            )
            .shown_for("channel", &["create"]),
            FieldDefinition::new(
                OperationParameter::new("isPrivate", "Private", ParameterType::Boolean)
                    .with_default(false),
            )
            .shown_for("channel", &["create"]),
            FieldDefinition::new(
                string("channelId", "Channel ID")
                    .required()
                    .with_description("ID of the channel to archive"),
            )
            .shown_for("channel", &["archive"]),
        ],
    }
}

fn slack() -> NodeEntry {
    NodeEntry {
        node_id: "slack".to_string(),
        operations: vec![slack_send_message()],
        definition: Some(slack_definition()),
    }
}

// ---------------------------------------------------------------------------
// Gmail
// ---------------------------------------------------------------------------

fn gmail_operation(
    operation: &str,
    operation_name: &str,
    display_name: &str,
    description: &str,
    parameters: Vec<OperationParameter>,
    tags: &[&str],
) -> OperationSchema {
    OperationSchema {
        node_id: "gmail".to_string(),
        node_name: "Gmail".to_string(),
        resource: "message".to_string(),
        resource_name: "Message".to_string(),
        operation: operation.to_string(),
        operation_name: operation_name.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        icon: "file:gmail.svg".to_string(),
        color: "#EA4335".to_string(),
        credentials: strings(&["gmailOAuth2"]),
        parameters,
        category: "communication".to_string(),
        subcategory: "email".to_string(),
        tags: strings(tags),
    }
}

fn message_id(description: &str) -> OperationParameter {
    string("messageId", "Message ID")
        .required()
        .with_description(description)
        .with_placeholder("18a1b2c3d4e5f6g7")
}

fn gmail_operations() -> Vec<OperationSchema> {
    vec![
        gmail_operation(
            "send",
            "Send",
            "Gmail - Send Email",
            "Send an email using Gmail",
            vec![
                string("to", "To")
                    .required()
                    .with_description("Email address of the recipient")
                    .with_placeholder("recipient@example.com"),
                string("subject", "Subject")
                    .required()
                    .with_description("Subject line of the email")
                    .with_placeholder("Email subject"),
                string("message", "Message")
                    .required()
                    .with_description("The body content of the email (plain text or HTML)")
                    .with_placeholder("Your email message here"),
                string("cc", "CC")
                    .with_description("Email addresses to CC (comma-separated)")
                    .with_placeholder("cc@example.com"),
                string("bcc", "BCC")
                    .with_description("Email addresses to BCC (comma-separated)")
                    .with_placeholder("bcc@example.com"),
            ],
            &["gmail", "email", "google", "send", "communication"],
        ),
        gmail_operation(
            "get",
            "Get",
            "Gmail - Get Email",
            "Retrieve a specific email from Gmail",
            vec![message_id("The ID of the email message to retrieve")],
            &["gmail", "email", "google", "read", "communication"],
        ),
        gmail_operation(
            "reply",
            "Reply",
            "Gmail - Reply to Email",
            "Reply to an existing email in Gmail",
            vec![
                message_id("The ID of the email message to reply to"),
                string("message", "Reply Message")
                    .required()
                    .with_description("The content of your reply")
                    .with_placeholder("Your reply here"),
            ],
            &["gmail", "email", "google", "reply", "communication"],
        ),
        gmail_operation(
            "addLabel",
            "Add Label",
            "Gmail - Add Label",
            "Add a label to an email in Gmail",
            vec![
                message_id("The ID of the email message"),
                string("labelId", "Label ID")
                    .required()
                    .with_description("The ID of the label to add")
                    .with_placeholder("Label_123"),
            ],
            &["gmail", "email", "google", "label", "organize", "communication"],
        ),
    ]
}

fn op(value: &str, name: &str, description: &str) -> OperationDefinition {
    OperationDefinition {
        value: value.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn gmail_definition() -> NodeDefinition {
    let email_type = OperationParameter::new("emailType", "Email Type", ParameterType::Options)
        .with_default("text")
        .with_options(vec![
            ParamOption::new("Text", "text"),
            ParamOption::new("HTML", "html"),
        ]);
    let options = OperationParameter::new("options", "Options", ParameterType::Collection)
        .with_description("Additional options for this operation");
    let filters = OperationParameter::new("filters", "Filters", ParameterType::Collection);
    let return_all = OperationParameter::new("returnAll", "Return All", ParameterType::Boolean)
        .with_description("Whether to return all results or only up to a given limit")
        .with_default(false);
    let limit = OperationParameter::new("limit", "Limit", ParameterType::Number)
        .with_description("Max number of results to return")
        .with_default(50);

    NodeDefinition {
        description: "Consume the Gmail API".to_string(),
        icon: Some("file:gmail.svg".to_string()),
        credentials: strings(&["gmailOAuth2"]),
        resources: vec![
            ResourceDefinition {
                value: "message".to_string(),
                name: "Message".to_string(),
                operations: vec![
                    op("send", "Send", "Send the email"),
                    op("reply", "Reply", "Reply to an email"),
                    op("get", "Get", "Get a message"),
                    op("getAll", "Get Many", "Get many messages"),
                    op("addLabels", "Add Label", "Add label to message"),
                    op("markAsRead", "Mark as Read", "Mark a message as read"),
                    op("delete", "Delete", "Delete a message"),
                ],
            },
            ResourceDefinition {
                value: "draft".to_string(),
                name: "Draft".to_string(),
                operations: vec![
                    op("create", "Create", "Create a draft"),
                    op("get", "Get", "Get a draft"),
                    op("delete", "Delete", "Delete a draft"),
                ],
            },
            ResourceDefinition {
                value: "label".to_string(),
                name: "Label".to_string(),
                operations: vec![
                    op("create", "Create", "Create a new label"),
                    op("getAll", "Get Many", "Get many labels"),
                    op("delete", "Delete", "Delete a label"),
                ],
            },
            ResourceDefinition {
                value: "thread".to_string(),
                name: "Thread".to_string(),
                operations: vec![
                    op("get", "Get", "Get a thread"),
                    op("reply", "Reply", "Reply to a message in a thread"),
                    op("trash", "Trash", "Trash a thread"),
                ],
            },
        ],
        fields: vec![
            FieldDefinition::new(
                string("sendTo", "To")
                    .required()
                    .with_description("The email addresses of the recipients")
                    .with_placeholder("info@example.com"),
            )
            .shown_for("message", &["send"]),
            FieldDefinition::new(
                string("subject", "Subject")
                    .required()
                    .with_placeholder("Hello World!"),
            )
            .shown_for("message", &["send"]),
            FieldDefinition::new(email_type.clone()).shown_for("message", &["send", "reply"]),
            FieldDefinition::new(string("message", "Message").required())
                .shown_for("message", &["send", "reply"]),
            FieldDefinition::new(string("messageId", "Message ID").required()).shown_for(
                "message",
                &["reply", "get", "addLabels", "markAsRead", "delete"],
            ),
            FieldDefinition::new(
                OperationParameter::new("labelIds", "Label Names or IDs", ParameterType::String)
                    .required(),
            )
            .shown_for("message", &["addLabels"]),
            FieldDefinition::new(return_all.clone()).shown_for("message", &["getAll"]),
            FieldDefinition::new(limit.clone()).shown_for("message", &["getAll"]),
            FieldDefinition::new(filters).shown_for("message", &["getAll"]),
            FieldDefinition::new(string("subject", "Subject")).shown_for("draft", &["create"]),
            FieldDefinition::new(email_type).shown_for("draft", &["create"]),
            FieldDefinition::new(string("message", "Message").required())
                .shown_for("draft", &["create"]),
            FieldDefinition::new(options).shown_for("draft", &["create"]),
            FieldDefinition::new(string("draftId", "Draft ID").required())
                .shown_for("draft", &["get", "delete"]),
            FieldDefinition::new(string("name", "Name").required().with_placeholder("invoices"))
                .shown_for("label", &["create"]),
            FieldDefinition::new(return_all).shown_for("label", &["getAll"]),
            FieldDefinition::new(limit).shown_for("label", &["getAll"]),
            FieldDefinition::new(string("labelId", "Label ID").required())
                .shown_for("label", &["delete"]),
            FieldDefinition::new(string("threadId", "Thread ID").required())
                .shown_for("thread", &["get", "reply", "trash"]),
            FieldDefinition::new(string("message", "Message").required())
                .shown_for("thread", &["reply"]),
        ],
    }
}

fn gmail() -> NodeEntry {
    NodeEntry {
        node_id: "gmail".to_string(),
        operations: gmail_operations(),
        definition: Some(gmail_definition()),
    }
}
