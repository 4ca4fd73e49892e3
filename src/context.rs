//! Data context shared by all template units of one generation run.
//!
//! The context is the merge of resource, webhook and project into a single
//! serializable value. Project metadata is always passed in explicitly.

use serde::Serialize;

use crate::config::ProjectContext;
use crate::error::Result;
use crate::resource::Resource;
use crate::webhook::{AdmissionType, Operation, WebhookConfig};

#[derive(Debug, Serialize)]
struct ResourceView<'a> {
    group: &'a str,
    version: &'a str,
    kind: &'a str,
    lower_kind: String,
    namespaced: bool,
    create_example_body: bool,
    import_alias: String,
    import_path: String,
}

#[derive(Debug, Serialize)]
struct OperationView {
    name: &'static str,
    go_name: &'static str,
}

impl From<&Operation> for OperationView {
    fn from(op: &Operation) -> Self {
        let go_name = match op {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Connect => "Connect",
        };
        Self { name: op.as_str(), go_name }
    }
}

// Selector labels go out as a list, JSON objects would lose insertion order.
#[derive(Debug, Serialize)]
struct LabelView<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct WebhookView<'a> {
    #[serde(rename = "type")]
    admission_type: &'static str,
    type_title: &'static str,
    mutating: bool,
    server: &'a str,
    server_package: String,
    operations: Vec<OperationView>,
    operation_names: Vec<&'static str>,
    operations_string: String,
    operations_camel: String,
    builder_name: String,
    namespace_selector: Vec<LabelView<'a>>,
}

#[derive(Debug, Serialize)]
struct DataContext<'a> {
    project: &'a ProjectContext,
    resource: ResourceView<'a>,
    webhook: WebhookView<'a>,
}

/// Go package name of the server directory, e.g. `defaultserver`.
pub fn server_package(server: &str) -> String {
    let mut name: String = server.chars().filter(char::is_ascii_alphanumeric).collect();
    name.push_str("server");
    name
}

/// Builds the template data context for one resource/webhook/project triple.
///
/// # Errors
/// * `Error::ContextError` if the views cannot be serialized
pub fn build_context(
    resource: &Resource,
    webhook: &WebhookConfig,
    project: &ProjectContext,
) -> Result<serde_json::Value> {
    let admission_type = webhook.admission_type();
    let context = DataContext {
        project,
        resource: ResourceView {
            group: resource.group(),
            version: resource.version(),
            kind: resource.kind(),
            lower_kind: resource.lower_kind(),
            namespaced: resource.namespaced(),
            create_example_body: resource.create_example_body(),
            import_alias: resource.import_alias(),
            import_path: resource.import_path(&project.repo),
        },
        webhook: WebhookView {
            admission_type: admission_type.as_str(),
            type_title: match admission_type {
                AdmissionType::Mutating => "Mutating",
                AdmissionType::Validating => "Validating",
            },
            mutating: webhook.is_mutating(),
            server: webhook.server(),
            server_package: server_package(webhook.server()),
            operations: webhook.operations().iter().map(OperationView::from).collect(),
            operation_names: webhook.operations().iter().map(Operation::as_str).collect(),
            operations_string: webhook.operations_string(),
            operations_camel: webhook.operations_camel(),
            builder_name: webhook.builder_name(resource.kind()),
            namespace_selector: webhook
                .namespace_selector()
                .iter()
                .map(|(key, value)| LabelView { key, value })
                .collect(),
        },
    };

    Ok(serde_json::to_value(context)?)
}

/// Looks up a dotted field path such as `webhook.server` in a context.
pub fn lookup<'v>(context: &'v serde_json::Value, field: &str) -> Option<&'v serde_json::Value> {
    field
        .split('.')
        .try_fold(context, |value, key| value.get(key))
        .filter(|value| !value.is_null())
}
