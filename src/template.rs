//! Template units: the closed set of file roles a webhook scaffold produces.
//!
//! Each unit pairs an embedded MiniJinja body with the context fields it
//! needs and the scope its output path is keyed by.

use std::fmt;

use crate::context::lookup;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use crate::webhook::{AdmissionType, WebhookConfig};

/// What an output path is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathScope {
    /// Only the server name; shared by every resource hosted on the server.
    Server,
    /// Server, kind and admission type.
    Resource,
    /// Server, kind, admission type and the operations tuple.
    Operations,
}

/// A named template bound to one output file role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateUnit {
    /// Registers the server's `Add` function with the manager.
    AddServer,
    /// Webhook server definition and builder/handler maps.
    Server,
    /// Merges one kind/type package into the server's maps.
    AddHandlerRegistration,
    /// Builder and handler maps of one kind/type package.
    AdmissionWebhooks,
    /// Webhook builder for one operations tuple.
    AdmissionWebhookBuilder,
    MutatingHandler,
    ValidatingHandler,
}

const ADD_SERVER: &str = include_str!("../templates/webhook/add_server.go.j2");
const SERVER: &str = include_str!("../templates/webhook/server.go.j2");
const ADD_HANDLER_REGISTRATION: &str =
    include_str!("../templates/webhook/add_admission_webhook_builder_handler.go.j2");
const ADMISSION_WEBHOOKS: &str = include_str!("../templates/webhook/webhooks.go.j2");
const ADMISSION_WEBHOOK_BUILDER: &str = include_str!("../templates/webhook/builder.go.j2");
const MUTATING_HANDLER: &str = include_str!("../templates/webhook/mutating_handler.go.j2");
const VALIDATING_HANDLER: &str = include_str!("../templates/webhook/validating_handler.go.j2");

const HANDLER_HEADER: &str = include_str!("../templates/webhook/handler_header.go.j2");
const HANDLER_DECODE: &str = include_str!("../templates/webhook/handler_decode.go.j2");
const HANDLER_INJECT: &str = include_str!("../templates/webhook/handler_inject.go.j2");

/// Names of the sections shared by both handler units.
pub const PARTIALS: [&str; 3] = ["handler_header.go", "handler_decode.go", "handler_inject.go"];

/// Body of a shared section pulled in with `{% include %}`.
pub fn partial(name: &str) -> Option<&'static str> {
    match name {
        "handler_header.go" => Some(HANDLER_HEADER),
        "handler_decode.go" => Some(HANDLER_DECODE),
        "handler_inject.go" => Some(HANDLER_INJECT),
        _ => None,
    }
}

impl TemplateUnit {
    pub const ALL: [TemplateUnit; 7] = [
        TemplateUnit::AddServer,
        TemplateUnit::Server,
        TemplateUnit::AddHandlerRegistration,
        TemplateUnit::AdmissionWebhooks,
        TemplateUnit::AdmissionWebhookBuilder,
        TemplateUnit::MutatingHandler,
        TemplateUnit::ValidatingHandler,
    ];

    /// Units applicable to a webhook, in write order.
    pub fn for_webhook(webhook: &WebhookConfig) -> Vec<TemplateUnit> {
        let handler = match webhook.admission_type() {
            AdmissionType::Mutating => TemplateUnit::MutatingHandler,
            AdmissionType::Validating => TemplateUnit::ValidatingHandler,
        };
        vec![
            TemplateUnit::AddServer,
            TemplateUnit::Server,
            TemplateUnit::AddHandlerRegistration,
            TemplateUnit::AdmissionWebhooks,
            TemplateUnit::AdmissionWebhookBuilder,
            handler,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemplateUnit::AddServer => "add_server.go",
            TemplateUnit::Server => "server.go",
            TemplateUnit::AddHandlerRegistration => "add_admission_webhook_builder_handler.go",
            TemplateUnit::AdmissionWebhooks => "webhooks.go",
            TemplateUnit::AdmissionWebhookBuilder => "builder.go",
            TemplateUnit::MutatingHandler => "mutating_handler.go",
            TemplateUnit::ValidatingHandler => "validating_handler.go",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            TemplateUnit::AddServer => ADD_SERVER,
            TemplateUnit::Server => SERVER,
            TemplateUnit::AddHandlerRegistration => ADD_HANDLER_REGISTRATION,
            TemplateUnit::AdmissionWebhooks => ADMISSION_WEBHOOKS,
            TemplateUnit::AdmissionWebhookBuilder => ADMISSION_WEBHOOK_BUILDER,
            TemplateUnit::MutatingHandler => MUTATING_HANDLER,
            TemplateUnit::ValidatingHandler => VALIDATING_HANDLER,
        }
    }

    pub fn scope(&self) -> PathScope {
        match self {
            TemplateUnit::AddServer | TemplateUnit::Server => PathScope::Server,
            TemplateUnit::AddHandlerRegistration | TemplateUnit::AdmissionWebhooks => {
                PathScope::Resource
            }
            TemplateUnit::AdmissionWebhookBuilder
            | TemplateUnit::MutatingHandler
            | TemplateUnit::ValidatingHandler => PathScope::Operations,
        }
    }

    /// Context fields the body dereferences unconditionally.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            TemplateUnit::AddServer => &["project.repo", "project.domain", "webhook.server"],
            TemplateUnit::Server => &["project.domain", "webhook.server", "webhook.server_package"],
            TemplateUnit::AddHandlerRegistration => &[
                "project.repo",
                "resource.lower_kind",
                "webhook.type",
                "webhook.server",
                "webhook.server_package",
            ],
            TemplateUnit::AdmissionWebhooks => &["webhook.type"],
            TemplateUnit::AdmissionWebhookBuilder => &[
                "project.domain",
                "resource.kind",
                "resource.import_alias",
                "resource.import_path",
                "webhook.type",
                "webhook.mutating",
                "webhook.operations",
                "webhook.builder_name",
                "webhook.namespace_selector",
            ],
            TemplateUnit::MutatingHandler | TemplateUnit::ValidatingHandler => &[
                "resource.kind",
                "resource.import_alias",
                "resource.import_path",
                "resource.create_example_body",
                "webhook.type",
                "webhook.operations",
                "webhook.operation_names",
                "webhook.operations_camel",
                "webhook.builder_name",
            ],
        }
    }

    /// Handler variants only serve webhooks of their own admission type.
    pub fn is_applicable_to(&self, webhook: &WebhookConfig) -> bool {
        match self {
            TemplateUnit::MutatingHandler => webhook.admission_type() == AdmissionType::Mutating,
            TemplateUnit::ValidatingHandler => {
                webhook.admission_type() == AdmissionType::Validating
            }
            _ => true,
        }
    }

    /// Renders the unit against a data context.
    ///
    /// # Errors
    /// * `Error::TemplateDataError` if a required field is absent, or the body
    ///   dereferences an undefined variable
    /// * `Error::RenderError` for any other engine failure
    pub fn render(
        &self,
        renderer: &dyn TemplateRenderer,
        context: &serde_json::Value,
    ) -> Result<String> {
        if let Some(field) = self.required_fields().iter().find(|f| lookup(context, f).is_none())
        {
            return Err(Error::TemplateDataError {
                unit: self.name().to_string(),
                field: field.to_string(),
            });
        }

        renderer.render(self.name(), self.body(), context).map_err(|err| match err {
            Error::RenderError(e) if e.kind() == minijinja::ErrorKind::UndefinedError => {
                Error::TemplateDataError {
                    unit: self.name().to_string(),
                    field: e.detail().unwrap_or("undefined value").to_string(),
                }
            }
            other => other,
        })
    }
}

impl fmt::Display for TemplateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MiniJinjaRenderer;
    use crate::webhook::Operations;

    fn hook(ty: AdmissionType) -> WebhookConfig {
        WebhookConfig::new(ty, Operations::parse_list("create").unwrap(), "default").unwrap()
    }

    #[test]
    fn test_for_webhook_selects_handler_by_type() {
        let units = TemplateUnit::for_webhook(&hook(AdmissionType::Mutating));
        assert_eq!(units.len(), 6);
        assert_eq!(units[5], TemplateUnit::MutatingHandler);

        let units = TemplateUnit::for_webhook(&hook(AdmissionType::Validating));
        assert_eq!(units[5], TemplateUnit::ValidatingHandler);
        assert!(!units.contains(&TemplateUnit::MutatingHandler));
    }

    #[test]
    fn test_applicability() {
        let validating = hook(AdmissionType::Validating);
        assert!(!TemplateUnit::MutatingHandler.is_applicable_to(&validating));
        assert!(TemplateUnit::ValidatingHandler.is_applicable_to(&validating));
        assert!(TemplateUnit::Server.is_applicable_to(&validating));
    }

    #[test]
    fn test_all_bodies_are_valid_templates() {
        let env = minijinja::Environment::new();
        for unit in TemplateUnit::ALL {
            assert!(env.template_from_str(unit.body()).is_ok(), "{unit} does not compile");
        }
        for name in PARTIALS {
            let body = partial(name).unwrap();
            assert!(env.template_from_str(body).is_ok(), "{name} does not compile");
        }
        assert!(partial("server.go").is_none());
    }

    #[test]
    fn test_handlers_share_sections() {
        let context = serde_json::json!({
            "resource": {
                "kind": "FirstMate",
                "import_alias": "crewv1",
                "import_path": "project/pkg/apis/crew/v1",
                "create_example_body": false,
            },
            "webhook": {
                "type": "validating",
                "operations": [{ "name": "create", "go_name": "Create" }],
                "operation_names": ["create"],
                "operations_camel": "Create",
                "builder_name": "validating-create-firstmate",
            },
        });
        let renderer = MiniJinjaRenderer::new();
        let validating = TemplateUnit::ValidatingHandler.render(&renderer, &context).unwrap();
        let mutating = TemplateUnit::MutatingHandler.render(&renderer, &context).unwrap();

        for shared in [
            "type FirstMateCreateHandler struct {",
            "\tcase admissionv1beta1.Create:\n\t\terr = h.Decoder.Decode(req, obj)\n",
            "var _ inject.Decoder = &FirstMateCreateHandler{}",
        ] {
            assert!(validating.contains(shared));
            assert!(mutating.contains(shared));
        }
        assert!(validating.contains("admission.ValidationResponse(allowed, reason)"));
        assert!(mutating.contains("admission.PatchResponse(obj, copy)"));
    }

    #[test]
    fn test_missing_required_field() {
        let renderer = MiniJinjaRenderer::new();
        let context = serde_json::json!({ "webhook": { "server": "default" } });
        let err = TemplateUnit::AddServer.render(&renderer, &context).unwrap_err();
        match err {
            Error::TemplateDataError { unit, field } => {
                assert_eq!(unit, "add_server.go");
                assert_eq!(field, "project.repo");
            }
            other => panic!("Expected TemplateDataError, got {other:?}"),
        }
    }
}
