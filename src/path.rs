//! Output path resolution for template units.
//!
//! Paths are relative, `/`-separated and built from validated segments only.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::template::TemplateUnit;
use crate::webhook::WebhookConfig;

/// Root of every generated webhook file.
pub const WEBHOOK_ROOT: &str = "pkg/webhook";

static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

fn segment(value: String) -> Result<String> {
    let reason = if value.is_empty() {
        Some("empty")
    } else if value == "." || value.contains("..") {
        Some("relative traversal")
    } else if !SEGMENT_RE.is_match(&value) {
        Some("contains characters outside [A-Za-z0-9._-]")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidPath { segment: value, reason: reason.to_string() }),
        None => Ok(value),
    }
}

/// Resolves the relative output path of a unit.
///
/// Server-scoped units depend on the server name only. Operation-scoped units
/// embed the operations tuple, joined with `_`, so different tuples never collide.
///
/// # Errors
/// * `Error::InvalidPath` if a naming field is empty or unsafe
pub fn resolve_path(
    resource: &Resource,
    webhook: &WebhookConfig,
    unit: TemplateUnit,
) -> Result<String> {
    let server = segment(webhook.server().to_string())?;
    let server_dir = segment(format!("{server}_server"))?;
    // Server-scoped units never look at the resource.
    let package = || -> Result<(String, String)> {
        Ok((segment(resource.lower_kind())?, segment(webhook.admission_type().to_string())?))
    };

    let segments = match unit {
        TemplateUnit::AddServer => vec![segment(format!("add_{server}_server.go"))?],
        TemplateUnit::Server => vec![server_dir, "server.go".to_string()],
        TemplateUnit::AddHandlerRegistration => {
            let (kind, admission_type) = package()?;
            vec![server_dir, segment(format!("add_{admission_type}_{kind}.go"))?]
        }
        TemplateUnit::AdmissionWebhooks => {
            let (kind, admission_type) = package()?;
            vec![server_dir, kind, admission_type, "webhooks.go".to_string()]
        }
        TemplateUnit::AdmissionWebhookBuilder => {
            let (kind, admission_type) = package()?;
            let file = segment(format!("{}_webhook.go", webhook.operations_string()))?;
            vec![server_dir, kind, admission_type, file]
        }
        TemplateUnit::MutatingHandler | TemplateUnit::ValidatingHandler => {
            let (kind, admission_type) = package()?;
            let file = segment(format!("{kind}_{}_handler.go", webhook.operations_string()))?;
            vec![server_dir, kind, admission_type, file]
        }
    };

    Ok(format!("{WEBHOOK_ROOT}/{}", segments.join("/")))
}
