//! Scaffold orchestration.
//! Validates a resource/webhook pairing, then resolves, renders and emits
//! every requested template unit.

use log::{debug, info};

use crate::compat;
use crate::config::ProjectContext;
use crate::context::build_context;
use crate::error::{Error, Result};
use crate::path::resolve_path;
use crate::renderer::TemplateRenderer;
use crate::resource::Resource;
use crate::sink::{OutputSink, WriteOutcome};
use crate::template::TemplateUnit;
use crate::webhook::WebhookConfig;

/// One rendered file of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative, `/`-separated output path.
    pub path: String,
    pub content: String,
    pub unit: TemplateUnit,
}

/// Drives template units for one resource/webhook/project triple.
///
/// Holds nothing but the renderer, so independent runs may share one
/// instance across threads.
pub struct Scaffold<'a> {
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> Scaffold<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Checks the compatibility table and unit applicability.
    ///
    /// # Errors
    /// * `Error::IncompatibleDescriptor` on the first violated rule
    pub fn validate(
        &self,
        resource: &Resource,
        webhook: &WebhookConfig,
        units: &[TemplateUnit],
    ) -> Result<()> {
        compat::check(resource, webhook)?;
        if let Some(unit) = units.iter().find(|unit| !unit.is_applicable_to(webhook)) {
            return Err(Error::IncompatibleDescriptor(format!(
                "template {unit} does not apply to {} webhooks",
                webhook.admission_type()
            )));
        }
        Ok(())
    }

    /// Renders every unit, in caller order, without touching any sink.
    ///
    /// Validation happens before the first unit is rendered, so an invalid
    /// pairing yields no output at all.
    ///
    /// # Errors
    /// * `Error::IncompatibleDescriptor`, `Error::InvalidPath`,
    ///   `Error::TemplateDataError` or `Error::RenderError` at the first failure
    pub fn run(
        &self,
        resource: &Resource,
        webhook: &WebhookConfig,
        project: &ProjectContext,
        units: &[TemplateUnit],
    ) -> Result<Vec<GeneratedFile>> {
        self.validate(resource, webhook, units)?;

        let context = build_context(resource, webhook, project)?;
        debug!(
            "Scaffolding {} {} webhook for {}",
            webhook.admission_type(),
            webhook.operations_string(),
            resource.kind()
        );

        units
            .iter()
            .map(|&unit| -> Result<GeneratedFile> {
                let path = resolve_path(resource, webhook, unit)?;
                debug!("Rendering {unit} ({:?} scope) into {path}", unit.scope());
                let content = unit.render(self.renderer, &context)?;
                Ok(GeneratedFile { path, content, unit })
            })
            .collect()
    }

    /// Renders every unit, then delivers the files to `sink` in order.
    ///
    /// Nothing is written unless all units render. A sink error stops the
    /// run; files delivered before it stay written.
    ///
    /// # Errors
    /// * any error of [`Scaffold::run`]
    /// * `Error::WriteConflict` or `Error::IoError` from the sink
    pub fn run_into(
        &self,
        resource: &Resource,
        webhook: &WebhookConfig,
        project: &ProjectContext,
        units: &[TemplateUnit],
        sink: &dyn OutputSink,
    ) -> Result<Vec<(String, WriteOutcome)>> {
        let files = self.run(resource, webhook, project, units)?;

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let outcome = sink.write(&file.path, &file.content)?;
            info!("{outcome}: '{}'", file.path);
            outcomes.push((file.path, outcome));
        }
        Ok(outcomes)
    }
}
