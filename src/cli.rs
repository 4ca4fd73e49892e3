//! Command-line interface implementation for admission-scaffold.
//! Provides argument parsing and help text formatting using clap, and turns
//! the parsed flags into descriptors.

use clap::{error::ErrorKind, CommandFactory, Parser};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{load_project, ProjectContext, DEFAULT_VERSION};
use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::webhook::{AdmissionType, Operation, Operations, WebhookConfig};

/// Command-line arguments structure for admission-scaffold.
///
/// `--version` names the API version, so clap's own version flag is not generated.
#[derive(Parser, Debug)]
#[command(author, about = "admission-scaffold: admission webhook scaffolding tool", long_about = None)]
pub struct Args {
    /// API group of the resource, e.g. crew
    #[arg(long)]
    pub group: String,

    /// API version of the resource, e.g. v1
    #[arg(long)]
    pub version: String,

    /// Kind of the resource, e.g. FirstMate
    #[arg(long)]
    pub kind: String,

    /// The resource is cluster-scoped instead of namespaced
    #[arg(long)]
    pub cluster_scoped: bool,

    /// Leave the example admission logic out of the handler
    #[arg(long)]
    pub no_example_body: bool,

    /// Admission type: mutating or validating
    #[arg(long = "type", value_name = "TYPE")]
    pub admission_type: String,

    /// Comma separated operations, in order: create, update, delete, connect
    #[arg(long, value_delimiter = ',', required = true)]
    pub operations: Vec<String>,

    /// Name of the webhook server hosting the webhook
    #[arg(long, default_value = "default")]
    pub server: String,

    /// Namespace label the webhook is restricted to, as key=value (repeatable)
    #[arg(long = "namespace-selector", value_name = "KEY=VALUE")]
    pub namespace_selector: Vec<String>,

    /// Directory containing the PROJECT file (defaults to the output directory)
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Project domain; with --repo, used instead of the PROJECT file
    #[arg(long, requires = "repo")]
    pub domain: Option<String>,

    /// Go module path of the project; with --domain, used instead of the PROJECT file
    #[arg(long, requires = "domain")]
    pub repo: Option<String>,

    /// Directory the generated files are written below
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Overwrite existing files whose content differs
    #[arg(short, long)]
    pub force: bool,

    /// Print the files that would be generated without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// # Errors
    /// * `Error::InvalidResource` if group, version or kind is malformed
    pub fn resource(&self) -> Result<Resource> {
        Resource::new(
            &self.group,
            &self.version,
            &self.kind,
            !self.cluster_scoped,
            !self.no_example_body,
        )
    }

    /// # Errors
    /// * `Error::InvalidWebhook` if type, operations, server or selector is malformed
    pub fn webhook(&self) -> Result<WebhookConfig> {
        let admission_type = AdmissionType::from_str(&self.admission_type)?;
        let operations = self
            .operations
            .iter()
            .map(|op| Operation::from_str(op))
            .collect::<Result<Vec<_>>>()?;
        let selector = parse_selector(&self.namespace_selector)?;

        WebhookConfig::new(admission_type, Operations::new(operations)?, &self.server)?
            .with_namespace_selector(selector)
    }

    /// Builds the project context from flags, or loads the PROJECT file.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no usable project configuration is found
    pub fn project(&self) -> Result<ProjectContext> {
        match (&self.domain, &self.repo) {
            (Some(domain), Some(repo)) => ProjectContext::new(DEFAULT_VERSION, domain, repo),
            _ => load_project(self.project_dir.as_ref().unwrap_or(&self.output_dir)),
        }
    }
}

/// Parses `key=value` pairs, keeping their order.
pub fn parse_selector(pairs: &[String]) -> Result<IndexMap<String, String>> {
    let mut labels = IndexMap::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            Error::InvalidWebhook(format!("namespace selector '{pair}' must be key=value"))
        })?;
        if labels.insert(key.trim().to_string(), value.trim().to_string()).is_some() {
            return Err(Error::InvalidWebhook(format!("duplicate selector key '{key}'")));
        }
    }
    Ok(labels)
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
