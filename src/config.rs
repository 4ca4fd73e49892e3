//! Project configuration handling.
//! Loads the project-wide context (schema version, domain, repository) that every
//! generation run renders against.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported project file names, tried in order.
pub const PROJECT_FILES: [&str; 3] = ["PROJECT", "PROJECT.yaml", "PROJECT.yml"];

/// Schema version assumed when the project file does not declare one.
pub const DEFAULT_VERSION: &str = "1";

/// Read-only metadata shared by every unit of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(default = "default_version")]
    pub version: String,
    pub domain: String,
    pub repo: String,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl ProjectContext {
    /// Creates a validated project context.
    ///
    /// # Errors
    /// * `Error::ConfigError` if domain or repo is empty
    pub fn new(
        version: impl Into<String>,
        domain: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let ctx = Self { version: version.into(), domain: domain.into(), repo: repo.into() };
        ctx.validate()?;
        Ok(ctx)
    }

    fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError("project version must not be empty".to_string()));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::ConfigError("project domain must not be empty".to_string()));
        }
        if self.repo.trim().is_empty() {
            return Err(Error::ConfigError("project repo must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads the project file from a directory, trying each of [`PROJECT_FILES`].
///
/// # Arguments
/// * `project_dir` - Directory containing the project file
///
/// # Returns
/// * `Result<ProjectContext>` - Parsed and validated project context
///
/// # Errors
/// * `Error::ConfigError` if no project file exists or it cannot be parsed
pub fn load_project<P: AsRef<Path>>(project_dir: P) -> Result<ProjectContext> {
    for file in PROJECT_FILES {
        let project_path = project_dir.as_ref().join(file);
        if project_path.is_file() {
            debug!("Loading project configuration from {}", project_path.display());
            let content = std::fs::read_to_string(&project_path)?;
            return parse_project(&content);
        }
    }

    Err(Error::ConfigError(format!(
        "No project file found in {} (tried: {})",
        project_dir.as_ref().display(),
        PROJECT_FILES.join(", ")
    )))
}

/// Parses project file content, accepting JSON first and YAML otherwise.
pub fn parse_project(content: &str) -> Result<ProjectContext> {
    let project: ProjectContext = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid project file: {e}")))?,
    };
    project.validate()?;
    Ok(project)
}
