//! Error handling for admission-scaffold.
//! Defines the error taxonomy and the result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while scaffolding webhook sources.
///
/// All of them are returned to the immediate caller of the executor.
/// Rendering is deterministic, so none of them is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A resource descriptor field failed validation
    #[error("Invalid resource: {0}.")]
    InvalidResource(String),

    /// A webhook descriptor field failed validation
    #[error("Invalid webhook: {0}.")]
    InvalidWebhook(String),

    /// A path segment derived from a descriptor is empty or unsafe
    #[error("Invalid path segment {segment:?}: {reason}.")]
    InvalidPath { segment: String, reason: String },

    /// A template unit was handed a context that lacks one of its fields
    #[error("Template data error in {unit}: missing field '{field}'.")]
    TemplateDataError { unit: String, field: String },

    /// The template engine failed while compiling or evaluating a unit
    #[error("Render error: {0}.")]
    RenderError(#[from] minijinja::Error),

    /// Resource scope and webhook configuration cannot be combined
    #[error("Incompatible descriptor: {0}.")]
    IncompatibleDescriptor(String),

    /// The data context could not be serialized
    #[error("Context error: {0}.")]
    ContextError(#[from] serde_json::Error),

    /// Content for an already written path differs from the new content
    #[error("Write conflict at '{path}': existing content differs.")]
    WriteConflict { path: String },

    /// Represents errors that occur during project configuration loading
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
