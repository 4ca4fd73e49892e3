//! admission-scaffold generates admission webhook sources for controller-runtime
//! projects. A resource descriptor, a webhook descriptor and the project context
//! are turned into a deterministic set of (path, content) pairs, one per
//! template unit, and handed to an output sink.

/// Command-line interface module
pub mod cli;

/// Compatibility table between resource scope and webhook configuration
pub mod compat;

/// Project configuration (PROJECT file) handling
pub mod config;

/// Template data context built from the descriptors
pub mod context;

/// Error types and handling
pub mod error;

/// env_logger initialization for the binary
pub mod logger;

/// Output path resolution
pub mod path;

/// Scaffold orchestration
/// Validates descriptors, then resolves, renders and emits every unit
pub mod processor;

/// Template rendering engine abstraction
pub mod renderer;

/// Resource descriptor
pub mod resource;

/// Output sinks: filesystem, in-memory and golden-file verification
pub mod sink;

/// Template units and their embedded bodies
pub mod template;

/// Webhook descriptor
pub mod webhook;
