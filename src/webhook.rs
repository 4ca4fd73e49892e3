//! Webhook descriptor: admission type, operations and hosting server.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use cruet::Inflector;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static SERVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9_]*[a-z0-9])?$").unwrap());
static LABEL_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]([-a-z0-9.]*[a-z0-9])?/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$")
        .unwrap()
});
static LABEL_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?)?$").unwrap());

/// Kind of admission control a webhook performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionType {
    Mutating,
    Validating,
}

impl AdmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdmissionType::Mutating => "mutating",
            AdmissionType::Validating => "validating",
        }
    }
}

impl fmt::Display for AdmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdmissionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mutating" => Ok(AdmissionType::Mutating),
            "validating" => Ok(AdmissionType::Validating),
            other => Err(Error::InvalidWebhook(format!(
                "unknown admission type '{other}', expected mutating or validating"
            ))),
        }
    }
}

/// An admission operation a webhook is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Connect => "connect",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            "connect" => Ok(Operation::Connect),
            other => Err(Error::InvalidWebhook(format!("unknown operation '{other}'"))),
        }
    }
}

/// Ordered, non-empty, duplicate-free list of operations.
///
/// Order is part of the identity: `[create, update]` and `[update, create]`
/// scaffold different files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operations(Vec<Operation>);

impl Operations {
    /// # Errors
    /// * `Error::InvalidWebhook` if the list is empty or repeats an operation
    pub fn new(ops: Vec<Operation>) -> Result<Self> {
        if ops.is_empty() {
            return Err(Error::InvalidWebhook("at least one operation is required".to_string()));
        }
        for (i, op) in ops.iter().enumerate() {
            if ops[..i].contains(op) {
                return Err(Error::InvalidWebhook(format!("duplicate operation '{op}'")));
            }
        }
        Ok(Self(ops))
    }

    /// Parses a comma separated list such as `create,update`.
    pub fn parse_list(s: &str) -> Result<Self> {
        let ops = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Operation::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::new(ops)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.0
    }

    pub fn contains(&self, op: Operation) -> bool {
        self.0.contains(&op)
    }

    /// Operations joined with `sep` in descriptor order.
    pub fn join(&self, sep: &str) -> String {
        self.0.iter().map(Operation::as_str).collect::<Vec<_>>().join(sep)
    }
}

/// Admission webhook configuration for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    admission_type: AdmissionType,
    operations: Operations,
    server: String,
    namespace_selector: IndexMap<String, String>,
}

impl WebhookConfig {
    /// Creates a validated webhook descriptor without namespace filtering.
    ///
    /// # Errors
    /// * `Error::InvalidWebhook` if the server name is empty or not path safe
    pub fn new(
        admission_type: AdmissionType,
        operations: Operations,
        server: impl Into<String>,
    ) -> Result<Self> {
        let server = server.into();
        if server.is_empty() {
            return Err(Error::InvalidWebhook("server must not be empty".to_string()));
        }
        if !SERVER_RE.is_match(&server) {
            return Err(Error::InvalidWebhook(format!(
                "server '{server}' must match {}",
                SERVER_RE.as_str()
            )));
        }
        Ok(Self { admission_type, operations, server, namespace_selector: IndexMap::new() })
    }

    /// Restricts the webhook to namespaces carrying all of `labels`.
    ///
    /// # Errors
    /// * `Error::InvalidWebhook` if a label key or value is malformed
    pub fn with_namespace_selector(mut self, labels: IndexMap<String, String>) -> Result<Self> {
        for (key, value) in &labels {
            if !LABEL_KEY_RE.is_match(key) {
                return Err(Error::InvalidWebhook(format!("invalid selector label key '{key}'")));
            }
            if !LABEL_VALUE_RE.is_match(value) {
                return Err(Error::InvalidWebhook(format!(
                    "invalid selector label value '{value}' for key '{key}'"
                )));
            }
        }
        self.namespace_selector = labels;
        Ok(self)
    }

    pub fn admission_type(&self) -> AdmissionType {
        self.admission_type
    }

    pub fn operations(&self) -> &Operations {
        &self.operations
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn namespace_selector(&self) -> &IndexMap<String, String> {
        &self.namespace_selector
    }

    pub fn is_mutating(&self) -> bool {
        self.admission_type == AdmissionType::Mutating
    }

    /// e.g. `create_update`
    pub fn operations_string(&self) -> String {
        self.operations.join("_")
    }

    /// e.g. `CreateUpdate`
    pub fn operations_camel(&self) -> String {
        self.operations_string().to_pascal_case()
    }

    /// Registration key shared by the builder and handler of this webhook,
    /// e.g. `mutating-create-update-firstmate`.
    pub fn builder_name(&self, kind: &str) -> String {
        format!(
            "{}-{}-{}",
            self.admission_type,
            self.operations.join("-"),
            kind.to_lowercase()
        )
    }
}
