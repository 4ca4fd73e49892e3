//! Resource descriptor: the identity of the API type a webhook admits.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").unwrap());
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[1-9][0-9]*((alpha|beta)[1-9][0-9]*)?$").unwrap());
static KIND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

/// The legacy core group, e.g. `Namespace` or `Pod`.
pub const CORE_GROUP: &str = "core";

/// Groups whose types live in `k8s.io/api` instead of the project's own apis tree.
pub const BUILTIN_GROUPS: &[&str] = &[
    "admission",
    "admissionregistration",
    "apps",
    "auditregistration",
    "authentication",
    "authorization",
    "autoscaling",
    "batch",
    "certificates",
    "coordination",
    "core",
    "discovery",
    "events",
    "extensions",
    "imagepolicy",
    "networking",
    "node",
    "policy",
    "rbac",
    "scheduling",
    "settings",
    "storage",
];

/// Upstream module hosting the built-in API types.
const BUILTIN_PACKAGE: &str = "k8s.io/api";

/// Group/version/kind of an API type plus its scaffolding switches.
///
/// Immutable once built; every field is validated by [`Resource::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    group: String,
    version: String,
    kind: String,
    namespaced: bool,
    create_example_body: bool,
}

impl Resource {
    /// Creates a validated resource descriptor.
    ///
    /// # Errors
    /// * `Error::InvalidResource` if group, version or kind is empty or malformed
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        namespaced: bool,
        create_example_body: bool,
    ) -> Result<Self> {
        let group = group.into();
        let version = version.into();
        let kind = kind.into();

        check_field("group", &group, &GROUP_RE)?;
        check_field("version", &version, &VERSION_RE)?;
        check_field("kind", &kind, &KIND_RE)?;

        Ok(Self { group, version, kind, namespaced, create_example_body })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn namespaced(&self) -> bool {
        self.namespaced
    }

    pub fn create_example_body(&self) -> bool {
        self.create_example_body
    }

    /// Kind in lower case, the naming key for per-resource paths.
    pub fn lower_kind(&self) -> String {
        self.kind.to_lowercase()
    }

    /// Go import alias for the API package, e.g. `crewv1`.
    pub fn import_alias(&self) -> String {
        format!("{}{}", self.group.replace('-', ""), self.version)
    }

    pub fn is_core(&self) -> bool {
        self.group == CORE_GROUP
    }

    /// Whether the group ships with Kubernetes rather than with the project.
    pub fn is_builtin(&self) -> bool {
        BUILTIN_GROUPS.contains(&self.group.as_str())
    }

    /// Module path that contains the `{group}/{version}` API package.
    pub fn resource_package(&self, repo: &str) -> String {
        if self.is_builtin() {
            BUILTIN_PACKAGE.to_string()
        } else {
            format!("{repo}/pkg/apis")
        }
    }

    /// Full Go import path of the API package for this resource.
    pub fn import_path(&self, repo: &str) -> String {
        format!("{}/{}/{}", self.resource_package(repo), self.group, self.version)
    }
}

fn check_field(name: &str, value: &str, pattern: &Regex) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidResource(format!("{name} must not be empty")));
    }
    if !pattern.is_match(value) {
        return Err(Error::InvalidResource(format!(
            "{name} '{value}' does not match {}",
            pattern.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_names() {
        let res = Resource::new("crew", "v1", "FirstMate", true, true).unwrap();
        assert_eq!(res.lower_kind(), "firstmate");
        assert_eq!(res.import_alias(), "crewv1");
        assert_eq!(res.import_path("project"), "project/pkg/apis/crew/v1");
    }

    #[test]
    fn test_core_group_package() {
        let res = Resource::new("core", "v1", "Namespace", false, false).unwrap();
        assert!(res.is_core());
        assert!(res.is_builtin());
        assert_eq!(res.import_path("project"), "k8s.io/api/core/v1");
        assert_eq!(res.import_alias(), "corev1");
    }

    #[test]
    fn test_builtin_group_package() {
        let deployment = Resource::new("apps", "v1", "Deployment", true, false).unwrap();
        assert!(deployment.is_builtin());
        assert!(!deployment.is_core());
        assert_eq!(deployment.import_path("project"), "k8s.io/api/apps/v1");

        let job = Resource::new("batch", "v1", "Job", true, false).unwrap();
        assert_eq!(job.import_path("project"), "k8s.io/api/batch/v1");

        let mate = Resource::new("crew", "v1", "FirstMate", true, true).unwrap();
        assert!(!mate.is_builtin());
    }

    #[test]
    fn test_rejects_malformed_fields() {
        assert!(Resource::new("", "v1", "FirstMate", true, true).is_err());
        assert!(Resource::new("crew", "1", "FirstMate", true, true).is_err());
        assert!(Resource::new("crew", "v1", "firstMate", true, true).is_err());
        assert!(Resource::new("crew/x", "v1", "FirstMate", true, true).is_err());
        assert!(Resource::new("creatures", "v2alpha1", "Kraken", false, false).is_ok());
    }
}
