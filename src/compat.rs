//! Compatibility rules between resource scope and webhook configuration.
//!
//! | Rule | Condition                                                     | Outcome      |
//! |------|---------------------------------------------------------------|--------------|
//! | C1   | cluster-scoped resource with a namespace selector             | incompatible |
//! |      | (except the core `Namespace` kind, matched on its own labels) |              |
//! | C2   | cluster-scoped resource with the `connect` operation          | incompatible |
//! | C3   | everything else                                               | compatible   |

use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::webhook::{Operation, WebhookConfig};

/// Kind whose objects are matched against a namespace selector by their own labels.
const NAMESPACE_KIND: &str = "Namespace";

/// Checks one resource/webhook pairing against the compatibility table.
///
/// # Errors
/// * `Error::IncompatibleDescriptor` naming the violated rule
pub fn check(resource: &Resource, webhook: &WebhookConfig) -> Result<()> {
    if resource.namespaced() {
        return Ok(());
    }

    let is_namespace_kind = resource.is_core() && resource.kind() == NAMESPACE_KIND;
    if !webhook.namespace_selector().is_empty() && !is_namespace_kind {
        return Err(Error::IncompatibleDescriptor(format!(
            "cluster-scoped kind {} cannot be filtered by a namespace selector",
            resource.kind()
        )));
    }

    if webhook.operations().contains(Operation::Connect) {
        return Err(Error::IncompatibleDescriptor(format!(
            "operation connect only applies to namespaced subresources, {} is cluster-scoped",
            resource.kind()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::{AdmissionType, Operations};
    use indexmap::IndexMap;

    fn hook(ty: AdmissionType, ops: &str) -> WebhookConfig {
        WebhookConfig::new(ty, Operations::parse_list(ops).unwrap(), "default").unwrap()
    }

    fn selector() -> IndexMap<String, String> {
        IndexMap::from([("env".to_string(), "prod".to_string())])
    }

    #[test]
    fn test_cluster_scoped_plain_operations_are_compatible() {
        let kraken = Resource::new("creatures", "v2alpha1", "Kraken", false, false).unwrap();
        assert!(check(&kraken, &hook(AdmissionType::Validating, "create")).is_ok());
        assert!(check(&kraken, &hook(AdmissionType::Mutating, "create,update,delete")).is_ok());
    }

    #[test]
    fn test_cluster_scoped_with_namespace_selector() {
        let kraken = Resource::new("creatures", "v2alpha1", "Kraken", false, false).unwrap();
        let filtered = hook(AdmissionType::Validating, "create")
            .with_namespace_selector(selector())
            .unwrap();
        assert!(matches!(check(&kraken, &filtered), Err(Error::IncompatibleDescriptor(_))));

        let namespace = Resource::new("core", "v1", "Namespace", false, false).unwrap();
        assert!(check(&namespace, &filtered).is_ok());
    }

    #[test]
    fn test_connect_requires_namespaced_resource() {
        let kraken = Resource::new("creatures", "v2alpha1", "Kraken", false, false).unwrap();
        let connect = hook(AdmissionType::Validating, "connect");
        assert!(matches!(check(&kraken, &connect), Err(Error::IncompatibleDescriptor(_))));

        let mate = Resource::new("crew", "v1", "FirstMate", true, true).unwrap();
        assert!(check(&mate, &connect).is_ok());
    }
}
