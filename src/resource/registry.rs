//! Kind Registry - Load resource descriptors from JSON
//!
//! This module loads the descriptors for every supported kind from
//! embedded JSON files and provides lookup functions for the rest of the
//! crate. The registry is populated once at first access and never
//! mutated afterwards; a kind missing from it makes every handler
//! operation fail fast.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Embedded descriptor JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/core.json"),
    include_str!("../resources/apps.json"),
    include_str!("../resources/batch.json"),
    include_str!("../resources/networking.json"),
    include_str!("../resources/rbac.json"),
];

/// Wire identity of a resource: API group, version and plural name.
///
/// The core API group is the empty string and is served under `/api`;
/// every other group is served under `/apis/{group}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct GroupVersionResource {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl GroupVersionResource {
    /// URL prefix for this group/version, without a trailing slash.
    pub fn api_path(&self) -> String {
        if self.group.is_empty() {
            format!("/api/{}", self.version)
        } else {
            format!("/apis/{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.resource)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.resource)
        }
    }
}

/// Descriptor for a single kind, as declared in resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(flatten)]
    pub gvr: GroupVersionResource,
    /// Whether objects of this kind live inside a namespace.
    pub namespaced: bool,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct RegistryConfig {
    #[serde(default)]
    kinds: HashMap<String, ResourceDescriptor>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<HashMap<String, ResourceDescriptor>> = OnceLock::new();

/// Get the kind registry (loads from embedded JSON on first access)
fn get_registry() -> &'static HashMap<String, ResourceDescriptor> {
    REGISTRY.get_or_init(|| {
        let mut kinds = HashMap::new();

        for content in RESOURCE_FILES {
            let partial: RegistryConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            kinds.extend(partial.kinds);
        }

        kinds
    })
}

/// Get the descriptor for a kind, if the kind is supported
pub fn get_descriptor(kind: &str) -> Option<&'static ResourceDescriptor> {
    get_registry().get(kind)
}

/// Get all supported kind names (for autocomplete and the `kinds` command)
pub fn all_kinds() -> Vec<&'static str> {
    let mut kinds: Vec<&'static str> = get_registry().keys().map(|s| s.as_str()).collect();
    kinds.sort_unstable();
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert!(!registry.is_empty(), "Registry should have kinds");
    }

    #[test]
    fn test_pod_descriptor_exists() {
        let descriptor = get_descriptor("Pod");
        assert!(descriptor.is_some(), "Pod descriptor should exist");

        let descriptor = descriptor.unwrap();
        assert_eq!(descriptor.gvr.group, "");
        assert_eq!(descriptor.gvr.version, "v1");
        assert_eq!(descriptor.gvr.resource, "pods");
        assert!(descriptor.namespaced);
    }

    #[test]
    fn test_node_is_cluster_scoped() {
        let descriptor = get_descriptor("Node").unwrap();
        assert!(!descriptor.namespaced);
    }

    #[test]
    fn test_named_group_api_path() {
        let descriptor = get_descriptor("Deployment").unwrap();
        assert_eq!(descriptor.gvr.api_path(), "/apis/apps/v1");
        assert_eq!(descriptor.gvr.to_string(), "apps/v1/deployments");
    }

    #[test]
    fn test_core_group_api_path() {
        let descriptor = get_descriptor("Pod").unwrap();
        assert_eq!(descriptor.gvr.api_path(), "/api/v1");
        assert_eq!(descriptor.gvr.to_string(), "v1/pods");
    }

    #[test]
    fn test_all_kinds() {
        let kinds = all_kinds();
        assert!(!kinds.is_empty(), "Should have kinds");
        assert!(kinds.contains(&"Pod"), "Should contain Pod");
        assert!(kinds.contains(&"Deployment"), "Should contain Deployment");
    }

    #[test]
    fn test_unknown_kind_is_absent() {
        assert!(get_descriptor("FlexVolume").is_none());
    }
}
