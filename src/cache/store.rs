//! Indexed object replica
//!
//! One [`ObjectStore`] holds the decoded objects of a single resource,
//! keyed by `(namespace, name)`. The synchronizer swaps contents in bulk;
//! readers observe whatever the store holds at call time.

use crate::object::TypedObject;
use crate::selector::Selector;
use std::collections::HashMap;
use std::sync::RwLock;

/// Index key for a cached object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    /// `None` for cluster-scoped objects
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }

    fn for_object(object: &TypedObject) -> Self {
        Self {
            namespace: object.metadata.namespace.clone(),
            name: object.metadata.name.clone(),
        }
    }
}

/// In-memory replica of one resource's objects
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: RwLock<HashMap<ObjectKey, TypedObject>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single object
    pub fn get(&self, namespace: Option<&str>, name: &str) -> Option<TypedObject> {
        self.objects
            .read()
            .expect("object store lock poisoned")
            .get(&ObjectKey::new(namespace, name))
            .cloned()
    }

    /// List objects, scoped to one namespace when given, filtered by the
    /// selector. Results are ordered by namespace then name so repeated
    /// listings are stable.
    pub fn list(&self, namespace: Option<&str>, selector: &Selector) -> Vec<TypedObject> {
        let objects = self.objects.read().expect("object store lock poisoned");
        let mut matched: Vec<TypedObject> = objects
            .iter()
            .filter(|(key, _)| match namespace {
                Some(ns) => key.namespace.as_deref() == Some(ns),
                None => true,
            })
            .filter(|(_, object)| selector.matches(object.labels()))
            .map(|(_, object)| object.clone())
            .collect();

        matched.sort_by(|a, b| {
            (a.namespace(), a.name()).cmp(&(b.namespace(), b.name()))
        });
        matched
    }

    /// Replace the entire contents with a fresh listing
    pub fn replace_all(&self, objects: Vec<TypedObject>) {
        let replacement: HashMap<ObjectKey, TypedObject> = objects
            .into_iter()
            .map(|object| (ObjectKey::for_object(&object), object))
            .collect();
        *self.objects.write().expect("object store lock poisoned") = replacement;
    }

    /// Insert or overwrite a single object
    pub fn insert(&self, object: TypedObject) {
        self.objects
            .write()
            .expect("object store lock poisoned")
            .insert(ObjectKey::for_object(&object), object);
    }

    /// Drop a single object
    pub fn remove(&self, namespace: Option<&str>, name: &str) {
        self.objects
            .write()
            .expect("object store lock poisoned")
            .remove(&ObjectKey::new(namespace, name));
    }

    pub fn len(&self) -> usize {
        self.objects
            .read()
            .expect("object store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(namespace: &str, name: &str, labels: &[(&str, &str)]) -> TypedObject {
        let labels: serde_json::Map<String, serde_json::Value> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        TypedObject::from_value(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {"name": name, "namespace": namespace, "labels": labels}
        }))
        .unwrap()
    }

    #[test]
    fn test_get_is_namespace_scoped() {
        let store = ObjectStore::new();
        store.insert(pod("ns1", "p1", &[]));

        assert!(store.get(Some("ns1"), "p1").is_some());
        assert!(store.get(Some("ns2"), "p1").is_none());
        assert!(store.get(None, "p1").is_none());
    }

    #[test]
    fn test_list_filters_by_namespace_and_selector() {
        let store = ObjectStore::new();
        store.insert(pod("ns1", "web-1", &[("app", "web")]));
        store.insert(pod("ns1", "api-1", &[("app", "api")]));
        store.insert(pod("ns2", "web-2", &[("app", "web")]));

        let selector = Selector::parse("app=web").unwrap();
        let matched = store.list(Some("ns1"), &selector);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name(), "web-1");

        let all_namespaces = store.list(None, &selector);
        assert_eq!(all_namespaces.len(), 2);
    }

    #[test]
    fn test_list_order_is_stable() {
        let store = ObjectStore::new();
        store.insert(pod("ns1", "b", &[]));
        store.insert(pod("ns1", "a", &[]));

        let listed = store.list(Some("ns1"), &Selector::everything());
        let names: Vec<&str> = listed.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_replace_all_swaps_contents() {
        let store = ObjectStore::new();
        store.insert(pod("ns1", "old", &[]));

        store.replace_all(vec![pod("ns1", "new-1", &[]), pod("ns1", "new-2", &[])]);
        assert_eq!(store.len(), 2);
        assert!(store.get(Some("ns1"), "old").is_none());
        assert!(store.get(Some("ns1"), "new-1").is_some());
    }

    #[test]
    fn test_remove() {
        let store = ObjectStore::new();
        store.insert(pod("ns1", "p1", &[]));
        store.remove(Some("ns1"), "p1");
        assert!(store.is_empty());
    }
}
