//! Cache coordinator
//!
//! Hands out per-resource store accessors to the read path. A store must
//! be registered before the handler can serve reads for its resource;
//! asking for an unregistered resource fails with `CacheUnavailable`.

use super::store::ObjectStore;
use crate::error::{Error, Result};
use crate::resource::GroupVersionResource;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of per-resource object stores
#[derive(Debug, Default)]
pub struct CacheCoordinator {
    stores: RwLock<HashMap<GroupVersionResource, Arc<ObjectStore>>>,
}

impl CacheCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, creating its store if needed. Idempotent;
    /// returns the (existing or fresh) store so callers can seed it.
    pub fn register(&self, gvr: GroupVersionResource) -> Arc<ObjectStore> {
        self.stores
            .write()
            .expect("coordinator lock poisoned")
            .entry(gvr)
            .or_insert_with(|| Arc::new(ObjectStore::new()))
            .clone()
    }

    /// Accessor for a registered resource's store
    pub fn accessor_for(&self, gvr: &GroupVersionResource) -> Result<Arc<ObjectStore>> {
        self.stores
            .read()
            .expect("coordinator lock poisoned")
            .get(gvr)
            .cloned()
            .ok_or_else(|| Error::CacheUnavailable(gvr.to_string()))
    }

    /// Snapshot of every registered resource and its store, for the
    /// synchronizer's relist pass
    pub fn registered(&self) -> Vec<(GroupVersionResource, Arc<ObjectStore>)> {
        self.stores
            .read()
            .expect("coordinator lock poisoned")
            .iter()
            .map(|(gvr, store)| (gvr.clone(), store.clone()))
            .collect()
    }
}
