//! Cache synchronization
//!
//! Keeps registered stores populated by periodically relisting each
//! resource from the live store and swapping the replica's contents. The
//! handler never waits on this loop; a failed relist is logged and the
//! store keeps serving its previous contents.

use super::coordinator::CacheCoordinator;
use super::store::ObjectStore;
use crate::cluster::client::ClusterClient;
use crate::error::{Error, Result};
use crate::object::TypedObject;
use crate::resource::GroupVersionResource;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default interval between full relists
pub const DEFAULT_RESYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Background relist loop over every registered resource
pub struct CacheSyncer {
    client: Arc<ClusterClient>,
    coordinator: Arc<CacheCoordinator>,
}

impl CacheSyncer {
    pub fn new(client: Arc<ClusterClient>, coordinator: Arc<CacheCoordinator>) -> Self {
        Self {
            client,
            coordinator,
        }
    }

    /// Relist every registered resource once, concurrently. Returns the
    /// number of stores refreshed; failed relists are logged and skipped.
    pub async fn sync_once(&self) -> usize {
        let targets = self.coordinator.registered();
        let relists = targets
            .iter()
            .map(|(gvr, store)| self.relist(gvr, store));

        let mut refreshed = 0;
        for (result, (gvr, _)) in join_all(relists).await.into_iter().zip(&targets) {
            match result {
                Ok(count) => {
                    tracing::debug!("Synced {} objects for {}", count, gvr);
                    refreshed += 1;
                }
                Err(e) => {
                    tracing::error!("Relist failed for {}: {}", gvr, e);
                }
            }
        }
        refreshed
    }

    /// Run the resync loop until the task is dropped
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.sync_once().await;
        }
    }

    async fn relist(&self, gvr: &GroupVersionResource, store: &ObjectStore) -> Result<usize> {
        let bytes = self.client.list_raw(gvr, None).await?;
        let objects = decode_list(&bytes)?;
        let count = objects.len();
        store.replace_all(objects);
        Ok(count)
    }
}

/// Decode a list response (`{"apiVersion", "kind": "...List", "items": [...]}`)
/// into typed objects. Items inherit the list's apiVersion and singular
/// kind when they do not carry their own.
fn decode_list(bytes: &[u8]) -> Result<Vec<TypedObject>> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::transport(None, format!("Failed to parse list response: {e}")))?;

    let api_version = document
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let item_kind = document
        .get("kind")
        .and_then(Value::as_str)
        .and_then(|kind| kind.strip_suffix("List"))
        .unwrap_or_default()
        .to_string();

    let Some(items) = document.get("items").and_then(Value::as_array) else {
        return Err(Error::transport(
            None,
            "List response has no items array".to_string(),
        ));
    };

    let mut objects = Vec::with_capacity(items.len());
    for item in items {
        let mut object = TypedObject::from_value(item.clone())
            .map_err(|e| Error::transport(None, format!("Failed to decode list item: {e}")))?;
        if object.api_version.is_empty() {
            object.api_version = api_version.clone();
        }
        if object.kind.is_empty() {
            object.kind = item_kind.clone();
        }
        objects.push(object);
    }
    Ok(objects)
}
