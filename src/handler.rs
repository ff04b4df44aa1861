//! Resource router/handler
//!
//! The single entry point of the facade. Every operation resolves its kind
//! against the registry first, then dispatches to exactly one of two
//! paths:
//!
//! - mutating operations ([`create`](ResourceHandler::create),
//!   [`update`](ResourceHandler::update),
//!   [`delete`](ResourceHandler::delete)) go live against the store
//!   through the injected [`TransportClient`], so the caller knows the
//!   write actually took effect;
//! - read operations ([`get`](ResourceHandler::get),
//!   [`list`](ResourceHandler::list)) are served from the injected cache
//!   and never touch the transport, trading freshness for latency.
//!
//! The split is structural: the handler exposes no way to force a live
//! read or a cached write. The handler itself is stateless and safe for
//! unlimited concurrent callers.

use crate::cache::CacheCoordinator;
use crate::error::{Error, Result};
use crate::object::{DeleteOptions, ObjectEnvelope, TypedObject};
use crate::resource::{get_descriptor, GroupVersionResource, ResourceDescriptor};
use crate::selector::Selector;
use async_trait::async_trait;
use std::sync::Arc;

/// Content type declared on every mutating request body
const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

/// Verb-based transport against the backing store.
///
/// The trait surface deliberately has no read verb: the handler's read
/// path cannot reach the live store through it.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Create an object in a resource collection
    async fn post(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>>;

    /// Replace a named object
    async fn put(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>>;

    /// Delete a named object, carrying options as the request body
    async fn delete(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>>;
}

/// Unified handler for common operations on store resources
pub struct ResourceHandler {
    transport: Arc<dyn TransportClient>,
    cache: Arc<CacheCoordinator>,
}

impl ResourceHandler {
    /// Build a handler over an injected transport and cache. The handler
    /// holds both for the process lifetime and owns no other state.
    pub fn new(transport: Arc<dyn TransportClient>, cache: Arc<CacheCoordinator>) -> Self {
        Self { transport, cache }
    }

    /// Resolve a kind name to its descriptor. Fails fast with
    /// `UnsupportedKind` before any I/O when the registry has no entry.
    pub fn resolve(&self, kind: &str) -> Result<&'static ResourceDescriptor> {
        get_descriptor(kind).ok_or_else(|| Error::UnsupportedKind(kind.to_string()))
    }

    /// Create an object from the caller's raw payload.
    ///
    /// The response body is captured verbatim into the returned envelope.
    pub async fn create(
        &self,
        kind: &str,
        namespace: &str,
        object: &ObjectEnvelope,
    ) -> Result<ObjectEnvelope> {
        let descriptor = self.resolve(kind)?;
        let scope = descriptor.namespaced.then_some(namespace);
        let response = self
            .transport
            .post(
                &descriptor.gvr,
                scope,
                object.as_bytes().to_vec(),
                &[CONTENT_TYPE_JSON],
            )
            .await?;
        Ok(ObjectEnvelope::new(response))
    }

    /// Replace a named object with the caller's raw payload.
    ///
    /// `name` is not validated here; an unknown name surfaces the store's
    /// own rejection.
    pub async fn update(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        object: &ObjectEnvelope,
    ) -> Result<ObjectEnvelope> {
        let descriptor = self.resolve(kind)?;
        let scope = descriptor.namespaced.then_some(namespace);
        let response = self
            .transport
            .put(
                &descriptor.gvr,
                scope,
                name,
                object.as_bytes().to_vec(),
                &[CONTENT_TYPE_JSON],
            )
            .await?;
        Ok(ObjectEnvelope::new(response))
    }

    /// Delete a named object. Success is the absence of an error; any
    /// response payload from the store is discarded.
    pub async fn delete(
        &self,
        kind: &str,
        namespace: &str,
        name: &str,
        options: &DeleteOptions,
    ) -> Result<()> {
        let descriptor = self.resolve(kind)?;
        let scope = descriptor.namespaced.then_some(namespace);
        let body = serde_json::to_vec(options).map_err(|e| {
            Error::transport(None, format!("Failed to encode delete options: {e}"))
        })?;
        self.transport
            .delete(&descriptor.gvr, scope, name, body, &[CONTENT_TYPE_JSON])
            .await?;
        Ok(())
    }

    /// Get an object from the cache. Never touches the live store; the
    /// result may lag behind it.
    pub fn get(&self, kind: &str, namespace: &str, name: &str) -> Result<TypedObject> {
        let descriptor = self.resolve(kind)?;
        let accessor = self.cache.accessor_for(&descriptor.gvr)?;
        let scope = descriptor.namespaced.then_some(namespace);
        accessor.get(scope, name).ok_or_else(|| Error::NotFound {
            kind: kind.to_string(),
            namespace: scope.map(str::to_string),
            name: name.to_string(),
        })
    }

    /// List objects from the cache, filtered by a label selector string.
    ///
    /// The selector is parsed fresh before the cache is consulted; no
    /// objects matching is an empty result, not an error.
    pub fn list(
        &self,
        kind: &str,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<TypedObject>> {
        let descriptor = self.resolve(kind)?;
        let selector = match Selector::parse(label_selector) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::error!("Build label selector error: {}", e);
                return Err(e);
            }
        };
        let accessor = self.cache.accessor_for(&descriptor.gvr)?;
        let scope = descriptor.namespaced.then_some(namespace);
        Ok(accessor.list(scope, &selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown_kinds() {
        let handler = ResourceHandler::new(
            Arc::new(NoopTransport),
            Arc::new(CacheCoordinator::new()),
        );

        assert!(handler.resolve("Pod").is_ok());
        let err = handler.resolve("Gadget").unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(kind) if kind == "Gadget"));
    }

    #[test]
    fn test_create_captures_response_verbatim() {
        let handler = ResourceHandler::new(
            Arc::new(NoopTransport),
            Arc::new(CacheCoordinator::new()),
        );
        let envelope = ObjectEnvelope::new(br#"{"metadata":{"name":"web"}}"#.to_vec());

        let response =
            tokio_test::block_on(handler.create("Pod", "ns1", &envelope)).unwrap();
        assert_eq!(response.as_bytes(), envelope.as_bytes());
    }

    struct NoopTransport;

    #[async_trait]
    impl TransportClient for NoopTransport {
        async fn post(
            &self,
            _gvr: &GroupVersionResource,
            _namespace: Option<&str>,
            body: Vec<u8>,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>> {
            Ok(body)
        }

        async fn put(
            &self,
            _gvr: &GroupVersionResource,
            _namespace: Option<&str>,
            _name: &str,
            body: Vec<u8>,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>> {
            Ok(body)
        }

        async fn delete(
            &self,
            _gvr: &GroupVersionResource,
            _namespace: Option<&str>,
            _name: &str,
            _body: Vec<u8>,
            _headers: &[(&str, &str)],
        ) -> Result<Vec<u8>> {
            Ok(Vec::new())
        }
    }
}
