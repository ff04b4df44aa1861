//! Cluster client
//!
//! Combines credentials, the HTTP client and the API-server base URL, and
//! turns resource identities into request paths: core-group resources live
//! under `/api/{version}`, named groups under `/apis/{group}/{version}`,
//! with a `namespaces/{namespace}` segment for namespaced targets.

use super::auth::ClusterCredentials;
use super::http::ClusterHttpClient;
use crate::error::{Error, Result};
use crate::handler::TransportClient;
use crate::resource::GroupVersionResource;
use async_trait::async_trait;
use url::Url;

/// Live client against the backing store
#[derive(Clone)]
pub struct ClusterClient {
    credentials: ClusterCredentials,
    http: ClusterHttpClient,
    base: Url,
}

impl ClusterClient {
    /// Create a new client for the API server at `server`
    pub fn new(server: &str, credentials: ClusterCredentials) -> Result<Self> {
        let base = Url::parse(server)
            .map_err(|e| Error::transport(None, format!("Invalid server URL {server:?}: {e}")))?;

        Ok(Self {
            credentials,
            http: ClusterHttpClient::new()?,
            base,
        })
    }

    /// Build the request URL for a resource collection or a named object
    fn resource_url(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: Option<&str>,
    ) -> String {
        let mut url = format!(
            "{}{}",
            self.base.as_str().trim_end_matches('/'),
            gvr.api_path()
        );
        if let Some(namespace) = namespace {
            url.push_str("/namespaces/");
            url.push_str(&urlencoding::encode(namespace));
        }
        url.push('/');
        url.push_str(&gvr.resource);
        if let Some(name) = name {
            url.push('/');
            url.push_str(&urlencoding::encode(name));
        }
        url
    }

    /// Fetch a resource collection, optionally scoped to one namespace.
    /// Used by the cache synchronizer; the handler itself never issues
    /// reads against the live store.
    pub async fn list_raw(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
    ) -> Result<Vec<u8>> {
        let token = self.credentials.resolve()?;
        self.http
            .get(&self.resource_url(gvr, namespace, None), token.as_deref())
            .await
    }
}

#[async_trait]
impl TransportClient for ClusterClient {
    async fn post(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        let token = self.credentials.resolve()?;
        self.http
            .post(
                &self.resource_url(gvr, namespace, None),
                token.as_deref(),
                body,
                headers,
            )
            .await
    }

    async fn put(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        let token = self.credentials.resolve()?;
        self.http
            .put(
                &self.resource_url(gvr, namespace, Some(name)),
                token.as_deref(),
                body,
                headers,
            )
            .await
    }

    async fn delete(
        &self,
        gvr: &GroupVersionResource,
        namespace: Option<&str>,
        name: &str,
        body: Vec<u8>,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        let token = self.credentials.resolve()?;
        self.http
            .delete(
                &self.resource_url(gvr, namespace, Some(name)),
                token.as_deref(),
                body,
                headers,
            )
            .await
    }
}
