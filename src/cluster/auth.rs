//! Cluster authentication
//!
//! The API server is addressed with plain bearer tokens. Credentials are
//! resolved through a fallback chain: an explicitly configured token, the
//! environment, a configured token file, and finally the in-cluster
//! service-account token path.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no explicit token is configured
pub const TOKEN_ENV_VAR: &str = "KUBEGATE_TOKEN";

/// Token path mounted into pods running inside the cluster
const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Bearer-token credentials holder
#[derive(Debug, Clone, Default)]
pub struct ClusterCredentials {
    token: Option<String>,
    token_file: Option<PathBuf>,
}

impl ClusterCredentials {
    /// Credentials with an explicit token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            token_file: None,
        }
    }

    /// Credentials read from a token file on every request, so rotated
    /// tokens are picked up without a restart
    pub fn from_token_file(path: impl Into<PathBuf>) -> Self {
        Self {
            token: None,
            token_file: Some(path.into()),
        }
    }

    /// Credentials that send no Authorization header
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolve the bearer token to attach to the next request
    ///
    /// Fallback order: explicit token, `KUBEGATE_TOKEN`, configured token
    /// file, in-cluster service-account token. Returns `Ok(None)` when no
    /// source yields a token; a configured but unreadable token file is an
    /// error.
    pub fn resolve(&self) -> Result<Option<String>> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                return Ok(Some(token));
            }
        }

        if let Some(path) = &self.token_file {
            return read_token_file(path).map(Some);
        }

        let in_cluster = Path::new(SERVICE_ACCOUNT_TOKEN_PATH);
        if in_cluster.exists() {
            tracing::debug!("Using in-cluster service account token");
            return read_token_file(in_cluster).map(Some);
        }

        Ok(None)
    }
}

fn read_token_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            Error::transport(
                None,
                format!("Failed to read token file {}: {e}", path.display()),
            )
        })
}
