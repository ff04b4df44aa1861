//! Configuration Management
//!
//! Handles persistent configuration storage for kubegate: where the API
//! server lives, how to authenticate against it, and cache resync pacing.

use crate::cluster::auth::ClusterCredentials;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the configured server URL
pub const SERVER_ENV_VAR: &str = "KUBEGATE_SERVER";

/// Default API server when nothing is configured
const DEFAULT_SERVER: &str = "https://127.0.0.1:6443";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API server base URL
    #[serde(default)]
    pub server: Option<String>,
    /// Static bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Path to a bearer token file (re-read per request)
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Default namespace for namespaced operations
    #[serde(default)]
    pub namespace: Option<String>,
    /// Seconds between cache relists
    #[serde(default)]
    pub resync_secs: Option<u64>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kubegate").join("config.yaml"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective server URL (env > config > default)
    pub fn effective_server(&self) -> String {
        if let Ok(server) = std::env::var(SERVER_ENV_VAR) {
            if !server.is_empty() {
                return server;
            }
        }
        self.server
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }

    /// Get effective default namespace
    pub fn effective_namespace(&self) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| "default".to_string())
    }

    /// Interval between cache relists
    pub fn resync_interval(&self) -> Duration {
        self.resync_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::cache::DEFAULT_RESYNC_INTERVAL)
    }

    /// Build transport credentials from the configured token sources
    pub fn credentials(&self) -> ClusterCredentials {
        if let Some(token) = &self.token {
            ClusterCredentials::with_token(token)
        } else if let Some(path) = &self.token_file {
            ClusterCredentials::from_token_file(path)
        } else {
            ClusterCredentials::anonymous()
        }
    }

    /// Set server and save
    pub fn set_server(&mut self, server: &str) -> Result<()> {
        self.server = Some(server.to_string());
        self.save()
    }

    /// Set default namespace and save
    pub fn set_namespace(&mut self, namespace: &str) -> Result<()> {
        self.namespace = Some(namespace.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unconfigured() {
        let config = Config::default();
        assert_eq!(config.effective_namespace(), "default");
        assert_eq!(config.resync_interval(), crate::cache::DEFAULT_RESYNC_INTERVAL);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config {
            server: Some("https://cluster.example:6443".to_string()),
            namespace: Some("team-a".to_string()),
            resync_secs: Some(60),
            ..Default::default()
        };
        let rendered = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.server.as_deref(), Some("https://cluster.example:6443"));
        assert_eq!(parsed.effective_namespace(), "team-a");
        assert_eq!(parsed.resync_interval(), Duration::from_secs(60));
    }
}
