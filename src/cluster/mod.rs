//! Store-facing transport
//!
//! This module provides the live side of the facade: authentication, the
//! HTTP client and request-path construction against the API server.
//!
//! # Module Structure
//!
//! - [`auth`] - Bearer-token credential resolution
//! - [`client`] - Cluster client implementing the handler's transport seam
//! - [`http`] - HTTP utilities for raw-body REST calls
//!
//! # Example
//!
//! ```ignore
//! use kubegate::cluster::auth::ClusterCredentials;
//! use kubegate::cluster::client::ClusterClient;
//!
//! fn example() -> kubegate::Result<ClusterClient> {
//!     ClusterClient::new("https://cluster.example:6443", ClusterCredentials::anonymous())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
