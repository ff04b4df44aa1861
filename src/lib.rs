//! kubegate - resource-access facade for Kubernetes-style control planes
//!
//! One handler unifies strongly consistent mutations (create/update/
//! delete, live against the store) with low-latency reads (get/list,
//! served from a locally synchronized cache). A string kind name resolves
//! through a static registry to the wire resource and its namespace
//! scoping rule; the consistency tier is chosen by the operation, never by
//! the caller.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kubegate::cache::{CacheCoordinator, CacheSyncer};
//! use kubegate::cluster::auth::ClusterCredentials;
//! use kubegate::cluster::client::ClusterClient;
//! use kubegate::ResourceHandler;
//!
//! async fn example() -> kubegate::Result<()> {
//!     let client = Arc::new(ClusterClient::new(
//!         "https://cluster.example:6443",
//!         ClusterCredentials::anonymous(),
//!     )?);
//!     let cache = Arc::new(CacheCoordinator::new());
//!     cache.register(kubegate::resource::get_descriptor("Pod").unwrap().gvr.clone());
//!     CacheSyncer::new(client.clone(), cache.clone()).sync_once().await;
//!
//!     let handler = ResourceHandler::new(client, cache);
//!     let pod = handler.get("Pod", "default", "web-0")?;
//!     println!("{}", pod.name());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cluster;
pub mod config;
pub mod error;
pub mod handler;
pub mod object;
pub mod resource;
pub mod selector;

pub use error::{Error, Result};
pub use handler::{ResourceHandler, TransportClient};
pub use object::{DeleteOptions, ObjectEnvelope, ObjectMeta, PropagationPolicy, TypedObject};
pub use selector::Selector;
