//! Local read cache
//!
//! The read path of the facade is served entirely from here: a set of
//! per-resource indexed replicas, registered up front and refreshed in the
//! background. Readers trade freshness for latency; no staleness bound is
//! enforced.
//!
//! # Architecture
//!
//! - [`store`] - One indexed replica per resource, keyed by `(namespace, name)`
//! - [`coordinator`] - Registration and accessor lookup for the handler
//! - [`sync`] - Background relist loop populating the stores

pub mod coordinator;
pub mod store;
pub mod sync;

pub use coordinator::CacheCoordinator;
pub use store::{ObjectKey, ObjectStore};
pub use sync::{CacheSyncer, DEFAULT_RESYNC_INTERVAL};
