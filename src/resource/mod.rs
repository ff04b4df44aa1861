//! Kind resolution layer
//!
//! Descriptors for every supported kind are loaded from JSON files at
//! compile time, allowing new kinds to be added without code changes.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches kind descriptors from embedded JSON
//!
//! # Descriptor Definitions
//!
//! Kinds are defined in JSON files under `src/resources/`, one file per
//! API group family:
//! - `core.json` - core/v1 kinds (pods, services, namespaces, nodes)
//! - `apps.json` - workload kinds (deployments, statefulsets)
//! - `batch.json` - jobs and cronjobs
//! - `networking.json` - ingresses and network policies
//! - `rbac.json` - roles and bindings

pub mod registry;

pub use registry::{all_kinds, get_descriptor, GroupVersionResource, ResourceDescriptor};
