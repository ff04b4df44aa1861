//! Object model
//!
//! Two distinct payload types cross the handler boundary and they are
//! deliberately not unified: the mutating path exchanges raw
//! [`ObjectEnvelope`] bytes with the store, while the read path serves
//! decoded [`TypedObject`] values out of the local cache. An envelope is a
//! store round trip; a typed object is cached decoded state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque byte payload for create/update requests and their responses.
///
/// The handler forwards these bytes verbatim in both directions and never
/// deserializes them; the accessors below exist for callers that want to
/// inspect what the store returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEnvelope {
    raw: Vec<u8>,
}

impl ObjectEnvelope {
    /// Wrap raw bytes in an envelope.
    pub fn new(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// Serialize a JSON value into an envelope.
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Ok(Self {
            raw: serde_json::to_vec(value)?,
        })
    }

    /// Borrow the raw payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Consume the envelope, yielding the raw payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// Caller-side convenience: decode the payload as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::from_slice(&self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl From<Vec<u8>> for ObjectEnvelope {
    fn from(raw: Vec<u8>) -> Self {
        Self::new(raw)
    }
}

/// Standard object metadata as held by the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

/// A decoded store object as returned by the read path.
///
/// Everything outside the identity fields (spec, status, data, ...) is
/// retained untyped in `body`, so a single type covers every kind the
/// registry knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedObject {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub body: Value,
}

impl Default for TypedObject {
    fn default() -> Self {
        Self {
            api_version: String::new(),
            kind: String::new(),
            metadata: ObjectMeta::default(),
            // flattened fields must serialize as a map, so the empty body
            // is an empty object rather than null
            body: Value::Object(serde_json::Map::new()),
        }
    }
}

impl TypedObject {
    /// Decode an object from its JSON representation.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }
}

/// Deletion cascade behavior requested from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationPolicy {
    /// Orphan the dependents.
    Orphan,
    /// Delete the object, let the store collect dependents asynchronously.
    Background,
    /// Delete dependents before the object itself.
    Foreground,
}

/// Caller-supplied options carried as the body of a delete request.
///
/// Whether the store honors every field is store-specific; the handler
/// forwards the document without interpreting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation_policy: Option<PropagationPolicy>,
    /// Expected resource version; the store rejects the delete on mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precondition_resource_version: Option<String>,
}
