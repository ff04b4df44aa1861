//! Error taxonomy
//!
//! Every fallible operation in this crate surfaces one of the variants
//! below. Errors are returned to the caller unmodified: no retries, no
//! backoff, no partial-success handling.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the resource handler and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested kind has no descriptor in the registry. Raised before
    /// any I/O is attempted.
    #[error("resource kind {0:?} is not supported")]
    UnsupportedKind(String),

    /// A mutating call was rejected by the store, or the request never
    /// completed. Wraps the store's status code and message verbatim.
    #[error("transport error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Transport {
        /// HTTP status of the rejection, when a response was received.
        status: Option<u16>,
        message: String,
    },

    /// Cache lookup found no matching entry.
    #[error("{kind} {name:?} not found{}", .namespace.as_deref().map(|ns| format!(" in namespace {ns:?}")).unwrap_or_default())]
    NotFound {
        kind: String,
        namespace: Option<String>,
        name: String,
    },

    /// No cache replica exists for the resolved resource, so the read
    /// path cannot serve the request.
    #[error("cache for {0} is not available")]
    CacheUnavailable(String),

    /// The label selector string failed to parse.
    #[error("invalid label selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl Error {
    /// Build a `Transport` error from a status code and response body.
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Transport {
            status,
            message: message.into(),
        }
    }
}
