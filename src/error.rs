//! Error types for repository operations.
//!
//! A miss is never an error: lookups report absence through `Option`,
//! empty vectors or empty iterators. Everything in this enum is a real
//! failure and reaches the caller untouched.

use std::string::FromUtf8Error;
use std::time::Duration;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by repositories and backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection could not hand out a logical database.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A stored payload is not valid JSON for the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A scalar entry read as text is not valid UTF-8.
    #[error("stored value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// Error reported by the Redis client, passed through unmodified.
    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    /// The server did not answer within the configured connect timeout.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// Failure inside a non-Redis backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid connection configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures raised while decoding a stored value.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Deserialization(_) | Error::InvalidUtf8(_))
    }
}
