//! Error types for the reconciler
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// The public-IP lookup service was unreachable or timed out
    #[error("network error: {0}")]
    Network(String),

    /// A response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The provider's record-listing call returned a non-success status
    #[error("provider query failed: {0}")]
    ProviderQuery(String),

    /// The provider's create/update call returned a non-success status
    #[error("provider write failed: {0}")]
    ProviderWrite(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a malformed-response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a provider query error
    pub fn provider_query(msg: impl Into<String>) -> Self {
        Self::ProviderQuery(msg.into())
    }

    /// Create a provider write error
    pub fn provider_write(msg: impl Into<String>) -> Self {
        Self::ProviderWrite(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
