//! Floating IP client errors

use thiserror::Error;

/// Errors that can occur when talking to the floating IP API.
///
/// The daemon treats every variant as transient: a failed call abandons the
/// current read, attempt, or poll, never the process.
#[derive(Debug, Error)]
pub enum FloatingIpError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token rejected (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Floating IP or action does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}
