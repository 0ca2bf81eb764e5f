//! Daemon error types.
//!
//! Configuration and identity errors are fatal: `main` returns them and the
//! process exits non-zero. `FloatingIp` errors are transient and only ever
//! end the current read, attempt, or poll.

use floating_ip_client::FloatingIpError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the self-assignment daemon.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Missing, contradictory, or out-of-range configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Token file could not be read
    #[error("Cannot read token file {path}: {source}")]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata service unreachable or returned a non-success status
    #[error("Cannot get droplet id from metadata service: {0}")]
    Metadata(String),

    /// Metadata service answered with something that is not a droplet id
    #[error("Droplet id format error: {0}")]
    MalformedIdentity(String),

    /// Floating IP API error
    #[error("Floating IP API error: {0}")]
    FloatingIp(#[from] FloatingIpError),
}
