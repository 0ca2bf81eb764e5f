//! Droplet identity lookup via the local metadata service.
//!
//! Runs once at startup. Any failure is fatal: the daemon must never start
//! assigning the floating IP without knowing which droplet it is.

use crate::error::ControllerError;
use floating_ip_client::DropletId;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Link-local droplet metadata endpoint
pub const DEFAULT_METADATA_URL: &str = "http://169.254.169.254";

/// Client for the droplet metadata service
#[derive(Debug)]
pub struct MetadataClient {
    client: Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a new metadata client
    pub fn new(base_url: &str) -> Result<Self, ControllerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ControllerError::Metadata(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve this droplet's id.
    ///
    /// Reads `/metadata/v1/id` and parses the first line of the body as an
    /// unsigned integer.
    pub async fn resolve_instance_identity(&self) -> Result<DropletId, ControllerError> {
        let url = format!("{}/metadata/v1/id", self.base_url);
        debug!("Getting this droplet's id from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ControllerError::Metadata(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ControllerError::Metadata(e.to_string()))?;

        if !status.is_success() {
            return Err(ControllerError::Metadata(format!(
                "status code {}: {}",
                status,
                body.trim()
            )));
        }

        let first_line = body.lines().next().unwrap_or_default().trim();
        let droplet_id = first_line
            .parse::<DropletId>()
            .map_err(|e| ControllerError::MalformedIdentity(format!("{:?}: {}", first_line, e)))?;

        debug!("Got this droplet's id: {}", droplet_id);
        Ok(droplet_id)
    }
}
