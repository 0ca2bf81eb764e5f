//! DigitalOcean API client
//!
//! Implements the floating IP endpoints of the DigitalOcean v2 REST API:
//! `/v2/floating_ips/{ip}` and `/v2/floating_ips/{ip}/actions`.

use crate::common::HttpClient;
use crate::error::FloatingIpError;
use crate::floating_ip_trait::FloatingIpClientTrait;
use crate::models::{
    Action, ActionResponse, AssignRequest, DropletId, FloatingIp, FloatingIpResponse,
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default DigitalOcean API endpoint
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// DigitalOcean floating IP client
#[derive(Debug)]
pub struct DigitalOceanClient {
    http: HttpClient,
}

impl DigitalOceanClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g., "https://api.digitalocean.com")
    /// * `token` - API token, sent as a bearer token
    pub fn new(base_url: String, token: String) -> Result<Self, FloatingIpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(FloatingIpError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Get a floating IP by address
    ///
    /// # Returns
    /// * `Ok(FloatingIp)` - current state, including the holding droplet if any
    /// * `Err(FloatingIpError)` - transport failure or non-2xx response
    pub async fn get_floating_ip(&self, address: &str) -> Result<FloatingIp, FloatingIpError> {
        debug!("Fetching floating IP {}", address);
        let resp: FloatingIpResponse = self
            .http
            .get(&format!("/v2/floating_ips/{}", address))
            .await?;
        Ok(resp.floating_ip)
    }

    /// Assign a floating IP to a droplet
    ///
    /// The provider answers immediately with an action; completion has to be
    /// polled with [`DigitalOceanClient::get_action`].
    pub async fn assign(
        &self,
        address: &str,
        droplet_id: DropletId,
    ) -> Result<Action, FloatingIpError> {
        debug!("Requesting assignment of floating IP {} to droplet {}", address, droplet_id);
        let body = serde_json::to_value(AssignRequest::new(droplet_id))?;
        let resp: ActionResponse = self
            .http
            .post(&format!("/v2/floating_ips/{}/actions", address), &body)
            .await?;
        Ok(resp.action)
    }

    /// Get a floating IP action by ID
    pub async fn get_action(
        &self,
        address: &str,
        action_id: u64,
    ) -> Result<Action, FloatingIpError> {
        let resp: ActionResponse = self
            .http
            .get(&format!("/v2/floating_ips/{}/actions/{}", address, action_id))
            .await?;
        Ok(resp.action)
    }
}

#[async_trait::async_trait]
impl FloatingIpClientTrait for DigitalOceanClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn get_floating_ip(&self, address: &str) -> Result<FloatingIp, FloatingIpError> {
        DigitalOceanClient::get_floating_ip(self, address).await
    }

    async fn assign(
        &self,
        address: &str,
        droplet_id: DropletId,
    ) -> Result<Action, FloatingIpError> {
        DigitalOceanClient::assign(self, address, droplet_id).await
    }

    async fn get_action(&self, address: &str, action_id: u64) -> Result<Action, FloatingIpError> {
        DigitalOceanClient::get_action(self, address, action_id).await
    }
}
