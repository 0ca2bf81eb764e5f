//! FloatingIpClient trait for mocking
//!
//! The concrete `DigitalOceanClient` implements this trait; tests use
//! `MockFloatingIpClient` instead.

use crate::error::FloatingIpError;
use crate::models::{Action, DropletId, FloatingIp};

/// Trait for floating IP control-plane operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait FloatingIpClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Read the current state of a floating IP
    async fn get_floating_ip(&self, address: &str) -> Result<FloatingIp, FloatingIpError>;

    /// Request assignment of a floating IP to a droplet.
    ///
    /// Returns the provider action tracking the rebinding.
    async fn assign(&self, address: &str, droplet_id: DropletId) -> Result<Action, FloatingIpError>;

    /// Read the status of a floating IP action
    async fn get_action(&self, address: &str, action_id: u64) -> Result<Action, FloatingIpError>;
}
