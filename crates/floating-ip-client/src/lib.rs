//! Floating IP REST API Client
//!
//! A Rust client for the DigitalOcean floating IP API: read a floating IP's
//! current assignment, request assignment to a droplet, and poll the
//! resulting asynchronous action.
//!
//! # Example
//!
//! ```no_run
//! use floating_ip_client::{ActionStatus, DigitalOceanClient, DropletId, DEFAULT_API_URL};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DigitalOceanClient::new(
//!     DEFAULT_API_URL.to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! let fip = client.get_floating_ip("45.55.96.47").await?;
//! if !fip.is_assigned_to(DropletId(3164444)) {
//!     let action = client.assign("45.55.96.47", DropletId(3164444)).await?;
//!     let action = client.get_action("45.55.96.47", action.id).await?;
//!     assert_ne!(action.status, ActionStatus::Errored);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod floating_ip_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::{DigitalOceanClient, DEFAULT_API_URL};
pub use common::HttpClient;
pub use error::FloatingIpError;
pub use models::*;
pub use floating_ip_trait::FloatingIpClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockFloatingIpClient};
