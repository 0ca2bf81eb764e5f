//! Floating IP API models
//!
//! These models match the DigitalOcean v2 API JSON bodies for floating IPs
//! and floating IP actions. Only the fields the daemon reads are modeled;
//! unknown fields are ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Provider-assigned droplet (compute instance) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropletId(pub u64);

impl fmt::Display for DropletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DropletId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(DropletId)
    }
}

/// Envelope for `GET /v2/floating_ips/{ip}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingIpResponse {
    pub floating_ip: FloatingIp,
}

/// Floating IP resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FloatingIp {
    pub ip: String,
    /// Droplet currently holding the IP, `None` when unassigned
    pub droplet: Option<NestedDroplet>,
    pub region: Option<NestedRegion>,
    #[serde(default)]
    pub locked: bool,
}

impl FloatingIp {
    /// Identifier of the droplet currently holding this IP
    #[must_use]
    pub fn holder(&self) -> Option<DropletId> {
        self.droplet.as_ref().map(|d| d.id)
    }

    /// Whether this IP is bound to `droplet_id`
    #[must_use]
    pub fn is_assigned_to(&self, droplet_id: DropletId) -> bool {
        self.holder() == Some(droplet_id)
    }
}

/// Droplet as embedded in a floating IP body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedDroplet {
    pub id: DropletId,
    #[serde(default)]
    pub name: String,
}

/// Region as embedded in a floating IP body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedRegion {
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

/// Envelope for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub action: Action,
}

/// Asynchronous provider action (here, rebinding a floating IP)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Action {
    pub id: u64,
    pub status: ActionStatus,
    #[serde(rename = "type", default)]
    pub action_type: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resource_id: Option<u64>,
    pub region_slug: Option<String>,
}

/// Action status.
///
/// The provider reports open-ended strings; anything not recognized maps to
/// `Unknown` and is treated by callers like `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStatus {
    /// `in-progress`
    Pending,
    /// `completed`
    Completed,
    /// `errored`
    Errored,
    /// Any other provider value
    Unknown(String),
}

impl ActionStatus {
    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ActionStatus::Pending => "in-progress",
            ActionStatus::Completed => "completed",
            ActionStatus::Errored => "errored",
            ActionStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for ActionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "in-progress" => ActionStatus::Pending,
            "completed" => ActionStatus::Completed,
            "errored" => ActionStatus::Errored,
            _ => ActionStatus::Unknown(s),
        }
    }
}

impl From<ActionStatus> for String {
    fn from(status: ActionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /v2/floating_ips/{ip}/actions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    #[serde(rename = "type")]
    pub action_type: String,
    pub droplet_id: DropletId,
}

impl AssignRequest {
    /// Assign the floating IP to `droplet_id`
    #[must_use]
    pub fn new(droplet_id: DropletId) -> Self {
        Self {
            action_type: "assign".to_string(),
            droplet_id,
        }
    }
}
