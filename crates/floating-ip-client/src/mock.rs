//! Mock FloatingIpClient for unit testing
//!
//! In-memory implementation of `FloatingIpClientTrait` that can be scripted
//! to fail reads, assignments, and action polls, and that records every call
//! so tests can assert on the exact request sequence and its timing.

use crate::error::FloatingIpError;
use crate::floating_ip_trait::FloatingIpClientTrait;
use crate::models::{Action, ActionStatus, DropletId, FloatingIp, NestedDroplet};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetFloatingIp { address: String },
    Assign { address: String, droplet_id: DropletId },
    GetAction { address: String, action_id: u64 },
}

#[derive(Debug)]
struct MockState {
    floating_ips: HashMap<String, FloatingIp>,
    actions: HashMap<u64, (String, DropletId)>,
    read_failures: VecDeque<FloatingIpError>,
    assign_failures: VecDeque<FloatingIpError>,
    action_script: VecDeque<Result<ActionStatus, FloatingIpError>>,
    default_action_status: ActionStatus,
    calls: Vec<(Instant, MockCall)>,
    next_id: u64,
}

/// Mock FloatingIpClient for testing
///
/// Cloning shares the underlying state, so a test can hand one clone to the
/// code under test and inspect the other.
#[derive(Debug, Clone)]
pub struct MockFloatingIpClient {
    base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockFloatingIpClient {
    /// Create a new mock client.
    ///
    /// Actions report `completed` on their first poll unless scripted
    /// otherwise.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Arc::new(Mutex::new(MockState {
                floating_ips: HashMap::new(),
                actions: HashMap::new(),
                read_failures: VecDeque::new(),
                assign_failures: VecDeque::new(),
                action_script: VecDeque::new(),
                default_action_status: ActionStatus::Completed,
                calls: Vec::new(),
                next_id: 1,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a floating IP, optionally held by `holder`
    pub fn add_floating_ip(&self, address: &str, holder: Option<DropletId>) {
        let fip = FloatingIp {
            ip: address.to_string(),
            droplet: holder.map(|id| NestedDroplet {
                id,
                name: format!("droplet-{}", id),
            }),
            region: None,
            locked: false,
        };
        self.state().floating_ips.insert(address.to_string(), fip);
    }

    /// Current holder of a floating IP, as the mock sees it
    pub fn holder(&self, address: &str) -> Option<DropletId> {
        self.state().floating_ips.get(address).and_then(FloatingIp::holder)
    }

    /// Make the next `get_floating_ip` call fail with `error`
    pub fn push_read_failure(&self, error: FloatingIpError) {
        self.state().read_failures.push_back(error);
    }

    /// Make the next `count` `assign` calls fail
    pub fn push_assign_failures(&self, count: usize) {
        let mut state = self.state();
        for _ in 0..count {
            state
                .assign_failures
                .push_back(FloatingIpError::Api("assignment rejected".to_string()));
        }
    }

    /// Queue a result for the next `get_action` call
    pub fn push_action_status(&self, status: ActionStatus) {
        self.state().action_script.push_back(Ok(status));
    }

    /// Queue a failure for the next `get_action` call
    pub fn push_action_failure(&self, error: FloatingIpError) {
        self.state().action_script.push_back(Err(error));
    }

    /// Status returned once the action script is drained
    pub fn set_default_action_status(&self, status: ActionStatus) {
        self.state().default_action_status = status;
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    /// All recorded calls with the (tokio) instant they were made at
    pub fn timed_calls(&self) -> Vec<(Instant, MockCall)> {
        self.state().calls.clone()
    }

    /// Number of `assign` calls made
    pub fn assign_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Assign { .. }))
            .count()
    }

    /// Number of `get_action` calls made
    pub fn action_poll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::GetAction { .. }))
            .count()
    }

    /// Number of `get_floating_ip` calls made
    pub fn read_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::GetFloatingIp { .. }))
            .count()
    }

    /// Instants at which `assign` was called
    pub fn assign_instants(&self) -> Vec<Instant> {
        self.timed_calls()
            .into_iter()
            .filter(|(_, c)| matches!(c, MockCall::Assign { .. }))
            .map(|(at, _)| at)
            .collect()
    }

    fn action(id: u64, status: ActionStatus, droplet_id: DropletId) -> Action {
        Action {
            id,
            status,
            action_type: "assign_ip".to_string(),
            started_at: None,
            completed_at: None,
            resource_id: Some(droplet_id.0),
            region_slug: None,
        }
    }
}

#[async_trait::async_trait]
impl FloatingIpClientTrait for MockFloatingIpClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_floating_ip(&self, address: &str) -> Result<FloatingIp, FloatingIpError> {
        let mut state = self.state();
        state.calls.push((
            Instant::now(),
            MockCall::GetFloatingIp {
                address: address.to_string(),
            },
        ));
        if let Some(err) = state.read_failures.pop_front() {
            return Err(err);
        }
        state
            .floating_ips
            .get(address)
            .cloned()
            .ok_or_else(|| FloatingIpError::NotFound(format!("Floating IP {} not found", address)))
    }

    async fn assign(
        &self,
        address: &str,
        droplet_id: DropletId,
    ) -> Result<Action, FloatingIpError> {
        let mut state = self.state();
        state.calls.push((
            Instant::now(),
            MockCall::Assign {
                address: address.to_string(),
                droplet_id,
            },
        ));
        if let Some(err) = state.assign_failures.pop_front() {
            return Err(err);
        }
        if !state.floating_ips.contains_key(address) {
            return Err(FloatingIpError::NotFound(format!("Floating IP {} not found", address)));
        }
        let id = state.next_id;
        state.next_id += 1;
        state.actions.insert(id, (address.to_string(), droplet_id));
        Ok(Self::action(id, ActionStatus::Pending, droplet_id))
    }

    async fn get_action(&self, address: &str, action_id: u64) -> Result<Action, FloatingIpError> {
        let mut state = self.state();
        state.calls.push((
            Instant::now(),
            MockCall::GetAction {
                address: address.to_string(),
                action_id,
            },
        ));
        let Some((action_address, droplet_id)) = state.actions.get(&action_id).cloned() else {
            return Err(FloatingIpError::NotFound(format!("Action {} not found", action_id)));
        };
        let status = match state.action_script.pop_front() {
            Some(Ok(status)) => status,
            Some(Err(err)) => return Err(err),
            None => state.default_action_status.clone(),
        };
        if status == ActionStatus::Completed {
            if let Some(fip) = state.floating_ips.get_mut(&action_address) {
                fip.droplet = Some(NestedDroplet {
                    id: droplet_id,
                    name: format!("droplet-{}", droplet_id),
                });
            }
        }
        Ok(Self::action(action_id, status, droplet_id))
    }
}
