//! Test utilities for the reconciler and controller
//!
//! Builders for reconcilers wired to `MockFloatingIpClient`.

use crate::backoff::BackoffSettings;
use crate::reconciler::{AssignmentSettings, Reconciler};
use floating_ip_client::{DropletId, MockFloatingIpClient};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_FLOATING_IP: &str = "45.55.96.47";

pub const TEST_DROPLET: DropletId = DropletId(3_164_494);

pub const OTHER_DROPLET: DropletId = DropletId(3_164_444);

/// Settings with round numbers: 1s backoff doubling up to 8s, 5s polls,
/// 30s action deadline
pub fn test_settings(retries: i64) -> AssignmentSettings {
    AssignmentSettings {
        retries,
        backoff: BackoffSettings {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(8),
        },
        poll_interval: Duration::from_secs(5),
        action_timeout: Duration::from_secs(30),
    }
}

/// Mock with `TEST_FLOATING_IP` registered and held by `holder`
pub fn create_test_mock(holder: Option<DropletId>) -> MockFloatingIpClient {
    let mock = MockFloatingIpClient::new("http://test-api");
    mock.add_floating_ip(TEST_FLOATING_IP, holder);
    mock
}

/// Reconciler for `TEST_FLOATING_IP` / `TEST_DROPLET` sharing state with `mock`
pub fn create_test_reconciler(
    mock: &MockFloatingIpClient,
    settings: AssignmentSettings,
) -> Reconciler {
    Reconciler::new(
        Arc::new(mock.clone()),
        TEST_FLOATING_IP.to_string(),
        TEST_DROPLET,
        settings,
    )
}
