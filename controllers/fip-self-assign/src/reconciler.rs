//! Assignment state machine.
//!
//! One call to [`Reconciler::check_and_assign`] is one cycle:
//!
//! 1. Read the floating IP. A failed read ends the cycle without touching
//!    the retry budget.
//! 2. If the IP is already held by this droplet, stop (`AlreadyAssigned`).
//! 3. Otherwise run one attempt sequence: request assignment, wait for the
//!    provider action to complete, and on failure back off and try again
//!    while the retry budget allows.
//!
//! Backoff and retry budget are rebuilt at the start of every sequence;
//! nothing carries over between cycles. Attempts are strictly sequential.

use crate::backoff::{BackoffSettings, ExponentialBackoff};
use crate::error::ControllerError;
use crate::retry::RetryBudget;
use floating_ip_client::{ActionStatus, DropletId, FloatingIpClientTrait};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, error, info, warn};

/// Parameters for one attempt sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentSettings {
    /// Retries after the first failed attempt, negative for unlimited
    pub retries: i64,
    pub backoff: BackoffSettings,
    /// Interval between action status polls
    pub poll_interval: Duration,
    /// Deadline for an action to reach a terminal status
    pub action_timeout: Duration,
}

impl Default for AssignmentSettings {
    fn default() -> Self {
        Self {
            retries: 5,
            backoff: BackoffSettings::default(),
            poll_interval: Duration::from_secs(5),
            action_timeout: Duration::from_secs(30),
        }
    }
}

/// Terminal state of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The IP was already held by this droplet; nothing was requested
    AlreadyAssigned,
    /// An attempt completed
    Assigned { attempts: u32 },
    /// Every attempt failed and the retry budget ran out
    Exhausted { attempts: u32 },
}

/// Terminal state of one assignment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Action reported `completed`
    Completed,
    /// Action reported `errored`
    Errored,
    /// Action did not finish before the deadline
    TimedOut,
    /// The assignment request itself failed; no action was created
    RequestFailed,
}

/// Drives the floating IP towards this droplet.
pub struct Reconciler {
    client: Arc<dyn FloatingIpClientTrait>,
    floating_ip: String,
    droplet_id: DropletId,
    settings: AssignmentSettings,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        client: Arc<dyn FloatingIpClientTrait>,
        floating_ip: String,
        droplet_id: DropletId,
        settings: AssignmentSettings,
    ) -> Self {
        Self {
            client,
            floating_ip,
            droplet_id,
            settings,
        }
    }

    /// The floating IP this reconciler manages
    pub fn floating_ip(&self) -> &str {
        &self.floating_ip
    }

    /// The droplet the floating IP is assigned to
    pub fn droplet_id(&self) -> DropletId {
        self.droplet_id
    }

    /// Runs one cycle.
    ///
    /// Returns an error only when the floating IP could not be read; every
    /// assignment failure is handled internally and reported through
    /// [`CycleOutcome::Exhausted`].
    pub async fn check_and_assign(&self) -> Result<CycleOutcome, ControllerError> {
        let fip = self.client.get_floating_ip(&self.floating_ip).await?;

        if fip.is_assigned_to(self.droplet_id) {
            info!(
                floating_ip = %self.floating_ip,
                droplet_id = %self.droplet_id,
                "Floating IP is already assigned to this droplet"
            );
            return Ok(CycleOutcome::AlreadyAssigned);
        }

        match fip.holder() {
            Some(holder) => info!(
                floating_ip = %self.floating_ip,
                holder = %holder,
                "Floating IP is assigned to another droplet"
            ),
            None => info!(floating_ip = %self.floating_ip, "Floating IP is unassigned"),
        }

        Ok(self.assign_with_retries().await)
    }

    /// Runs one attempt sequence with a fresh backoff and retry budget.
    pub async fn assign_with_retries(&self) -> CycleOutcome {
        let mut budget = RetryBudget::new(self.settings.retries);
        let mut backoff = ExponentialBackoff::new(self.settings.backoff);
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);

            if self.attempt_assignment(attempt).await == AttemptOutcome::Completed {
                info!(
                    floating_ip = %self.floating_ip,
                    droplet_id = %self.droplet_id,
                    attempt,
                    "Floating IP successfully assigned"
                );
                return CycleOutcome::Assigned { attempts: attempt };
            }

            if !budget.try_consume() {
                error!(
                    floating_ip = %self.floating_ip,
                    droplet_id = %self.droplet_id,
                    attempts = attempt,
                    "Giving up on floating IP assignment until next cycle"
                );
                return CycleOutcome::Exhausted { attempts: attempt };
            }

            let delay = backoff.next_backoff();
            debug!(
                attempt,
                remaining_retries = ?budget.remaining(),
                "Waiting backoff {:?} before next assignment attempt",
                delay
            );
            sleep(delay).await;
        }
    }

    /// One assignment request followed by waiting for its action.
    async fn attempt_assignment(&self, attempt: u32) -> AttemptOutcome {
        info!(
            floating_ip = %self.floating_ip,
            droplet_id = %self.droplet_id,
            attempt,
            "Trying to assign floating IP"
        );

        let action = match self.client.assign(&self.floating_ip, self.droplet_id).await {
            Ok(action) => action,
            Err(e) => {
                warn!(
                    floating_ip = %self.floating_ip,
                    droplet_id = %self.droplet_id,
                    attempt,
                    error = %e,
                    "Assignment request failed"
                );
                return AttemptOutcome::RequestFailed;
            }
        };

        let outcome = wait_for_action(
            self.client.as_ref(),
            &self.floating_ip,
            action.id,
            self.settings.poll_interval,
            self.settings.action_timeout,
        )
        .await;

        match outcome {
            AttemptOutcome::Errored => warn!(
                floating_ip = %self.floating_ip,
                droplet_id = %self.droplet_id,
                action_id = action.id,
                attempt,
                "Assignment action errored"
            ),
            AttemptOutcome::TimedOut => warn!(
                floating_ip = %self.floating_ip,
                droplet_id = %self.droplet_id,
                action_id = action.id,
                attempt,
                "Timeout waiting for assignment action to finish"
            ),
            AttemptOutcome::Completed | AttemptOutcome::RequestFailed => {}
        }
        outcome
    }
}

/// Polls an action until it completes, errors, or `timeout` elapses.
///
/// The first poll is immediate. Poll errors are logged and do not end the
/// wait; only a terminal status or the deadline does. Unknown statuses are
/// treated as still pending. Never returns [`AttemptOutcome::RequestFailed`].
pub async fn wait_for_action(
    client: &dyn FloatingIpClientTrait,
    floating_ip: &str,
    action_id: u64,
    poll_interval: Duration,
    timeout: Duration,
) -> AttemptOutcome {
    let deadline = Instant::now() + timeout;

    loop {
        // No poll at the deadline itself.
        if Instant::now() >= deadline {
            return AttemptOutcome::TimedOut;
        }

        match client.get_action(floating_ip, action_id).await {
            Ok(action) => match action.status {
                ActionStatus::Completed => return AttemptOutcome::Completed,
                ActionStatus::Errored => return AttemptOutcome::Errored,
                ActionStatus::Pending | ActionStatus::Unknown(_) => {
                    debug!(
                        floating_ip,
                        action_id,
                        status = %action.status,
                        "Assignment action still pending"
                    );
                }
            },
            Err(e) => {
                warn!(
                    floating_ip,
                    action_id,
                    error = %e,
                    "Cannot get assignment action status"
                );
            }
        }

        sleep_until((Instant::now() + poll_interval).min(deadline)).await;
    }
}
