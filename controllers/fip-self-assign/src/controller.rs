//! Main controller implementation.
//!
//! The `Controller` runs assignment cycles on a fixed period: the first
//! cycle starts immediately, and after every cycle, whatever its outcome,
//! it either exits (period of zero) or sleeps exactly one period.

use crate::reconciler::{CycleOutcome, Reconciler};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Periodic driver for the reconciler.
pub struct Controller {
    reconciler: Reconciler,
    update_period: Duration,
}

impl Controller {
    /// Creates a new controller instance.
    pub fn new(reconciler: Reconciler, update_period: Duration) -> Self {
        Self {
            reconciler,
            update_period,
        }
    }

    /// Runs until the one-shot cycle finishes or SIGINT/SIGTERM arrives.
    pub async fn run(self) {
        self.run_until(shutdown_signal()).await;
    }

    /// Runs until the one-shot cycle finishes or `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            floating_ip = %self.reconciler.floating_ip(),
            droplet_id = %self.reconciler.droplet_id(),
            "Floating IP self-assignment running"
        );

        tokio::select! {
            () = self.run_cycles() => {}
            () = shutdown => info!("Shutdown signal received, exiting"),
        }
    }

    async fn run_cycles(&self) {
        loop {
            self.run_cycle().await;

            if self.update_period.is_zero() {
                info!("Update period is 0, initial assignment done");
                return;
            }

            debug!("Waiting for {:?} for next floating IP self-assignment", self.update_period);
            sleep(self.update_period).await;
        }
    }

    /// Runs one cycle and logs its outcome.
    ///
    /// Returns `None` when the floating IP could not be read.
    pub async fn run_cycle(&self) -> Option<CycleOutcome> {
        match self.reconciler.check_and_assign().await {
            Ok(outcome) => {
                if let CycleOutcome::Exhausted { attempts } = outcome {
                    warn!(
                        floating_ip = %self.reconciler.floating_ip(),
                        attempts,
                        "Floating IP self-assignment failed this cycle"
                    );
                }
                Some(outcome)
            }
            Err(e) => {
                error!(
                    floating_ip = %self.reconciler.floating_ip(),
                    error = %e,
                    "Cannot get floating IP"
                );
                None
            }
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
