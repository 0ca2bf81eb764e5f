//! Floating IP Self-Assignment Daemon
//!
//! Keeps a DigitalOcean floating IP assigned to the droplet this process
//! runs on. Intended for active/passive failover: every instance in the
//! fleet runs the daemon, and whichever one runs it wins the IP.
//!
//! Startup resolves the droplet id once from the metadata service; any
//! configuration or identity error stops the process with a non-zero exit
//! code. After that, assignment cycles run until shutdown (or once, with an
//! update period of 0).

mod backoff;
mod config;
mod controller;
mod error;
mod metadata;
mod reconciler;
mod retry;
#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod controller_test;

use crate::config::{Cli, Config, LogFormat};
use crate::error::ControllerError;
use crate::metadata::MetadataClient;
use clap::Parser;
use controller::Controller;
use floating_ip_client::DigitalOceanClient;
use reconciler::Reconciler;
use retry::RetryBudget;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    let cli = Cli::parse();
    setup_tracing(cli.log_format, cli.verbose);

    info!("Starting floating IP self-assignment daemon");

    let config = Config::from_cli(&cli).inspect_err(|e| error!("{}", e))?;

    info!("Configuration:");
    info!("  Floating IP: {}", config.floating_ip);
    info!("  Update period: {:?}", config.update_period);
    if RetryBudget::new(config.assignment.retries).is_unlimited() {
        info!("  Retries: forever");
    } else {
        info!("  Retries: {}", config.assignment.retries);
    }
    info!(
        "  Backoff: {:?} x{} up to {:?}",
        config.assignment.backoff.initial,
        config.assignment.backoff.factor,
        config.assignment.backoff.max
    );
    info!("  API URL: {}", config.api_url);

    // Never start assigning without knowing which droplet we are.
    let metadata = MetadataClient::new(&config.metadata_url)?;
    let droplet_id = metadata
        .resolve_instance_identity()
        .await
        .inspect_err(|e| error!("{}", e))?;
    info!("  Droplet ID: {}", droplet_id);

    let client = DigitalOceanClient::new(config.api_url.clone(), config.token.clone())?;

    let reconciler = Reconciler::new(
        Arc::new(client),
        config.floating_ip.clone(),
        droplet_id,
        config.assignment,
    );
    Controller::new(reconciler, config.update_period).run().await;

    Ok(())
}

fn setup_tracing(format: LogFormat, verbose: u8) {
    let default_directives = match verbose {
        0 => "fip_self_assign=info,floating_ip_client=info,warn",
        1 => "fip_self_assign=debug,floating_ip_client=debug,info",
        _ => "fip_self_assign=trace,floating_ip_client=trace,debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
