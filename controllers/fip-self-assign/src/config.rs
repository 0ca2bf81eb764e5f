//! Command-line and environment configuration.
//!
//! Every flag can also be set through the environment variable named in its
//! `env` attribute. `Cli` is what clap parses; `Config` is the validated
//! form the daemon runs with. Any error here is fatal.

use crate::backoff::BackoffSettings;
use crate::error::ControllerError;
use crate::metadata::DEFAULT_METADATA_URL;
use crate::reconciler::AssignmentSettings;
use clap::{ArgAction, ArgGroup, Parser, ValueEnum};
use floating_ip_client::DEFAULT_API_URL;
use std::fmt;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Keeps a DigitalOcean floating IP assigned to this droplet.
#[derive(Parser)]
#[command(name = "fip-self-assign", version, about, long_about = None)]
#[command(group(ArgGroup::new("credential").required(true).args(["token", "token_file"])))]
pub struct Cli {
    /// The floating IP address to self-assign
    #[arg(long, env = "FLOATING_IP")]
    pub floating_ip: String,

    /// A DigitalOcean API token
    #[arg(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// A file containing a DigitalOcean API token
    #[arg(long, env = "DIGITALOCEAN_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Time between self-assignment cycles, 0 to assign once and exit
    #[arg(long, env = "UPDATE_PERIOD", default_value = "5m", value_parser = parse_duration)]
    pub update_period: Duration,

    /// Retries per cycle when self-assignment fails, negative to retry forever
    #[arg(long, env = "RETRIES", default_value_t = 5, allow_negative_numbers = true)]
    pub retries: i64,

    /// Initial backoff after a failed attempt
    #[arg(long, env = "BACKOFF", default_value = "1s", value_parser = parse_duration)]
    pub backoff: Duration,

    /// Backoff multiplier after each failed attempt
    #[arg(long, env = "BACKOFF_FACTOR", default_value_t = 2.0)]
    pub backoff_factor: f64,

    /// Maximum backoff after a failed attempt
    #[arg(long, env = "BACKOFF_MAX", default_value = "2m", value_parser = parse_duration)]
    pub backoff_max: Duration,

    /// Interval between assignment action status polls
    #[arg(long, env = "ACTION_POLL_INTERVAL", default_value = "5s", value_parser = parse_duration)]
    pub poll_interval: Duration,

    /// How long to wait for an assignment action to finish
    #[arg(long, env = "ACTION_TIMEOUT", default_value = "30s", value_parser = parse_duration)]
    pub action_timeout: Duration,

    /// DigitalOcean API base URL
    #[arg(long, env = "DIGITALOCEAN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Droplet metadata service base URL
    #[arg(long, env = "METADATA_URL", default_value = DEFAULT_METADATA_URL)]
    pub metadata_url: String,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

/// Validated daemon configuration
#[derive(Clone)]
pub struct Config {
    pub floating_ip: String,
    pub token: String,
    pub update_period: Duration,
    pub assignment: AssignmentSettings,
    pub api_url: String,
    pub metadata_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("floating_ip", &self.floating_ip)
            .field("token", &"<redacted>")
            .field("update_period", &self.update_period)
            .field("assignment", &self.assignment)
            .field("api_url", &self.api_url)
            .field("metadata_url", &self.metadata_url)
            .finish()
    }
}

impl Config {
    /// Validate parsed flags and load the credential
    pub fn from_cli(cli: &Cli) -> Result<Self, ControllerError> {
        let floating_ip = cli.floating_ip.trim().to_string();
        if floating_ip.is_empty() {
            return Err(ControllerError::InvalidConfig("floating-ip is required".to_string()));
        }
        if floating_ip.parse::<IpAddr>().is_err() {
            return Err(ControllerError::InvalidConfig(format!(
                "floating-ip {} is not an IP address",
                floating_ip
            )));
        }

        let token = resolve_token(cli.token.as_deref(), cli.token_file.as_deref())?;

        if !cli.backoff_factor.is_finite() || cli.backoff_factor < 0.0 {
            return Err(ControllerError::InvalidConfig(format!(
                "backoff-factor must be a non-negative number, got {}",
                cli.backoff_factor
            )));
        }
        if cli.backoff > cli.backoff_max {
            return Err(ControllerError::InvalidConfig(format!(
                "backoff {:?} is greater than backoff-max {:?}",
                cli.backoff, cli.backoff_max
            )));
        }
        if cli.poll_interval.is_zero() {
            return Err(ControllerError::InvalidConfig(
                "poll-interval must be greater than 0".to_string(),
            ));
        }
        if cli.action_timeout.is_zero() {
            return Err(ControllerError::InvalidConfig(
                "action-timeout must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            floating_ip,
            token,
            update_period: cli.update_period,
            assignment: AssignmentSettings {
                retries: cli.retries,
                backoff: BackoffSettings {
                    initial: cli.backoff,
                    factor: cli.backoff_factor,
                    max: cli.backoff_max,
                },
                poll_interval: cli.poll_interval,
                action_timeout: cli.action_timeout,
            },
            api_url: cli.api_url.clone(),
            metadata_url: cli.metadata_url.clone(),
        })
    }
}

/// Load the API token from exactly one of the literal value or the file.
pub fn resolve_token(
    token: Option<&str>,
    token_file: Option<&Path>,
) -> Result<String, ControllerError> {
    let token = match (token, token_file) {
        (None, None) => {
            return Err(ControllerError::InvalidConfig(
                "token or token-file is required".to_string(),
            ));
        }
        (Some(_), Some(_)) => {
            return Err(ControllerError::InvalidConfig(
                "token and token-file cannot both be specified".to_string(),
            ));
        }
        (Some(token), None) => token.to_string(),
        (None, Some(path)) => {
            std::fs::read_to_string(path).map_err(|source| ControllerError::TokenFile {
                path: path.to_path_buf(),
                source,
            })?
        }
    };

    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(ControllerError::InvalidConfig("API token is empty".to_string()));
    }
    Ok(token)
}

/// Parse a duration such as `500ms`, `30s`, `5m`, `1h`, `1.5s`, or a bare
/// number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let unit = unit.trim();

    let multiplier_ms: u64 = match unit {
        "ms" => 1,
        "" | "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        other => return Err(format!("unknown duration unit '{}' in '{}'", other, input)),
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole
            .checked_mul(multiplier_ms)
            .map(Duration::from_millis)
            .ok_or_else(|| format!("duration '{}' is too large", input));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{}'", input))?;
    #[allow(clippy::cast_precision_loss, reason = "unit multipliers are small")]
    let secs = value * (multiplier_ms as f64) / 1_000.0;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{}': {}", input, e))
}
