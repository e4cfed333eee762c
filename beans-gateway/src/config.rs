//! Gateway configuration
//!
//! Defines the listening address, the polling cadence used while waiting on
//! a submitted job, and an optional fixed pipeline service endpoint.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::service::PollSettings;
use crate::service::poller::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};

const DEFAULT_PORT: u16 = 8080;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to (e.g., "0.0.0.0:8080")
    pub bind_addr: String,

    /// Pause between job state observations
    pub poll_interval: Duration,

    /// Observations allowed after the first one
    pub max_poll_attempts: u32,

    /// Pipeline service endpoint used instead of the regional one
    pub aiplatform_endpoint: Option<String>,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PORT (optional, default: 8080)
    /// - BIND_ADDR (optional, full address, overrides PORT)
    /// - POLL_INTERVAL (optional, seconds, default: 20)
    /// - MAX_POLL_ATTEMPTS (optional, default: 6)
    /// - AIPLATFORM_ENDPOINT (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| format!("0.0.0.0:{}", port));

        let poll_interval = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let max_poll_attempts = std::env::var("MAX_POLL_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);

        let aiplatform_endpoint = std::env::var("AIPLATFORM_ENDPOINT")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            bind_addr,
            poll_interval,
            max_poll_attempts,
            aiplatform_endpoint,
        })
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("bind_addr is not a socket address: {}", self.bind_addr))?;

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if let Some(endpoint) = &self.aiplatform_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("aiplatform_endpoint must start with http:// or https://");
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_ATTEMPTS,
            aiplatform_endpoint: None,
        }
    }
}
