//! Configuration module
//!
//! Settings for reaching the generation service and for polling jobs.
//! Values come from command-line flags or their environment variables.

use appforge_client::{GenerationClient, PollConfig};
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the generation service
    pub service_url: String,

    /// Delay between two status queries
    pub poll_interval: Duration,

    /// Recursion limit sent with every request
    pub recursion_limit: u32,

    /// Stop polling after this many status queries (unbounded when unset)
    pub max_poll_attempts: Option<u32>,

    /// Timeout for a single HTTP call
    pub request_timeout: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.recursion_limit == 0 {
            anyhow::bail!("recursion_limit must be greater than 0");
        }

        if self.max_poll_attempts == Some(0) {
            anyhow::bail!("max_poll_attempts must be greater than 0 when set");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Polling policy derived from this configuration
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }

    /// Builds an HTTP client for the configured service
    pub fn client(&self) -> anyhow::Result<GenerationClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(GenerationClient::with_client(&self.service_url, http))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8000".to_string(),
            poll_interval: appforge_client::poller::DEFAULT_POLL_INTERVAL,
            recursion_limit: appforge_core::domain::request::DEFAULT_RECURSION_LIMIT,
            max_poll_attempts: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}
