//! Bus client configuration

use crate::poll::PollPolicy;
use grid_types::TwinId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one bus client. Several clients with different
/// endpoints or tuning can coexist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmbConfig {
    /// Gateway base URL, trailing slash ignored
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Our own twin, used as the message source
    #[serde(default)]
    pub twin_id: TwinId,

    /// Delay between result polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Failed polls tolerated before a call gives up
    #[serde(default = "default_error_threshold")]
    pub error_threshold: u32,

    /// Message expiration in seconds
    #[serde(default = "default_expiration")]
    pub expiration_secs: u64,

    /// Timeout of each individual HTTP request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for RmbConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            twin_id: 0,
            poll_interval_ms: default_poll_interval(),
            error_threshold: default_error_threshold(),
            expiration_secs: default_expiration(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl RmbConfig {
    pub fn new(endpoint: impl Into<String>, twin_id: TwinId) -> Self {
        Self {
            endpoint: endpoint.into(),
            twin_id,
            ..Default::default()
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            self.error_threshold,
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Default value helpers
fn default_endpoint() -> String {
    "https://gridproxy.grid.tf".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_error_threshold() -> u32 {
    4
}

fn default_expiration() -> u64 {
    3600
}

fn default_request_timeout() -> u64 {
    30
}
