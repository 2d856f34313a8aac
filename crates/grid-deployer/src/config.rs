//! Reconciler configuration

use grid_rmb::PollPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning of the wait-for-deployment step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployerConfig {
    /// Upper bound on waiting for a node to apply a deployment
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Delay between deployment status checks
    #[serde(default = "default_wait_poll_interval")]
    pub wait_poll_interval_ms: u64,

    /// Failed status checks tolerated while waiting
    #[serde(default = "default_wait_error_threshold")]
    pub wait_error_threshold: u32,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout(),
            wait_poll_interval_ms: default_wait_poll_interval(),
            wait_error_threshold: default_wait_error_threshold(),
        }
    }
}

impl DeployerConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn wait_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.wait_poll_interval_ms),
            self.wait_error_threshold,
        )
    }
}

fn default_wait_timeout() -> u64 {
    120
}

fn default_wait_poll_interval() -> u64 {
    1000
}

fn default_wait_error_threshold() -> u32 {
    4
}
