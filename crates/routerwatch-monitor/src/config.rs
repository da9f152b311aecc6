//! Monitor configuration.
//!
//! Loaded by the host from its YAML config file; every field has a default
//! so a missing `monitor` section falls back cleanly.

use std::time::Duration;

use serde::Deserialize;

/// Default poll interval: 15 minutes.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15 * 60;

/// Tunables for the monitor core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between poll cycles (wake timing is best-effort, never early).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl MonitorConfig {
    /// The poll interval as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

const fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
