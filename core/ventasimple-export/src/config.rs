//! Poller configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// Poller timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Delay before the first check and between checks.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollerConfig {
    /// Polls every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}
