//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

const ENV_API_URL: &str = "VENTASIMPLE_API_URL";
const ENV_TIMEOUT_SECS: &str = "VENTASIMPLE_TIMEOUT_SECS";

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://api.ventasimple.app`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves it to the transport.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Targets `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `VENTASIMPLE_API_URL` and `VENTASIMPLE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset, blank or
    /// unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        config.timeout = lookup(ENV_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        config
    }

    /// The base URL without trailing slashes.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ClientConfig::new("https://api.example.com///");
        assert_eq!(config.normalized_base_url(), "https://api.example.com");
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars = HashMap::from([
            (ENV_API_URL, "https://api.example.com/"),
            (ENV_TIMEOUT_SECS, "15"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_url, "https://api.example.com/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }
}
