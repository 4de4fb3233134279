/// Configuration for the optimistic sync controller and its REST client
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on the debounce delay
const MAX_DEBOUNCE_MS: u64 = 60_000;

pub const ENV_DEBOUNCE_MS: &str = "COURSEDESK_DEBOUNCE_MS";
pub const ENV_API_URL: &str = "COURSEDESK_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "COURSEDESK_REQUEST_TIMEOUT_SECS";

/// Settings for [`SyncController`](crate::sync::SyncController)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Quiet period after the last drag before the order is persisted
    pub debounce_ms: u64,

    /// Root URL of the persistence API
    pub api_base_url: String,

    /// Per-request timeout for the REST client
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            api_base_url: "http://localhost:3001".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Defaults overridden by `COURSEDESK_*` environment variables
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DEBOUNCE_MS) {
            match value.parse() {
                Ok(ms) => config.debounce_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid {}: {:?}", ENV_DEBOUNCE_MS, value),
            }
        }
        if let Some(url) = lookup(ENV_API_URL) {
            config.api_base_url = url;
        }
        if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match value.parse() {
                Ok(secs) => config.request_timeout_secs = secs,
                Err(_) => {
                    tracing::warn!("Ignoring invalid {}: {:?}", ENV_REQUEST_TIMEOUT_SECS, value)
                }
            }
        }

        config
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(format!(
                "debounce_ms cannot exceed {} (edits would sit unsaved too long)",
                MAX_DEBOUNCE_MS
            ));
        }

        if self.api_base_url.is_empty() {
            return Err("api_base_url cannot be empty".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
