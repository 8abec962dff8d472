//! Configuration types for upstream client construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.thecatapi.com/v1";

/// Configuration for the breed provider client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the provider, without trailing slash.
    pub base_url: String,
    /// Optional provider key, sent as `x-api-key`.
    pub api_key: Option<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Upper bound for a single image lookup during enrichment.
    pub enrichment_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            enrichment_timeout_secs: 5,
            user_agent: None,
        }
    }
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }
}
