//! Client configuration

use std::time::Duration;

/// Configuration for the booking core
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for the REST surface and the push channel
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Interval between server-authoritative hold TTL polls
    pub hold_poll_interval: Duration,

    /// Fixed delay between push-channel reconnect attempts
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: 30,
            hold_poll_interval: Duration::from_secs(15),
            reconnect_delay: Duration::from_secs(5),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the hold TTL poll interval
    pub fn with_hold_poll_interval(mut self, interval: Duration) -> Self {
        self.hold_poll_interval = interval;
        self
    }

    /// Set the reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Create an HTTP API client from this configuration
    pub fn build_http_api(&self) -> crate::http::HttpApi {
        crate::http::HttpApi::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
