//! Configuration for the SSE transport adapter.

use std::time::Duration;

/// Default backend base URL, matching the local development server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// Configuration for [`crate::SseConnector`].
#[derive(Debug, Clone)]
pub struct SseConfig {
    /// Base URL of the log stream backend.
    pub base_url: String,
    /// Timeout for establishing the TCP connection. No overall request
    /// timeout is set: the stream is long-lived by design.
    pub connect_timeout: Duration,
}

impl SseConfig {
    /// Config pointing at `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Override the connection-establishment timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}
