//! Connector opening one SSE subscription per transport.

use async_trait::async_trait;
use livetail_core::{LogStreamConnector, LogStreamTransport, TransportError};
use reqwest::header;
use tracing::debug;
use url::Url;

use crate::config::SseConfig;
use crate::transport::SseTransport;

/// Opens log stream subscriptions against the configured backend.
///
/// One `GET {base_url}session/consume?session_id={id}` request per
/// `connect` call; a non-2xx answer is a rejection, not a stream.
pub struct SseConnector {
    client: reqwest::Client,
    base_url: Url,
}

impl SseConnector {
    /// Build a connector from configuration.
    pub fn new(config: &SseConfig) -> Result<Self, TransportError> {
        // A missing trailing slash would make Url::join replace the
        // last path segment instead of appending
        let mut raw = config.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|e| TransportError::InvalidEndpoint {
            message: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Connect {
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    fn consume_url(&self, session_id: &str) -> Result<Url, TransportError> {
        let mut url =
            self.base_url
                .join("session/consume")
                .map_err(|e| TransportError::InvalidEndpoint {
                    message: e.to_string(),
                })?;
        url.query_pairs_mut().append_pair("session_id", session_id);
        Ok(url)
    }
}

#[async_trait]
impl LogStreamConnector for SseConnector {
    async fn connect(
        &self,
        session_id: &str,
    ) -> Result<Box<dyn LogStreamTransport>, TransportError> {
        let url = self.consume_url(session_id)?;
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| TransportError::Connect {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(%url, "log stream subscription open");
        Ok(Box::new(SseTransport::spawn(response)))
    }
}
