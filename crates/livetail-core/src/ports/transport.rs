//! Transport port: the consumable batch sequence behind one session's
//! log stream.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RawLogRecord;

/// The ordered list of records delivered in a single streamed message.
pub type Batch = Vec<RawLogRecord>;

/// A live, non-restartable sequence of log batches for one session.
///
/// `next_batch` is the only suspension point: it resolves when a batch
/// arrives and returns `None` when the sequence is over — either because
/// the producer closed it or because the connection failed. Once `None`
/// is observed the transport is spent; a new logical stream requires a
/// new transport from the connector.
///
/// Implementations recover from malformed payloads internally (drop the
/// batch, emit a diagnostic, keep going) — a bad batch is never terminal.
#[async_trait]
pub trait LogStreamTransport: Send {
    /// Wait for the next batch, or `None` when the stream is over.
    async fn next_batch(&mut self) -> Option<Batch>;
}

/// Opens one [`LogStreamTransport`] per call for a given session.
#[async_trait]
pub trait LogStreamConnector: Send + Sync {
    /// Open a fresh transport for `session_id`.
    async fn connect(
        &self,
        session_id: &str,
    ) -> Result<Box<dyn LogStreamTransport>, TransportError>;
}

/// Errors from opening a log stream.
///
/// These are domain-level errors that consumers can handle.
/// Implementation-specific errors (HTTP, TLS) are mapped to these.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("failed to reach log stream endpoint: {message}")]
    Connect {
        /// Description of the connection failure
        message: String,
    },

    /// The endpoint answered but refused the subscription.
    #[error("log stream endpoint rejected the request: HTTP {status}")]
    Rejected {
        /// The HTTP status returned
        status: u16,
    },

    /// The configured endpoint URL is unusable.
    #[error("invalid stream endpoint: {message}")]
    InvalidEndpoint {
        /// What was wrong with the URL
        message: String,
    },
}
