//! Server-sent-events transport adapter for livetail.
//!
//! [`SseConnector`] implements the core `LogStreamConnector` port over a
//! streaming HTTP connection: one `GET {base}/session/consume` request
//! per transport, incremental SSE frame decoding, and JSON batch
//! decoding with local recovery from malformed payloads.
#![deny(unused_crate_dependencies)]

mod config;
mod connector;
mod decode;
mod frame;
mod transport;

// ============================================================================
// Public API
// ============================================================================

pub use config::{DEFAULT_BASE_URL, SseConfig};
pub use connector::SseConnector;
pub use transport::SseTransport;

// Silence unused dev-dependency warnings (integration tests only)
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio_test as _;
