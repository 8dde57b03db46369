//! Core domain types, ports, and orchestration for the livetail log
//! stream consumer.
//!
//! The crate is laid out hexagonally: `domain` holds the wire-faithful
//! record types, `ports` the transport abstractions that adapters (and
//! test doubles) implement, and the remaining modules the three stateful
//! components composed by [`LogStreamController`]:
//!
//! - [`LogBuffer`] — capped FIFO history of decoded entries
//! - [`HighlightTracker`] — transient "recently arrived" id set
//! - [`LogStreamController`] — lifecycle state machine driving a
//!   pluggable [`LogStreamTransport`]
#![deny(unused_crate_dependencies)]

pub mod buffer;
pub mod controller;
pub mod domain;
pub mod highlight;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export commonly used types for convenience
pub use buffer::{DEFAULT_BUFFER_CAPACITY, LogBuffer};
pub use controller::{LogStreamController, ReconnectPolicy, StreamOptions, StreamSnapshot};
pub use domain::{LogEntry, LogLevel, ParseLevelError, RawLogRecord, filter_by_level};
pub use highlight::{DEFAULT_HIGHLIGHT_WINDOW, HighlightTracker};
pub use ports::{Batch, LogStreamConnector, LogStreamTransport, TransportError};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
