//! Port definitions (trait abstractions) implemented by transport
//! adapters and test doubles.

mod transport;

pub use transport::{Batch, LogStreamConnector, LogStreamTransport, TransportError};
