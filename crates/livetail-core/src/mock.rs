//! Transport doubles: scripted sequences for deterministic tests and a
//! randomized demo feed.
//!
//! Everything here implements the same [`LogStreamTransport`] contract
//! as the real SSE adapter, so controller behavior can be exercised
//! without a live connection.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{LogLevel, RawLogRecord};
use crate::ports::{Batch, LogStreamConnector, LogStreamTransport, TransportError};

/// Yields a fixed sequence of batches, then either ends or stays open.
pub struct ScriptedTransport {
    batches: VecDeque<Batch>,
    hold_open: bool,
}

impl ScriptedTransport {
    /// A transport that delivers `batches` in order and then ends.
    pub fn new(batches: Vec<Batch>) -> Self {
        Self {
            batches: batches.into(),
            hold_open: false,
        }
    }

    /// Keep the stream pending after the scripted batches run out, the
    /// way a live connection with nothing to deliver would.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

#[async_trait]
impl LogStreamTransport for ScriptedTransport {
    async fn next_batch(&mut self) -> Option<Batch> {
        match self.batches.pop_front() {
            Some(batch) => Some(batch),
            None if self.hold_open => std::future::pending().await,
            None => None,
        }
    }
}

/// Batches pushed through a channel; the stream ends when the sender is
/// dropped.
pub struct ChannelTransport {
    rx: tokio::sync::mpsc::Receiver<Batch>,
}

/// A sender/transport pair for driving a controller by hand.
pub fn channel_transport(capacity: usize) -> (tokio::sync::mpsc::Sender<Batch>, ChannelTransport) {
    let (tx, rx) = tokio::sync::mpsc::channel(capacity);
    (tx, ChannelTransport { rx })
}

#[async_trait]
impl LogStreamTransport for ChannelTransport {
    async fn next_batch(&mut self) -> Option<Batch> {
        self.rx.recv().await
    }
}

/// Hands out pre-built transports, one per `connect` call, and counts
/// how often it was asked.
pub struct ScriptedConnector {
    transports: Mutex<VecDeque<Box<dyn LogStreamTransport>>>,
    connects: AtomicUsize,
}

impl ScriptedConnector {
    /// A connector that serves `transports` in order and then fails.
    pub fn new(transports: Vec<Box<dyn LogStreamTransport>>) -> Self {
        Self {
            transports: Mutex::new(transports.into()),
            connects: AtomicUsize::new(0),
        }
    }

    /// How many times `connect` was called.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogStreamConnector for ScriptedConnector {
    async fn connect(
        &self,
        _session_id: &str,
    ) -> Result<Box<dyn LogStreamTransport>, TransportError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.transports
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Connect {
                message: "no scripted transport left".to_string(),
            })
    }
}

// ============================================================================
// Demo feed
// ============================================================================

/// Weighted level distribution used by the demo feed.
const LEVEL_WEIGHTS: [(LogLevel, f64); 4] = [
    (LogLevel::Error, 0.1),
    (LogLevel::Warn, 0.15),
    (LogLevel::Info, 0.5),
    (LogLevel::Debug, 0.25),
];

const ERROR_MESSAGES: &[&str] = &[
    "Connection refused: ECONNREFUSED 127.0.0.1:5432",
    "Failed to parse JSON response: Unexpected token",
    "Authentication failed for user: invalid_credentials",
    "Database query timeout after 30000ms",
];

const WARN_MESSAGES: &[&str] = &[
    "Deprecated API endpoint called: /api/v1/users",
    "Rate limit approaching: 950/1000 requests",
    "Certificate expires in 7 days",
    "Slow query detected: 2500ms execution time",
];

const INFO_MESSAGES: &[&str] = &[
    "Server started on port 3000",
    "User session created: usr_8x7k2m",
    "Request completed: GET /api/health 200 OK",
    "Background job completed: email_notifications",
    "Webhook delivered successfully to endpoint",
];

const DEBUG_MESSAGES: &[&str] = &[
    "Cache key generated: user:profile:12345",
    "SQL query: SELECT * FROM users WHERE id = $1",
    "Response headers: Content-Type: application/json",
    "Memory usage: 245MB / 512MB",
];

/// One random record with the demo level distribution.
pub fn sample_record() -> RawLogRecord {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    let mut level = LogLevel::Info;
    for (candidate, weight) in LEVEL_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            level = candidate;
            break;
        }
    }

    let pool = match level {
        LogLevel::Error => ERROR_MESSAGES,
        LogLevel::Warn => WARN_MESSAGES,
        LogLevel::Info => INFO_MESSAGES,
        LogLevel::Debug => DEBUG_MESSAGES,
    };

    RawLogRecord {
        message: pool[rng.gen_range(0..pool.len())].to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        level,
    }
}

/// An endless demo stream emitting one random record per interval.
pub struct MockLogFeed {
    interval: Duration,
}

impl MockLogFeed {
    /// A feed that produces a single-record batch every `interval`.
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl LogStreamTransport for MockLogFeed {
    async fn next_batch(&mut self) -> Option<Batch> {
        tokio::time::sleep(self.interval).await;
        Some(vec![sample_record()])
    }
}

/// Connector serving fresh [`MockLogFeed`] instances.
pub struct MockLogConnector {
    interval: Duration,
}

impl MockLogConnector {
    /// A connector whose feeds emit every `interval`.
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl LogStreamConnector for MockLogConnector {
    async fn connect(
        &self,
        _session_id: &str,
    ) -> Result<Box<dyn LogStreamTransport>, TransportError> {
        Ok(Box::new(MockLogFeed::new(self.interval)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_transport_ends_after_batches() {
        let mut transport = ScriptedTransport::new(vec![vec![sample_record()]]);
        assert!(transport.next_batch().await.is_some());
        assert!(transport.next_batch().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn mock_feed_emits_on_its_interval() {
        let mut feed = MockLogFeed::new(Duration::from_millis(250));
        let batch = feed.next_batch().await.expect("feed never ends");
        assert_eq!(batch.len(), 1);
        assert!(!batch[0].message.is_empty());
    }

    #[test]
    fn sample_levels_come_from_the_weighted_set() {
        for _ in 0..50 {
            let record = sample_record();
            assert!(LogLevel::ALL.contains(&record.level));
        }
    }
}
