//! Stream lifecycle orchestration.
//!
//! [`LogStreamController`] drives a pluggable transport through the
//! `idle`/`streaming` state machine: `start` spawns a consumption loop
//! that assigns ids to incoming records, appends them to the history and
//! flags them as new; `stop` cancels the loop and waits for it to halt,
//! so no buffer mutation can happen after `stop` returns.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::buffer::{DEFAULT_BUFFER_CAPACITY, LogBuffer};
use crate::domain::{LogEntry, LogLevel, filter_by_level};
use crate::highlight::{DEFAULT_HIGHLIGHT_WINDOW, HighlightTracker};
use crate::ports::{Batch, LogStreamConnector};

/// Reconnect behavior after the stream ends or fails to open.
///
/// `max_retries` bounds consecutive reattempts; the delay before attempt
/// `n` is `retry_base_delay * 2^(n-1)`. A delivered batch resets the
/// attempt counter. The default is disabled: a terminal stream end
/// returns the controller to idle and the caller may start again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive reconnect attempts before giving up.
    pub max_retries: u8,
    /// Backoff base delay, doubled per attempt.
    pub retry_base_delay: Duration,
}

impl ReconnectPolicy {
    /// Never reconnect; stream end is terminal for the run.
    pub const fn disabled() -> Self {
        Self {
            max_retries: 0,
            retry_base_delay: Duration::from_millis(500),
        }
    }

    /// Reconnect up to `max_retries` times with exponential backoff.
    pub const fn with_backoff(max_retries: u8, retry_base_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_base_delay,
        }
    }

    fn delay_for(&self, attempt: u8) -> Duration {
        self.retry_base_delay * 2u32.saturating_pow(u32::from(attempt).saturating_sub(1))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Tunables for one controller instance.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// History capacity; oldest entries are evicted past this.
    pub buffer_capacity: usize,
    /// How long a fresh entry stays flagged as new.
    pub highlight_window: Duration,
    /// Reconnect behavior for the consumption loop.
    pub reconnect: ReconnectPolicy,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            highlight_window: DEFAULT_HIGHLIGHT_WINDOW,
            reconnect: ReconnectPolicy::disabled(),
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct StreamSnapshot {
    /// The buffered history, oldest first.
    pub entries: Vec<LogEntry>,
    /// Ids still inside their highlight window.
    pub new_ids: HashSet<String>,
    /// Whether a consumption loop is active.
    pub is_streaming: bool,
}

impl StreamSnapshot {
    /// Entries visible under a level selection; an empty selection means
    /// all levels.
    pub fn visible_entries(&self, selection: &HashSet<LogLevel>) -> Vec<LogEntry> {
        filter_by_level(&self.entries, selection)
    }
}

/// State shared between the controller handle and its consumption loop.
struct Shared {
    buffer: Mutex<LogBuffer>,
    highlights: HighlightTracker,
    streaming: AtomicBool,
}

impl Shared {
    fn ingest(&self, records: Batch) {
        if records.is_empty() {
            return;
        }
        let entries: Vec<LogEntry> = records.into_iter().map(LogEntry::from_record).collect();
        let ids: Vec<String> = entries.iter().map(|entry| entry.id.clone()).collect();
        debug!(count = entries.len(), "appending batch");
        self.buffer.lock().unwrap().append(entries);
        for id in ids {
            self.highlights.mark_new(id);
        }
    }
}

struct ActiveRun {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Lifecycle state machine for one session's log stream.
pub struct LogStreamController {
    session_id: String,
    connector: Arc<dyn LogStreamConnector>,
    shared: Arc<Shared>,
    reconnect: ReconnectPolicy,
    run: tokio::sync::Mutex<Option<ActiveRun>>,
}

impl LogStreamController {
    /// Create a controller with default options.
    pub fn new(session_id: impl Into<String>, connector: Arc<dyn LogStreamConnector>) -> Self {
        Self::with_options(session_id, connector, StreamOptions::default())
    }

    /// Create a controller with explicit options.
    pub fn with_options(
        session_id: impl Into<String>,
        connector: Arc<dyn LogStreamConnector>,
        options: StreamOptions,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            connector,
            shared: Arc::new(Shared {
                buffer: Mutex::new(LogBuffer::new(options.buffer_capacity)),
                highlights: HighlightTracker::new(options.highlight_window),
                streaming: AtomicBool::new(false),
            }),
            reconnect: options.reconnect,
            run: tokio::sync::Mutex::new(None),
        }
    }

    /// The session this controller consumes.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether a consumption loop is active.
    pub fn is_streaming(&self) -> bool {
        self.shared.streaming.load(Ordering::SeqCst)
    }

    /// Begin consuming the stream. No-op while already streaming.
    ///
    /// The transport is opened lazily by the spawned loop; a connect
    /// failure degrades back to idle rather than failing `start`.
    pub async fn start(&self) {
        let mut run = self.run.lock().await;
        if self.is_streaming() {
            debug!(session_id = %self.session_id, "already streaming");
            return;
        }

        let cancel = CancellationToken::new();
        self.shared.streaming.store(true, Ordering::SeqCst);
        info!(session_id = %self.session_id, "starting log stream");

        let task = tokio::spawn(consume_loop(
            Arc::clone(&self.connector),
            self.session_id.clone(),
            Arc::clone(&self.shared),
            self.reconnect.clone(),
            cancel.clone(),
        ));
        *run = Some(ActiveRun { cancel, task });
    }

    /// Halt consumption and close the transport. Idempotent.
    ///
    /// Waits for the consumption loop to observe cancellation, so no
    /// batch is appended after this returns.
    pub async fn stop(&self) {
        let mut run = self.run.lock().await;
        let Some(active) = run.take() else {
            return;
        };

        active.cancel.cancel();
        if let Err(error) = active.task.await {
            warn!(session_id = %self.session_id, %error, "consumption task aborted");
        }
        self.shared.streaming.store(false, Ordering::SeqCst);
        info!(session_id = %self.session_id, "log stream stopped");
    }

    /// Stop when streaming, start when idle.
    pub async fn toggle(&self) {
        if self.is_streaming() {
            self.stop().await;
        } else {
            self.start().await;
        }
    }

    /// Empty the history and the highlight set; streaming state is
    /// untouched.
    pub fn clear(&self) {
        self.shared.buffer.lock().unwrap().clear();
        self.shared.highlights.clear();
        debug!(session_id = %self.session_id, "history cleared");
    }

    /// The current presentation-facing view.
    pub fn snapshot(&self) -> StreamSnapshot {
        StreamSnapshot {
            entries: self.shared.buffer.lock().unwrap().snapshot(),
            new_ids: self.shared.highlights.snapshot(),
            is_streaming: self.is_streaming(),
        }
    }
}

impl Drop for LogStreamController {
    fn drop(&mut self) {
        if let Ok(mut run) = self.run.try_lock() {
            if let Some(active) = run.take() {
                active.cancel.cancel();
            }
        }
    }
}

async fn consume_loop(
    connector: Arc<dyn LogStreamConnector>,
    session_id: String,
    shared: Arc<Shared>,
    reconnect: ReconnectPolicy,
    cancel: CancellationToken,
) {
    let mut attempt: u8 = 0;

    'stream: loop {
        if attempt > 0 {
            let delay = reconnect.delay_for(attempt);
            debug!(session_id = %session_id, attempt, ?delay, "reconnecting after backoff");
            tokio::select! {
                biased;
                () = cancel.cancelled() => break 'stream,
                () = tokio::time::sleep(delay) => {}
            }
        }

        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => break 'stream,
            result = connector.connect(&session_id) => result,
        };
        let mut transport = match connected {
            Ok(transport) => transport,
            Err(error) => {
                warn!(session_id = %session_id, %error, "failed to open log stream");
                if attempt >= reconnect.max_retries {
                    break 'stream;
                }
                attempt += 1;
                continue 'stream;
            }
        };
        info!(session_id = %session_id, "log stream open");

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => break 'stream,
                batch = transport.next_batch() => batch,
            };
            match next {
                Some(records) => {
                    // Cancellation may land between the recv and here;
                    // never mutate the buffer past it.
                    if cancel.is_cancelled() {
                        break 'stream;
                    }
                    attempt = 0;
                    shared.ingest(records);
                }
                None => {
                    debug!(session_id = %session_id, "log stream ended");
                    if attempt >= reconnect.max_retries {
                        break 'stream;
                    }
                    attempt += 1;
                    continue 'stream;
                }
            }
        }
    }

    shared.streaming.store(false, Ordering::SeqCst);
    debug!(session_id = %session_id, "consumption loop exited");
}
