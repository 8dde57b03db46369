//! The SSE-backed transport: a reader task bridging the push-style HTTP
//! body into the pull-style batch sequence.

use async_trait::async_trait;
use futures_util::StreamExt;
use livetail_core::{Batch, LogStreamTransport};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::decode::decode_batch;
use crate::frame::SseFrameDecoder;

/// Decoded batches buffered between the reader task and the consumer.
/// Bounds memory when the consumer falls behind.
const BATCH_CHANNEL_CAPACITY: usize = 32;

/// One live SSE subscription.
///
/// A spawned reader task owns the HTTP response, decodes frames and
/// pushes batches into a bounded channel; `next_batch` awaits the
/// receiver and sees `None` once the channel closes — the terminal
/// signal for connection loss, server close, and cancellation alike.
/// Dropping the transport cancels the reader, which releases the
/// connection.
pub struct SseTransport {
    batches: mpsc::Receiver<Batch>,
    _reader_guard: DropGuard,
}

impl SseTransport {
    pub(crate) fn spawn(response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        tokio::spawn(read_loop(response, tx, cancel.clone()));
        Self {
            batches: rx,
            _reader_guard: cancel.drop_guard(),
        }
    }
}

#[async_trait]
impl LogStreamTransport for SseTransport {
    async fn next_batch(&mut self) -> Option<Batch> {
        self.batches.recv().await
    }
}

async fn read_loop(
    response: reqwest::Response,
    tx: mpsc::Sender<Batch>,
    cancel: CancellationToken,
) {
    let mut decoder = SseFrameDecoder::new();
    let mut chunks = response.bytes_stream();

    loop {
        let chunk = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            chunk = chunks.next() => chunk,
        };

        match chunk {
            Some(Ok(bytes)) => {
                for payload in decoder.push_chunk(&bytes) {
                    let Some(batch) = decode_batch(&payload) else {
                        continue;
                    };
                    let delivered = tokio::select! {
                        biased;
                        () = cancel.cancelled() => return,
                        sent = tx.send(batch) => sent.is_ok(),
                    };
                    if !delivered {
                        // Consumer is gone
                        return;
                    }
                }
            }
            Some(Err(error)) => {
                warn!(%error, "log stream connection failed");
                break;
            }
            None => {
                debug!("log stream closed by server");
                break;
            }
        }
    }
    // tx drops here; the receiver observes the end of the sequence
}
