//! Bounded in-memory log history.

use std::collections::VecDeque;

use crate::domain::LogEntry;

/// Maximum number of entries kept in history by default.
pub const DEFAULT_BUFFER_CAPACITY: usize = 500;

/// Capped FIFO history of decoded log entries.
///
/// Appends preserve arrival order; once capacity is exceeded the oldest
/// entries are evicted first. Only the stream controller writes here.
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    /// Create an empty buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append all entries in order, then evict from the head until the
    /// buffer is back within capacity.
    pub fn append(&mut self, entries: Vec<LogEntry>) {
        self.entries.extend(entries);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// An owned copy of the current history, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            id: format!("id-{n}"),
            message: format!("entry-{n}"),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            level: LogLevel::Info,
        }
    }

    #[test]
    fn append_preserves_arrival_order() {
        let mut buffer = LogBuffer::new(10);
        buffer.append(vec![entry(1), entry(2)]);
        buffer.append(vec![entry(3)]);

        let messages: Vec<String> = buffer.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["entry-1", "entry-2", "entry-3"]);
    }

    #[test]
    fn capacity_holds_across_sequential_appends() {
        let mut buffer = LogBuffer::new(DEFAULT_BUFFER_CAPACITY);
        for n in 1..=501 {
            buffer.append(vec![entry(n)]);
            assert!(buffer.len() <= DEFAULT_BUFFER_CAPACITY);
        }

        assert_eq!(buffer.len(), 500);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.first().unwrap().message, "entry-2");
        assert_eq!(snapshot.last().unwrap().message, "entry-501");
    }

    #[test]
    fn oversized_batch_keeps_only_the_most_recent() {
        let mut buffer = LogBuffer::new(5);
        buffer.append((1..=8).map(entry).collect());

        let messages: Vec<String> = buffer.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["entry-4", "entry-5", "entry-6", "entry-7", "entry-8"]);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let mut buffer = LogBuffer::new(10);
        buffer.append(vec![entry(1)]);
        let snapshot = buffer.snapshot();

        buffer.append(vec![entry(2)]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn clear_empties_the_history() {
        let mut buffer = LogBuffer::new(10);
        buffer.append(vec![entry(1), entry(2)]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 10);
    }
}
