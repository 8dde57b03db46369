//! Incremental decoding of the SSE wire framing.
//!
//! The upstream can emit non-UTF8 bytes and split frames at arbitrary
//! chunk boundaries, so lines are assembled byte-wise and decoded
//! lossily before field parsing.

/// Accumulates raw bytes and yields one payload string per completed
/// event.
///
/// Per the SSE framing rules: `data:` field lines are collected (joined
/// with `\n` when an event carries several), a blank line dispatches the
/// event, comment lines (leading `:`) and non-data fields (`event:`,
/// `id:`, `retry:`) are skipped, and a trailing `\r` is tolerated.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    line_buf: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseFrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns the payloads of all events
    /// completed by it.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                let mut line = std::mem::take(&mut self.line_buf);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                let line = String::from_utf8_lossy(&line).into_owned();
                if let Some(payload) = self.push_line(&line) {
                    completed.push(payload);
                }
            } else {
                self.line_buf.push(byte);
            }
        }
        completed
    }

    fn push_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data_lines.is_empty() {
                return None;
            }
            return Some(self.data_lines.drain(..).collect::<Vec<_>>().join("\n"));
        }
        if line.starts_with(':') {
            // Comment / keep-alive ping
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
        None
    }
}
