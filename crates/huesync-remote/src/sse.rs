//! Incremental Server-Sent Events parsing
//!
//! The push channel arrives as a text/event-stream body in arbitrary chunk
//! boundaries. [`SseParser`] buffers chunks and yields complete frames; a
//! frame is dispatched on the blank line that terminates it, with the
//! `event` name defaulting to `message` and multi-line `data` joined with
//! newlines, per the protocol.

use std::mem;

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name (`message` when the server sent none)
    pub event: String,
    /// Data payload, multi-line fields joined with `\n`
    pub data: String,
    /// Reconnection interval in milliseconds, when the server sent one
    pub retry: Option<u64>,
}

/// Incremental parser over stream chunks
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: String,
    data_lines: Vec<String>,
    retry: Option<u64>,
}

impl SseParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect any frames it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim_end_matches('\r').to_string();
            self.buffer.drain(..=pos);

            if line.is_empty() {
                if let Some(frame) = self.take_frame() {
                    frames.push(frame);
                }
                continue;
            }

            // Comment line
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line.as_str(), ""),
            };

            match field {
                "event" => self.event = value.to_string(),
                "data" => self.data_lines.push(value.to_string()),
                "retry" => {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(ms);
                    }
                }
                // `id` and unknown fields are ignored
                _ => {}
            }
        }

        frames
    }

    fn take_frame(&mut self) -> Option<SseFrame> {
        let retry = self.retry.take();
        if self.event.is_empty() && self.data_lines.is_empty() && retry.is_none() {
            return None;
        }

        let event = if self.event.is_empty() {
            "message".to_string()
        } else {
            mem::take(&mut self.event)
        };

        let data = self.data_lines.join("\n");
        self.data_lines.clear();

        Some(SseFrame { event, data, retry })
    }
}
