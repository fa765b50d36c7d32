//! Incremental parser for the event-stream framing used by the push
//! channel.
//!
//! Only `event:` and `data:` fields matter to us; `retry:` hints,
//! `id:` fields and comment lines are skipped. A frame is dispatched
//! on the blank line that terminates it.

/// Upper bound on bytes buffered while waiting for a frame to
/// complete. A peer that streams past this without terminating the
/// frame is violating the protocol; the caller drops the connection.
const MAX_PENDING_BYTES: usize = 256 * 1024;

/// One complete server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// The peer exceeded [`MAX_PENDING_BYTES`] without completing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTooLarge;

/// Feeds on raw body chunks and yields completed frames. Partial lines
/// are buffered across chunks.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<SseFrame>, FrameTooLarge> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    frames.push(SseFrame {
                        event: self
                            .event
                            .take()
                            .unwrap_or_else(|| "message".to_string()),
                        data: self.data.join("\n"),
                    });
                    self.data.clear();
                } else {
                    // A frame carrying no data (a lone retry hint, say)
                    // dispatches nothing.
                    self.event = None;
                }
                continue;
            }

            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        if self.pending_bytes() > MAX_PENDING_BYTES {
            self.buffer.clear();
            self.data.clear();
            return Err(FrameTooLarge);
        }

        Ok(frames)
    }

    /// Bytes held for an incomplete line plus accumulated data lines.
    fn pending_bytes(&self) -> usize {
        self.buffer.len() + self.data.iter().map(String::len).sum::<usize>()
    }
}
