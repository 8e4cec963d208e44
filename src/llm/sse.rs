//! Server-Sent Events parser for the chat-completions stream.
//!
//! The chat-completions API streams `data: {...}` events terminated by a
//! `data: [DONE]` sentinel. This parser handles payloads split across
//! arbitrary byte-chunk boundaries, multi-line `data:` fields, comment
//! lines, and CRLF line endings.

/// A parsed SSE data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseData {
    /// The payload from the event's `data:` field(s). Multiple data lines
    /// are joined with `\n`.
    pub data: String,
}

impl SseData {
    /// Whether this payload is the `[DONE]` sentinel.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}

/// Incremental SSE parser over a byte stream.
///
/// Feed chunks with [`push`](Self::push) as they arrive; call
/// [`flush`](Self::flush) when the stream ends to emit any trailing
/// payload that lacked a final blank line.
#[derive(Debug, Default)]
pub struct SseParser {
    line_buffer: String,
    data_lines: Vec<String>,
}

impl SseParser {
    /// Create a new incremental parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a chunk of bytes, returning any payloads completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseData> {
        let text = String::from_utf8_lossy(chunk);
        let mut events = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                let line = std::mem::take(&mut self.line_buffer);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if let Some(event) = self.take_line(line) {
                    events.push(event);
                }
            } else {
                self.line_buffer.push(ch);
            }
        }

        events
    }

    /// Flush any buffered payload as a final event.
    pub fn flush(&mut self) -> Option<SseData> {
        if !self.line_buffer.is_empty() {
            let line = std::mem::take(&mut self.line_buffer);
            let line = line.strip_suffix('\r').unwrap_or(&line);
            self.take_line(line);
        }
        if self.data_lines.is_empty() {
            None
        } else {
            Some(self.build())
        }
    }

    /// Process one complete line; a blank line closes the pending payload.
    fn take_line(&mut self, line: &str) -> Option<SseData> {
        if line.is_empty() {
            if self.data_lines.is_empty() {
                return None;
            }
            return Some(self.build());
        }

        // Comment lines start with ':'.
        if line.starts_with(':') {
            return None;
        }

        if let Some((field, value)) = split_field(line) {
            // Only the data field matters for chat completions; unknown
            // fields are ignored per the SSE spec.
            if field == "data" {
                self.data_lines.push(value.to_string());
            }
        }

        None
    }

    fn build(&mut self) -> SseData {
        let data = self.data_lines.join("\n");
        self.data_lines.clear();
        SseData { data }
    }
}

/// Split a line into (field, value), stripping one leading space after the colon.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let field = &line[..colon];
    let value = line[colon + 1..].strip_prefix(' ').unwrap_or(&line[colon + 1..]);
    Some((field, value))
}

/// Parse a complete SSE body into payloads (test and fixture helper).
pub fn parse_sse_text(text: &str) -> Vec<SseData> {
    let mut parser = SseParser::new();
    let mut events = parser.push(text.as_bytes());
    if let Some(trailing) = parser.flush() {
        events.push(trailing);
    }
    events
}
