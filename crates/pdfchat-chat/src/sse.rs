//! Incremental server-sent-event parser.
//!
//! Network reads split events arbitrarily: one read may hold several events,
//! and one event (or one UTF-8 character, or one `\r\n` pair) may span reads.
//! `EventParser` buffers across `feed` calls and only emits complete events.

/// One complete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the last `event:` field, if any.
    pub event: Option<String>,
    /// Last event id seen on the stream.
    pub id: Option<String>,
    /// `data:` lines joined with `\n`.
    pub data: String,
}

#[derive(Debug, Default)]
pub struct EventParser {
    /// Undecoded bytes: the incomplete tail of a multi-byte character.
    pending: Vec<u8>,
    /// Decoded text not yet terminated by a line ending.
    buffer: String,
    bom_checked: bool,
    data: String,
    event_type: Option<String>,
    last_event_id: Option<String>,
    retry: Option<u64>,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnection interval announced by the server, in milliseconds.
    pub fn retry(&self) -> Option<u64> {
        self.retry
    }

    /// Push one network read and collect every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.decode(chunk);
        let mut events = Vec::new();
        self.drain_lines(false, &mut events);
        events
    }

    /// Flush at end of input. A trailing `\r` counts as a line ending; an
    /// event without its terminating blank line is discarded.
    pub fn finish(&mut self) -> Vec<SseEvent> {
        if !self.pending.is_empty() {
            self.buffer
                .push_str(&String::from_utf8_lossy(&std::mem::take(&mut self.pending)));
        }
        let mut events = Vec::new();
        self.drain_lines(true, &mut events);
        self.buffer.clear();
        self.data.clear();
        self.event_type = None;
        events
    }

    fn decode(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid = start + e.valid_up_to();
                    self.buffer
                        .push_str(std::str::from_utf8(&self.pending[start..valid]).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            start = valid + len;
                        }
                        // Incomplete character at the end; wait for the next read.
                        None => {
                            start = valid;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..start);

        if !self.bom_checked && !self.buffer.is_empty() {
            if self.buffer.starts_with('\u{FEFF}') {
                self.buffer.drain(..'\u{FEFF}'.len_utf8());
            }
            self.bom_checked = true;
        }
    }

    fn drain_lines(&mut self, at_eof: bool, events: &mut Vec<SseEvent>) {
        while let Some(pos) = self.buffer.find(|c: char| c == '\r' || c == '\n') {
            let bytes = self.buffer.as_bytes();
            let terminator = if bytes[pos] == b'\r' {
                match bytes.get(pos + 1) {
                    Some(b'\n') => 2,
                    Some(_) => 1,
                    // Might be the first half of `\r\n`.
                    None if at_eof => 1,
                    None => break,
                }
            } else {
                1
            };

            let line = self.buffer[..pos].to_string();
            self.buffer.drain(..pos + terminator);
            self.process_line(&line, events);
        }
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(events);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.find(':') {
            Some(idx) => {
                let value = &line[idx + 1..];
                (&line[..idx], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => self.event_type = Some(value.to_string()),
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    self.retry = value.parse().ok();
                }
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, events: &mut Vec<SseEvent>) {
        if self.data.is_empty() {
            self.event_type = None;
            return;
        }
        if self.data.ends_with('\n') {
            self.data.pop();
        }
        events.push(SseEvent {
            event: self.event_type.take(),
            id: self.last_event_id.clone(),
            data: std::mem::take(&mut self.data),
        });
    }
}
