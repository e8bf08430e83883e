//! Byte chunks to lines.

use tracing::debug;

/// Incremental UTF-8 line decoder.
///
/// Feed chunks in arrival order with [`push`](Self::push); each call returns
/// the lines completed by that chunk, terminator stripped. A multi-byte
/// character split across chunks is held back until its remaining bytes
/// arrive, so any split of the same bytes yields the same lines.
///
/// Invalid byte sequences are replaced with U+FFFD rather than failing the
/// chunk. Only the line containing them is affected. A byte order mark at
/// the very start of the stream is dropped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Trailing bytes of an incomplete UTF-8 sequence
    carry: Vec<u8>,
    /// Decoded text after the last `\n`
    pending: String,
    /// Set once the first decoded character has been seen
    past_start: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk);
        self.strip_leading_bom();
        self.drain_lines()
    }

    /// Text received after the last terminator.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// End of stream: drop the unterminated tail.
    ///
    /// The producer terminates every complete record, so a tail without a
    /// terminator is a truncated record and is never emitted.
    pub fn finish(&mut self) {
        if !self.pending.is_empty() || !self.carry.is_empty() {
            debug!(
                pending_bytes = self.pending.len() + self.carry.len(),
                "Discarding unterminated tail at end of stream"
            );
        }
        self.pending.clear();
        self.carry.clear();
        self.past_start = false;
    }

    fn strip_leading_bom(&mut self) {
        if self.past_start || self.pending.is_empty() {
            return;
        }
        if self.pending.starts_with('\u{FEFF}') {
            self.pending.drain(..'\u{FEFF}'.len_utf8());
        }
        self.past_start = true;
    }

    fn decode(&mut self, chunk: &[u8]) {
        let joined;
        let mut input: &[u8] = if self.carry.is_empty() {
            chunk
        } else {
            let mut bytes = std::mem::take(&mut self.carry);
            bytes.extend_from_slice(chunk);
            joined = bytes;
            &joined
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.pending.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.pending.push_str(text);
                    }
                    match err.error_len() {
                        // Sequence cut off by the chunk boundary
                        None => {
                            self.carry = rest.to_vec();
                            return;
                        }
                        Some(len) => {
                            self.pending.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                    }
                }
            }
        }
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].find('\n') {
            let end = start + offset;
            lines.push(self.pending[start..end].trim_end_matches('\r').to_string());
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }
}
