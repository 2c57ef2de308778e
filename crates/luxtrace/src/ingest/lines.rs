use bytes::BytesMut;
use tracing::warn;

/// Upper bound for an unterminated line held between reads.
pub const MAX_LINE_SIZE: usize = 64 * 1024;

/// Reassembles newline-delimited lines from arbitrary read chunks.
///
/// A serial read can end in the middle of a line; the unterminated tail
/// is held back and completed by the next chunk.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: BytesMut,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self {
            pending: BytesMut::with_capacity(1024),
        }
    }

    /// Feed one chunk and collect every line it completes.
    /// Trailing `\r` is stripped and invalid UTF-8 is replaced.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line = self.pending.split_to(pos + 1);
            let text = String::from_utf8_lossy(&line[..pos]);
            lines.push(text.trim_end_matches('\r').to_string());
        }

        if self.pending.len() > MAX_LINE_SIZE {
            warn!(
                "Discarding {} bytes without a line terminator (limit {})",
                self.pending.len(),
                MAX_LINE_SIZE
            );
            self.pending.clear();
        }

        lines
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
