//! Fake — scripted transport for tests.
//!
//! [`FakeTransport`] serves a queue of byte chunks, one chunk per read,
//! the way a serial driver hands back whatever arrived since the last
//! poll. A [`FakeProbe`] keeps an eye on what the loop did to the link
//! after the transport itself has been moved into the loop.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Transport, TransportError};

/// Observations shared between a fake transport and its probes.
#[derive(Debug, Default)]
struct Observed {
    writes: Vec<String>,
    cleared: bool,
    closed: bool,
    reads: usize,
}

pub struct FakeTransport {
    stale: Vec<u8>,
    chunks: VecDeque<Vec<u8>>,
    observed: Arc<Mutex<Observed>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            stale: Vec::new(),
            chunks: VecDeque::new(),
            observed: Arc::new(Mutex::new(Observed::default())),
        }
    }

    /// Bytes already sitting in the driver buffer before the session starts.
    pub fn with_stale(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.stale.extend_from_slice(bytes.as_ref());
        self
    }

    /// Queue one raw chunk, delivered by a single read.
    pub fn with_chunk(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.chunks.push_back(bytes.as_ref().to_vec());
        self
    }

    /// Queue newline-terminated lines delivered together in one chunk.
    pub fn with_lines(self, lines: &[&str]) -> Self {
        let mut chunk = String::new();
        for line in lines {
            chunk.push_str(line);
            chunk.push('\n');
        }
        self.with_chunk(chunk)
    }

    pub fn probe(&self) -> FakeProbe {
        FakeProbe {
            observed: Arc::clone(&self.observed),
        }
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.observed.lock().closed {
            return Err(TransportError::Closed);
        }
        Ok(())
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for FakeTransport {
    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        self.ensure_open()?;
        if !self.stale.is_empty() {
            return Ok(self.stale.len());
        }
        Ok(self.chunks.front().map_or(0, Vec::len))
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.ensure_open()?;

        let mut source = if !self.stale.is_empty() {
            std::mem::take(&mut self.stale)
        } else {
            match self.chunks.pop_front() {
                Some(chunk) => chunk,
                None => return Ok(0),
            }
        };

        let n = source.len().min(buf.len());
        buf[..n].copy_from_slice(&source[..n]);
        if n < source.len() {
            // Whatever did not fit stays at the head of the queue
            self.chunks.push_front(source.split_off(n));
        }

        self.observed.lock().reads += 1;
        Ok(n)
    }

    fn clear_input(&mut self) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.stale.clear();
        self.observed.lock().cleared = true;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.observed.lock().writes.push(line.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.observed.lock().closed = true;
    }
}

/// Read-only view of what happened to a [`FakeTransport`].
#[derive(Clone)]
pub struct FakeProbe {
    observed: Arc<Mutex<Observed>>,
}

impl FakeProbe {
    pub fn writes(&self) -> Vec<String> {
        self.observed.lock().writes.clone()
    }

    pub fn was_cleared(&self) -> bool {
        self.observed.lock().cleared
    }

    pub fn is_closed(&self) -> bool {
        self.observed.lock().closed
    }

    pub fn reads(&self) -> usize {
        self.observed.lock().reads
    }
}
