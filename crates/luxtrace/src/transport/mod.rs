//! Transport — byte-oriented link to the telemetry producer.
//!
//! The ingestion loop talks to the device only through [`Transport`].
//! `serial.rs` provides the real serial-port implementation.
//! `fake.rs` provides a scripted test double.

pub mod fake;
pub mod serial;

use std::time::Duration;
use thiserror::Error;

pub use fake::{FakeProbe, FakeTransport};
pub use serial::SerialTransport;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Port unavailable: {0}")]
    Unavailable(String),
    #[error("Transport already closed")]
    Closed,
}

/// Parameters used to open the link.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSettings {
    pub port: String,
    pub baud: u32,
    pub read_timeout: Duration,
}

/// Point-to-point duplex byte stream.
///
/// One owner at a time; no method is expected to block longer than the
/// configured read timeout.
pub trait Transport {
    /// Bytes buffered by the driver and ready to read.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Read up to `buf.len()` already-available bytes. Returns 0 when nothing arrived.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Drop everything received so far.
    fn clear_input(&mut self) -> Result<(), TransportError>;

    /// Send one newline-terminated command to the device.
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Release the underlying device. Idempotent.
    fn close(&mut self);
}
