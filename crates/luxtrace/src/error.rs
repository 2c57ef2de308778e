use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::LoopState;
use crate::transport::TransportError;

/// Fatal session errors.
///
/// Parse rejections and render failures are recovered where they happen
/// and never surface here.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to open transport {port}: {source}")]
    TransportAcquisition {
        port: String,
        #[source]
        source: TransportError,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Log write failed for {}: {source}", path.display())]
    Durability {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record has {found} values but the buffer has {expected} columns")]
    RaggedRecord { expected: usize, found: usize },

    #[error("Ingestion loop is {0:?}, expected Listening")]
    InvalidState(LoopState),
}

pub type CaptureResult<T> = Result<T, CaptureError>;
