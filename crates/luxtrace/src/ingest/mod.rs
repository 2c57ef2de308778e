//! Ingest module — the session state machine and what it leans on.
//!
//! - `session.rs`: session kinds and the immutable run context
//! - `lines.rs`: byte chunks to complete text lines
//! - `engine.rs`: `IngestionLoop`, Connecting -> Listening <-> Processing -> Finished
//! - `stats.rs`: per-session counters and the final summary
//! - `progress.rs`: single-line terminal progress

pub mod engine;
pub mod lines;
pub mod progress;
pub mod session;
pub mod stats;

pub use engine::{IngestionLoop, LoopState, Tick};
pub use lines::{LineSplitter, MAX_LINE_SIZE};
pub use progress::{progress_line, Progress};
pub use session::{IngestMode, Session, SessionKind, STAMP_FORMAT};
pub use stats::{SessionStats, SessionSummary};
