//! Logger — append-only CSV record of a session.
//!
//! The file is opened and closed around every write so a crash loses at
//! most the row being written; the header and all earlier rows stay intact.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CaptureError, CaptureResult};
use crate::parser::Record;

#[derive(Debug)]
pub struct LineLogger {
    path: PathBuf,
    rows: u64,
}

impl LineLogger {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: impl Into<PathBuf>, header: &[String]) -> CaptureResult<Self> {
        let path = path.into();

        let file = File::create(&path).map_err(|e| durability(&path, e.into()))?;
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(header)
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| durability(&path, e))?;

        debug!("Created log {} with {} columns", path.display(), header.len());
        Ok(Self { path, rows: 0 })
    }

    /// Write exactly one row and release the file handle.
    pub fn append(&mut self, record: &Record) -> CaptureResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| durability(&self.path, e.into()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(record.values().iter().map(|v| v.to_string()))
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| durability(&self.path, e))?;

        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }
}

fn durability(path: &Path, source: csv::Error) -> CaptureError {
    CaptureError::Durability {
        path: path.to_path_buf(),
        source,
    }
}

/// Rows of a session log as written, header first.
#[derive(Debug, Clone, PartialEq)]
pub struct LogContents {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Re-read a log written by [`LineLogger`].
pub fn read_log(path: &Path) -> CaptureResult<LogContents> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| durability(path, e))?;

    let header = reader
        .headers()
        .map_err(|e| durability(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| durability(path, e))?;
        rows.push(row.iter().map(str::to_string).collect());
    }

    Ok(LogContents { header, rows })
}
