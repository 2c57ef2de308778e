use crate::error::{CaptureError, CaptureResult};
use crate::parser::{Record, Schema};

/// Column-oriented history of one session.
///
/// Every accepted record adds one value to every column, so all columns
/// always have the same length. History is never truncated; renderers
/// look at it through [`SeriesBuffer::tail`].
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl SeriesBuffer {
    pub fn new(schema: &Schema) -> Self {
        Self {
            names: schema.header(),
            columns: vec![Vec::new(); schema.width()],
        }
    }

    /// Append one record across all columns.
    ///
    /// A record of the wrong width is refused before any column is touched.
    pub fn append(&mut self, record: &Record) -> CaptureResult<()> {
        if record.len() != self.columns.len() {
            return Err(CaptureError::RaggedRecord {
                expected: self.columns.len(),
                found: record.len(),
            });
        }

        for (column, value) in self.columns.iter_mut().zip(record.values()) {
            column.push(value.as_f64());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let index = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[index])
    }

    /// Last `min(n, len)` values of `name` in chronological order.
    pub fn tail(&self, name: &str, n: usize) -> Option<&[f64]> {
        let column = self.column(name)?;
        let start = column.len().saturating_sub(n);
        Some(&column[start..])
    }

    pub fn latest(&self, name: &str) -> Option<f64> {
        self.column(name)?.last().copied()
    }

    /// Largest value in `name`, or `default` when the column is empty or unknown.
    /// NaN values are ignored.
    pub fn max_or(&self, name: &str, default: f64) -> f64 {
        self.column(name)
            .into_iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(default)
    }
}
