use std::path::PathBuf;

use crate::parser::Rejection;

/// Counters for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Non-empty reads from the transport
    pub chunks: u64,
    /// Candidate lines examined (sentinel check + parse)
    pub lines_seen: u64,
    pub accepted: u64,
    pub rejected_field_count: u64,
    pub rejected_not_numeric: u64,
    /// Complete lines dropped unparsed by latest-only mode
    pub skipped_stale: u64,
}

impl SessionStats {
    pub fn record_rejection(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::FieldCountMismatch { .. } => self.rejected_field_count += 1,
            Rejection::NotNumeric { .. } => self.rejected_not_numeric += 1,
        }
    }

    pub fn rejected(&self) -> u64 {
        self.rejected_field_count + self.rejected_not_numeric
    }
}

/// What a finished session leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub rows: usize,
    pub csv_path: PathBuf,
    pub image_path: Option<PathBuf>,
    /// Largest value of the measured column, if any row was accepted
    pub peak: Option<f64>,
    /// Whether the sentinel ended the session (as opposed to a stop request)
    pub completed: bool,
    pub stats: SessionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_counted_by_reason() {
        let mut stats = SessionStats::default();
        stats.record_rejection(&Rejection::FieldCountMismatch { expected: 2, found: 3 });
        stats.record_rejection(&Rejection::NotNumeric {
            index: 0,
            name: "PSM_Level".to_string(),
            text: "abc".to_string(),
        });
        stats.record_rejection(&Rejection::FieldCountMismatch { expected: 2, found: 1 });

        assert_eq!(stats.rejected_field_count, 2);
        assert_eq!(stats.rejected_not_numeric, 1);
        assert_eq!(stats.rejected(), 3);
    }
}
