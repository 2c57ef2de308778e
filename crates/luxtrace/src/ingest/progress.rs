use std::io::Write;

use crate::ingest::SessionKind;
use crate::parser::Record;

/// One-line status of the latest accepted record.
pub fn progress_line(kind: SessionKind, record: &Record) -> String {
    let field = |i: usize| record.get(i).map_or(f64::NAN, |v| v.as_f64());

    match kind {
        SessionKind::SweepUp | SessionKind::SweepDown => {
            format!("Level: {:3} | Lux: {:8.2}", field(0) as i64, field(1))
        }
        SessionKind::Live => format!(
            "t={:.2}s | Target: {} | Filtered: {:.1} lx | PSM: {}",
            field(0) / 1000.0,
            field(1),
            field(3),
            field(4) as i64
        ),
    }
}

/// Overwrites a single terminal line in place.
#[derive(Debug)]
pub struct Progress {
    enabled: bool,
    dirty: bool,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            dirty: false,
        }
    }

    pub fn show(&mut self, line: &str) {
        if !self.enabled {
            return;
        }
        let mut out = std::io::stdout().lock();
        // Progress output is best-effort
        let _ = write!(out, "\r{}", line);
        let _ = out.flush();
        self.dirty = true;
    }

    /// Move past the progress line so later output starts clean.
    pub fn finish(&mut self) {
        if self.enabled && self.dirty {
            println!();
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_record, Schema};

    #[test]
    fn test_sweep_progress_line() {
        let record = parse_record("10,55.2", &Schema::sweep()).unwrap();
        assert_eq!(progress_line(SessionKind::SweepUp, &record), "Level:  10 | Lux:    55.20");
    }

    #[test]
    fn test_live_progress_line() {
        let record = parse_record("1500,300,280.5,295.34,128,0.8", &Schema::live()).unwrap();
        assert_eq!(
            progress_line(SessionKind::Live, &record),
            "t=1.50s | Target: 300 | Filtered: 295.3 lx | PSM: 128"
        );
    }
}
