use std::fmt;
use thiserror::Error;

/// Numeric type a telemetry field is decoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Levels and counts (e.g. the PSM duty level of a sweep)
    Integer,
    /// Measurements, timestamps and derived values
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Ordered field layout expected on every line of a session.
///
/// The field names double as the CSV header and as the column
/// names of the series buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// `level,lux` lines emitted while the firmware walks the PSM range.
    pub fn sweep() -> Self {
        Self {
            name: "sweep",
            fields: vec![
                FieldSpec::new("PSM_Level", FieldKind::Integer),
                FieldSpec::new("Lux", FieldKind::Float),
            ],
        }
    }

    /// Six-field control loop telemetry from the live tuning firmware.
    pub fn live() -> Self {
        Self {
            name: "live",
            fields: vec![
                FieldSpec::new("Time_ms", FieldKind::Float),
                FieldSpec::new("Target", FieldKind::Float),
                FieldSpec::new("Raw_Lux", FieldKind::Float),
                FieldSpec::new("Filtered_Lux", FieldKind::Float),
                FieldSpec::new("PSM_Level", FieldKind::Float),
                FieldSpec::new("Gain_Kp", FieldKind::Float),
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn header(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(v) => *v as f64,
            Value::Float(v) => *v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // Display for f64 is the shortest string that parses back to the same value
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One decoded telemetry line.
///
/// Only the parser constructs records, so a `Record` always has exactly
/// the width of the schema it was parsed against.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index).copied()
    }
}

/// Why a line was not turned into a record.
///
/// Rejections are expected noise on a live serial link; callers count
/// and discard them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Field count mismatch: expected {expected}, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("Field {index} ({name}) is not numeric: {text:?}")]
    NotNumeric {
        index: usize,
        name: String,
        text: String,
    },
}
