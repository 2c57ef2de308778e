/// Telemetry line parsing
///
/// Turns one raw text line into a typed [`Record`] or a [`Rejection`].
///
/// - `model.rs`: schemas, values, records and rejection reasons
/// - `record.rs`: the comma-separated line parser

pub mod model;
pub mod record;

pub use model::{FieldKind, FieldSpec, Record, Rejection, Schema, Value};
pub use record::{parse_record, RecordParser};
