use crate::parser::model::{FieldKind, Record, Rejection, Schema, Value};

/// Parse one telemetry line against `schema`.
///
/// The line is trimmed and split on commas; every field must convert to
/// its declared type or the whole line is rejected. Nothing partial is
/// ever returned.
pub fn parse_record(line: &str, schema: &Schema) -> Result<Record, Rejection> {
    let parts: Vec<&str> = line.trim().split(',').collect();

    if parts.len() != schema.width() {
        return Err(Rejection::FieldCountMismatch {
            expected: schema.width(),
            found: parts.len(),
        });
    }

    let mut values = Vec::with_capacity(parts.len());
    for (index, (raw, spec)) in parts.iter().zip(&schema.fields).enumerate() {
        let text = raw.trim();
        let value = match spec.kind {
            FieldKind::Integer => text.parse::<i64>().ok().map(Value::Int),
            FieldKind::Float => text.parse::<f64>().ok().map(Value::Float),
        };

        match value {
            Some(v) => values.push(v),
            None => {
                return Err(Rejection::NotNumeric {
                    index,
                    name: spec.name.clone(),
                    text: text.to_string(),
                })
            }
        }
    }

    Ok(Record::new(values))
}

/// Parser bound to the schema of one session.
#[derive(Debug, Clone)]
pub struct RecordParser {
    schema: Schema,
}

impl RecordParser {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn parse(&self, line: &str) -> Result<Record, Rejection> {
        parse_record(line, &self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Accepted lines ───────────────────────────────────────────

    #[test]
    fn test_parse_sweep_line() {
        let record = parse_record("10,55.2", &Schema::sweep()).unwrap();
        assert_eq!(record.values(), &[Value::Int(10), Value::Float(55.2)]);
    }

    #[test]
    fn test_parse_trims_line_and_fields() {
        let record = parse_record("  20 , 110.4 \r\n", &Schema::sweep()).unwrap();
        assert_eq!(record.get(0), Some(Value::Int(20)));
        assert_eq!(record.get(1), Some(Value::Float(110.4)));
    }

    #[test]
    fn test_parse_live_line() {
        let parser = RecordParser::new(Schema::live());
        let record = parser.parse("1500,300,280.5,295.25,128,0.8").unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(record.get(0), Some(Value::Float(1500.0)));
        assert_eq!(record.get(4), Some(Value::Float(128.0)));
        assert_eq!(record.get(5), Some(Value::Float(0.8)));
    }

    // ── Rejections ───────────────────────────────────────────────

    #[test]
    fn test_non_numeric_field_rejected() {
        let err = parse_record("abc,100", &Schema::sweep()).unwrap_err();
        assert_eq!(
            err,
            Rejection::NotNumeric {
                index: 0,
                name: "PSM_Level".to_string(),
                text: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_extra_field_rejected() {
        let err = parse_record("10,20,30", &Schema::sweep()).unwrap_err();
        assert_eq!(err, Rejection::FieldCountMismatch { expected: 2, found: 3 });
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = parse_record("1500,300,280.5", &Schema::live()).unwrap_err();
        assert_eq!(err, Rejection::FieldCountMismatch { expected: 6, found: 3 });
    }

    #[test]
    fn test_empty_line_rejected_as_count_mismatch() {
        let err = parse_record("", &Schema::sweep()).unwrap_err();
        assert!(matches!(err, Rejection::FieldCountMismatch { found: 1, .. }));
    }

    #[test]
    fn test_fractional_level_rejected_for_integer_field() {
        let err = parse_record("10.5,55.2", &Schema::sweep()).unwrap_err();
        assert!(matches!(err, Rejection::NotNumeric { index: 0, .. }));
    }

    #[test]
    fn test_bad_trailing_field_rejects_whole_line() {
        let err = parse_record("1500,300,280.5,295.25,128,x", &Schema::live()).unwrap_err();
        assert!(matches!(err, Rejection::NotNumeric { index: 5, .. }));
    }

    #[test]
    fn test_sentinel_text_is_not_a_record() {
        assert!(parse_record("Sweep Finished", &Schema::sweep()).is_err());
    }
}
