//! Native values → JSON-safe wire values.
//!
//! Converters never look at the field mode; null handling and repetition are
//! resolved by [`field_to_json`] before a scalar converter runs. Values whose
//! variant doesn't match the declared type fall through unchanged via
//! [`BigQueryValue::to_plain_json`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use std::sync::Arc;

use crate::context::WireContext;
use crate::error::{BigQueryError, Result};
use crate::schema::{FieldType, SchemaField};
use crate::temporal;
use crate::value::{float_to_json, format_decimal, parse_float_text, BigQueryValue};

/// Record input, either keyed by subfield name or aligned by position
#[derive(Debug, Clone, Copy)]
pub enum RecordInput<'a> {
    Named(&'a IndexMap<Arc<str>, BigQueryValue>),
    Positional(&'a [BigQueryValue]),
}

impl<'a> RecordInput<'a> {
    /// Records become named input, lists become positional input
    pub fn from_value(value: &'a BigQueryValue) -> Result<Self> {
        match value {
            BigQueryValue::Record(fields) => Ok(RecordInput::Named(fields)),
            BigQueryValue::List(values) => Ok(RecordInput::Positional(values)),
            other => Err(BigQueryError::type_mismatch(
                "Record or List",
                other.type_name(),
            )),
        }
    }
}

/// Encode a scalar value of type `field_type`
pub fn scalar_to_json(
    field_type: FieldType,
    value: &BigQueryValue,
    context: WireContext,
) -> Result<JsonValue> {
    if value.is_null() {
        return Ok(JsonValue::Null);
    }

    let json = match (field_type, value) {
        (FieldType::Integer | FieldType::Int64, BigQueryValue::Integer(i)) => {
            JsonValue::String(i.to_string())
        }
        (FieldType::Float | FieldType::Float64, _) => float_value_to_json(value)?,
        (
            FieldType::Numeric
            | FieldType::BigNumeric
            | FieldType::Decimal
            | FieldType::BigDecimal,
            BigQueryValue::Numeric(unscaled, scale),
        ) => JsonValue::String(format_decimal(unscaled, *scale)),
        (FieldType::Boolean | FieldType::Bool, BigQueryValue::Boolean(b)) => {
            JsonValue::String(if *b { "true" } else { "false" }.to_string())
        }
        (FieldType::Bytes, BigQueryValue::Bytes(b)) => JsonValue::String(STANDARD.encode(b)),
        (FieldType::Timestamp, _) => match context {
            WireContext::Row => timestamp_to_json_row(value),
            WireContext::QueryParameter => timestamp_to_json_parameter(value),
        },
        (FieldType::DateTime, _) => datetime_to_json(value),
        (FieldType::Date, BigQueryValue::Date(d)) => JsonValue::String(temporal::format_date(*d)),
        (FieldType::Time, BigQueryValue::Time(t)) => JsonValue::String(temporal::format_time(*t)),
        // STRING, GEOGRAPHY and mismatched values pass through
        _ => value.to_plain_json(),
    };
    Ok(json)
}

fn float_value_to_json(value: &BigQueryValue) -> Result<JsonValue> {
    let f = match value {
        BigQueryValue::Float(f) => f.0,
        BigQueryValue::Integer(i) => *i as f64,
        BigQueryValue::String(s) => parse_float_text(s)?,
        BigQueryValue::Numeric(unscaled, scale) => {
            parse_float_text(&format_decimal(unscaled, *scale))?
        }
        other => {
            return Err(BigQueryError::type_mismatch(
                "Float, Integer, Numeric or String",
                other.type_name(),
            ))
        }
    };
    Ok(float_to_json(f))
}

fn timestamp_to_json_row(value: &BigQueryValue) -> JsonValue {
    match value {
        BigQueryValue::Timestamp(ts) => {
            JsonValue::String(temporal::format_timestamp_row(temporal::utc_datetime(*ts)))
        }
        BigQueryValue::Zoned(z) => JsonValue::String(temporal::format_timestamp_row(
            temporal::utc_datetime(z.timestamp()),
        )),
        // Naive datetimes are taken to be UTC already
        BigQueryValue::DateTime(dt) => JsonValue::String(temporal::format_timestamp_row(*dt)),
        other => other.to_plain_json(),
    }
}

fn timestamp_to_json_parameter(value: &BigQueryValue) -> JsonValue {
    match value {
        BigQueryValue::Timestamp(ts) => {
            JsonValue::String(temporal::format_timestamp_param(temporal::utc_datetime(*ts)))
        }
        BigQueryValue::Zoned(z) => JsonValue::String(temporal::format_timestamp_param(
            temporal::utc_datetime(z.timestamp()),
        )),
        BigQueryValue::DateTime(dt) => JsonValue::String(temporal::format_timestamp_param(*dt)),
        other => other.to_plain_json(),
    }
}

fn datetime_to_json(value: &BigQueryValue) -> JsonValue {
    match value {
        BigQueryValue::DateTime(dt) => JsonValue::String(temporal::format_datetime_micros(*dt)),
        BigQueryValue::Zoned(z) => JsonValue::String(temporal::format_datetime_micros(
            temporal::utc_datetime(z.timestamp()),
        )),
        BigQueryValue::Timestamp(ts) => JsonValue::String(temporal::format_datetime_micros(
            temporal::utc_datetime(*ts),
        )),
        other => other.to_plain_json(),
    }
}

/// Encode a field value; nulls stay null regardless of mode
pub fn field_to_json(
    field: &SchemaField,
    value: &BigQueryValue,
    context: WireContext,
) -> Result<JsonValue> {
    if value.is_null() {
        return Ok(JsonValue::Null);
    }

    if field.is_repeated() {
        let BigQueryValue::List(items) = value else {
            return Err(BigQueryError::type_mismatch(
                format!("List for REPEATED field '{}'", field.name),
                value.type_name(),
            ));
        };
        return items
            .iter()
            .map(|item| single_field_to_json(field, item, context))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array);
    }

    single_field_to_json(field, value, context)
}

/// Encode one (non-repeated) value of a field, ignoring its mode
pub fn single_field_to_json(
    field: &SchemaField,
    value: &BigQueryValue,
    context: WireContext,
) -> Result<JsonValue> {
    if value.is_null() {
        return Ok(JsonValue::Null);
    }

    if field.field_type.is_record() {
        let input = RecordInput::from_value(value)?;
        return record_to_json(&field.fields, input, context).map(JsonValue::Object);
    }

    scalar_to_json(field.field_type, value, context)
}

/// Encode a record against its subfields.
///
/// Null or absent subfields are omitted. Named input keeps keys the schema
/// doesn't declare, rendered as strings.
pub fn record_to_json(
    fields: &[SchemaField],
    input: RecordInput<'_>,
    context: WireContext,
) -> Result<Map<String, JsonValue>> {
    let mut record = Map::new();

    match input {
        RecordInput::Positional(values) => {
            if values.len() != fields.len() {
                return Err(BigQueryError::Arity {
                    values: values.len(),
                    fields: fields.len(),
                });
            }
            for (subfield, subvalue) in fields.iter().zip(values) {
                if !subvalue.is_null() {
                    record.insert(
                        subfield.name.clone(),
                        field_to_json(subfield, subvalue, context)?,
                    );
                }
            }
        }
        RecordInput::Named(values) => {
            for subfield in fields {
                match values.get(subfield.name.as_str()) {
                    Some(subvalue) if !subvalue.is_null() => {
                        record.insert(
                            subfield.name.clone(),
                            field_to_json(subfield, subvalue, context)?,
                        );
                    }
                    _ => {}
                }
            }

            let declared: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
            for (name, subvalue) in values {
                if declared.contains(&**name) || subvalue.is_null() {
                    continue;
                }
                tracing::trace!(field = %name, "passing through field not declared in schema");
                record.insert(name.to_string(), JsonValue::String(subvalue.to_string()));
            }
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Mode;
    use bytes::Bytes;
    use jiff::civil::{date, datetime, time};
    use jiff::tz::{self, TimeZone};
    use serde_json::json;

    fn encode(field_type: FieldType, value: BigQueryValue) -> JsonValue {
        scalar_to_json(field_type, &value, WireContext::Row).unwrap()
    }

    #[test]
    fn test_scalar_rules() {
        assert_eq!(encode(FieldType::Integer, BigQueryValue::Integer(42)), json!("42"));
        assert_eq!(encode(FieldType::Int64, BigQueryValue::string("7")), json!("7"));
        assert_eq!(encode(FieldType::Float, BigQueryValue::float(1.5)), json!(1.5));
        assert_eq!(encode(FieldType::Float, BigQueryValue::string("2.5")), json!(2.5));
        assert_eq!(encode(FieldType::Float64, BigQueryValue::float(f64::NAN)), json!("nan"));
        assert_eq!(
            encode(FieldType::Float64, BigQueryValue::float(f64::INFINITY)),
            json!("inf")
        );
        assert_eq!(
            encode(FieldType::Numeric, BigQueryValue::numeric("1.50").unwrap()),
            json!("1.50")
        );
        assert_eq!(encode(FieldType::Bool, BigQueryValue::Boolean(false)), json!("false"));
        assert_eq!(
            encode(FieldType::Bytes, BigQueryValue::Bytes(Bytes::from_static(b"hello"))),
            json!("aGVsbG8=")
        );
        assert_eq!(encode(FieldType::String, BigQueryValue::string("x")), json!("x"));
        assert_eq!(
            encode(FieldType::Date, BigQueryValue::Date(date(2024, 2, 29))),
            json!("2024-02-29")
        );
        assert_eq!(
            encode(FieldType::Time, BigQueryValue::Time(time(23, 59, 1, 250_000_000))),
            json!("23:59:01.250000")
        );
        assert_eq!(encode(FieldType::Integer, BigQueryValue::Null), JsonValue::Null);
    }

    #[test]
    fn test_float_rejects_unparsable_string() {
        let result =
            scalar_to_json(FieldType::Float, &BigQueryValue::string("abc"), WireContext::Row);
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_forms() {
        let zoned = datetime(2024, 1, 2, 8, 4, 5, 6_000)
            .to_zoned(TimeZone::fixed(tz::offset(5)))
            .unwrap();
        let value = BigQueryValue::Zoned(zoned);

        assert_eq!(
            scalar_to_json(FieldType::Timestamp, &value, WireContext::Row).unwrap(),
            json!("2024-01-02T03:04:05.000006Z")
        );
        assert_eq!(
            scalar_to_json(FieldType::Timestamp, &value, WireContext::QueryParameter).unwrap(),
            json!("2024-01-02 03:04:05.000006+00:00")
        );
        assert_eq!(
            scalar_to_json(FieldType::DateTime, &value, WireContext::Row).unwrap(),
            json!("2024-01-02T03:04:05.000006")
        );
    }

    #[test]
    fn test_naive_datetime_encoding() {
        let naive = BigQueryValue::DateTime(datetime(2024, 1, 2, 3, 4, 5, 0));
        assert_eq!(
            scalar_to_json(FieldType::DateTime, &naive, WireContext::Row).unwrap(),
            json!("2024-01-02T03:04:05.000000")
        );
        assert_eq!(
            scalar_to_json(FieldType::Timestamp, &naive, WireContext::Row).unwrap(),
            json!("2024-01-02T03:04:05.000000Z")
        );
    }

    #[test]
    fn test_field_to_json_null_overrides_mode() {
        for mode in [Mode::Nullable, Mode::Required, Mode::Repeated] {
            let field = SchemaField::new("x", FieldType::Integer).with_mode(mode);
            assert_eq!(
                field_to_json(&field, &BigQueryValue::Null, WireContext::Row).unwrap(),
                JsonValue::Null
            );
        }
    }

    #[test]
    fn test_repeated_requires_list() {
        let field = SchemaField::new("xs", FieldType::Integer).with_mode(Mode::Repeated);
        let ok = field_to_json(
            &field,
            &BigQueryValue::List(vec![BigQueryValue::Integer(1), BigQueryValue::Integer(2)]),
            WireContext::Row,
        )
        .unwrap();
        assert_eq!(ok, json!(["1", "2"]));

        let err = field_to_json(&field, &BigQueryValue::Integer(1), WireContext::Row).unwrap_err();
        assert!(matches!(err, BigQueryError::TypeMismatch { .. }));
    }

    #[test]
    fn test_record_input_resolution() {
        assert!(matches!(
            RecordInput::from_value(&BigQueryValue::List(vec![])),
            Ok(RecordInput::Positional(_))
        ));
        assert!(RecordInput::from_value(&BigQueryValue::Integer(1)).is_err());
    }
}
