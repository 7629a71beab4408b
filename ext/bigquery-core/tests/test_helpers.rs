#![allow(dead_code)]

use bigquery_core::*;
use serde_json::{json, Value as JsonValue};

/// Wrap a wire value in a `{"v": ...}` cell
pub fn cell(value: JsonValue) -> JsonValue {
    json!({ "v": value })
}

/// Wrap cells in a `{"f": [...]}` record or row
pub fn record(cells: Vec<JsonValue>) -> JsonValue {
    json!({ "f": cells })
}

/// Wire form of a REPEATED field
pub fn repeated(values: Vec<JsonValue>) -> JsonValue {
    JsonValue::Array(values.into_iter().map(cell).collect())
}

pub fn nullable(name: &str, field_type: FieldType) -> SchemaField {
    SchemaField::new(name, field_type)
}

pub fn required(name: &str, field_type: FieldType) -> SchemaField {
    SchemaField::new(name, field_type).with_mode(Mode::Required)
}

pub fn repeated_field(name: &str, field_type: FieldType) -> SchemaField {
    SchemaField::new(name, field_type).with_mode(Mode::Repeated)
}

/// Every scalar type paired with a valid non-null wire value
pub fn scalar_samples() -> Vec<(FieldType, JsonValue)> {
    vec![
        (FieldType::Integer, json!("42")),
        (FieldType::Int64, json!("-7")),
        (FieldType::Float, json!("1.5")),
        (FieldType::Float64, json!(2.25)),
        (FieldType::Numeric, json!("123.456")),
        (FieldType::BigNumeric, json!("-0.000001")),
        (FieldType::Boolean, json!("true")),
        (FieldType::Bool, json!("false")),
        (FieldType::String, json!("hello")),
        (FieldType::Geography, json!("POINT(1 2)")),
        (FieldType::Bytes, json!("aGVsbG8=")),
        (FieldType::Timestamp, json!("1700000000000000")),
        (FieldType::DateTime, json!("2024-01-02T03:04:05.123456")),
        (FieldType::Date, json!("2024-01-02")),
        (FieldType::Time, json!("12:30:00")),
        (FieldType::Interval, json!("1-2 3 4:5:6")),
    ]
}

/// Decode a single row and return its positional values
pub fn decode_row(row: &JsonValue, fields: &[SchemaField]) -> Vec<BigQueryValue> {
    row_tuple_from_json(row, fields).expect("row should decode")
}
