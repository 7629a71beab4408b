//! Wire JSON → native values.
//!
//! Cells arrive wrapped in the table-data envelope: scalars as `{"v": ...}`,
//! records as `{"f": [cell, ...]}` with one cell per subfield, and repeated
//! fields as arrays of `{"v": ...}` wrappers. Every conversion is driven by the
//! schema; nothing is inferred from the wire value itself.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use crate::context::WireContext;
use crate::error::{BigQueryError, Result};
use crate::row::Row;
use crate::schema::{field_to_index_mapping, json_type_name, FieldType, SchemaField};
use crate::temporal;
use crate::traits::{to_schema_fields, IntoSchemaField};
use crate::value::{parse_decimal, parse_float_text, BigQueryValue, Interval};

const VALUE_KEY: &str = "v";
const FIELDS_KEY: &str = "f";

fn interval_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<calendar_sign>-?)(?P<years>[0-9]+)-(?P<months>[0-9]+) ",
            r"(?P<days>-?[0-9]+) ",
            r"(?P<time_sign>-?)(?P<hours>[0-9]+):(?P<minutes>[0-9]+):(?P<seconds>[0-9]+)",
            r"\.?(?P<fraction>[0-9]*)?$",
        ))
        .expect("interval pattern is valid")
    })
}

/// Decode one wire value for `field`, treating it as type `field_type`.
///
/// A null wire value decodes to [`BigQueryValue::Null`] unless the field is
/// REQUIRED, in which case it is an error.
pub fn scalar_from_json(
    field_type: FieldType,
    raw: &JsonValue,
    field: &SchemaField,
    context: WireContext,
) -> Result<BigQueryValue> {
    if raw.is_null() {
        return null_for(field);
    }

    match field_type {
        FieldType::Integer | FieldType::Int64 => int_from_json(raw),
        FieldType::Float | FieldType::Float64 => float_from_json(raw),
        FieldType::Numeric
        | FieldType::BigNumeric
        | FieldType::Decimal
        | FieldType::BigDecimal => {
            let (unscaled, scale) = parse_decimal(&raw_text(raw)?)?;
            Ok(BigQueryValue::Numeric(unscaled, scale))
        }
        FieldType::Boolean | FieldType::Bool => bool_from_json(raw),
        FieldType::String | FieldType::Geography => Ok(BigQueryValue::string(raw_text(raw)?)),
        FieldType::Bytes => {
            let decoded = STANDARD.decode(raw_text(raw)?.as_bytes())?;
            Ok(BigQueryValue::Bytes(Bytes::from(decoded)))
        }
        FieldType::Timestamp => {
            let text = raw_text(raw)?;
            let ts = match context {
                WireContext::Row => temporal::timestamp_from_micros(&text)?,
                WireContext::QueryParameter => temporal::parse_query_param_timestamp(&text)?,
            };
            Ok(BigQueryValue::Timestamp(ts))
        }
        FieldType::DateTime => Ok(BigQueryValue::DateTime(temporal::parse_datetime(
            &raw_text(raw)?,
        )?)),
        FieldType::Date => Ok(BigQueryValue::Date(temporal::parse_date(&raw_text(raw)?)?)),
        FieldType::Time => Ok(BigQueryValue::Time(temporal::parse_time(&raw_text(raw)?)?)),
        FieldType::Interval => interval_from_json(&raw_text(raw)?),
        FieldType::Record => record_from_json(raw, field, context),
    }
}

/// Decode a query-parameter value; identical to the row rules except TIMESTAMP
pub fn query_param_from_json(raw: &JsonValue, field: &SchemaField) -> Result<BigQueryValue> {
    field_from_json(field, raw, WireContext::QueryParameter)
}

/// Decode a field's wire resource, expanding REPEATED fields into a list
pub fn field_from_json(
    field: &SchemaField,
    resource: &JsonValue,
    context: WireContext,
) -> Result<BigQueryValue> {
    if !field.is_repeated() {
        return scalar_from_json(field.field_type, resource, field, context);
    }

    let items = resource
        .as_array()
        .ok_or_else(|| BigQueryError::type_mismatch("array", json_type_name(resource)))?;
    items
        .iter()
        .map(|item| scalar_from_json(field.field_type, cell_value(item)?, field, context))
        .collect::<Result<Vec<_>>>()
        .map(BigQueryValue::List)
}

/// Decode a `{"f": [...]}` record cell into a name-keyed record.
///
/// Subfields and cells are matched by position.
pub fn record_from_json(
    raw: &JsonValue,
    field: &SchemaField,
    context: WireContext,
) -> Result<BigQueryValue> {
    if raw.is_null() {
        return null_for(field);
    }

    let cells = record_cells(raw)?;
    let mut record = IndexMap::with_capacity(field.fields.len());
    for (subfield, cell) in field.fields.iter().zip(cells) {
        let value = field_from_json(subfield, cell_value(cell)?, context)?;
        record.insert(Arc::from(subfield.name.as_str()), value);
    }
    Ok(BigQueryValue::Record(record))
}

/// Convert one `{"f": [...]}` row into positional native values
pub fn row_tuple_from_json(row: &JsonValue, fields: &[SchemaField]) -> Result<Vec<BigQueryValue>> {
    let cells = record_cells(row)?;
    fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| field_from_json(field, cell_value(cell)?, WireContext::Row))
        .collect()
}

/// Convert one row, normalizing the schema first
pub fn row_from_json<I>(row: &JsonValue, schema: I) -> Result<Row>
where
    I: IntoIterator,
    I::Item: IntoSchemaField,
{
    let fields = to_schema_fields(schema)?;
    let field_to_index = Arc::new(field_to_index_mapping(&fields));
    Ok(Row::new(row_tuple_from_json(row, &fields)?, field_to_index))
}

/// Convert a page of rows; all rows share one name→index mapping
pub fn rows_from_json<I>(values: &[JsonValue], schema: I) -> Result<Vec<Row>>
where
    I: IntoIterator,
    I::Item: IntoSchemaField,
{
    let fields = to_schema_fields(schema)?;
    let field_to_index = Arc::new(field_to_index_mapping(&fields));
    tracing::debug!(rows = values.len(), fields = fields.len(), "decoding table rows");

    values
        .iter()
        .map(|raw| {
            row_tuple_from_json(raw, &fields)
                .map(|values| Row::new(values, Arc::clone(&field_to_index)))
        })
        .collect()
}

fn null_for(field: &SchemaField) -> Result<BigQueryValue> {
    if field.is_required() {
        Err(BigQueryError::NullOnRequired {
            field: field.name.clone(),
            field_type: field.field_type,
        })
    } else {
        Ok(BigQueryValue::Null)
    }
}

fn cell_value(cell: &JsonValue) -> Result<&JsonValue> {
    cell.get(VALUE_KEY).ok_or_else(|| {
        BigQueryError::type_mismatch(r#"cell {"v": ...}"#, json_type_name(cell))
    })
}

fn record_cells(raw: &JsonValue) -> Result<&Vec<JsonValue>> {
    raw.get(FIELDS_KEY)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| BigQueryError::type_mismatch(r#"record {"f": [...]}"#, json_type_name(raw)))
}

// Scalars normally arrive as strings, but numbers and booleans are accepted too
fn raw_text(raw: &JsonValue) -> Result<Cow<'_, str>> {
    match raw {
        JsonValue::String(s) => Ok(Cow::Borrowed(s)),
        JsonValue::Number(n) => Ok(Cow::Owned(n.to_string())),
        JsonValue::Bool(b) => Ok(Cow::Owned(b.to_string())),
        other => Err(BigQueryError::type_mismatch("scalar", json_type_name(other))),
    }
}

fn int_from_json(raw: &JsonValue) -> Result<BigQueryValue> {
    if let Some(i) = raw.as_i64() {
        return Ok(BigQueryValue::Integer(i));
    }
    Ok(BigQueryValue::Integer(raw_text(raw)?.trim().parse()?))
}

fn float_from_json(raw: &JsonValue) -> Result<BigQueryValue> {
    if let Some(f) = raw.as_f64() {
        return Ok(BigQueryValue::float(f));
    }
    Ok(BigQueryValue::float(parse_float_text(&raw_text(raw)?)?))
}

fn bool_from_json(raw: &JsonValue) -> Result<BigQueryValue> {
    if let Some(b) = raw.as_bool() {
        return Ok(BigQueryValue::Boolean(b));
    }
    let text = raw_text(raw)?.to_lowercase();
    Ok(BigQueryValue::Boolean(matches!(
        text.as_str(),
        "t" | "true" | "1"
    )))
}

fn interval_from_json(text: &str) -> Result<BigQueryValue> {
    let caps = interval_pattern().captures(text).ok_or_else(|| {
        BigQueryError::format(format!("got interval: '{}' with unexpected format", text))
    })?;

    let calendar_sign = if &caps["calendar_sign"] == "-" { -1 } else { 1 };
    let time_sign = if &caps["time_sign"] == "-" { -1 } else { 1 };

    let fraction = caps.name("fraction").map_or("", |m| m.as_str());
    let microseconds = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<6}", fraction);
        time_sign * padded[..6].parse::<i64>()?
    };

    Ok(BigQueryValue::Interval(Interval {
        years: calendar_sign * caps["years"].parse::<i64>()?,
        months: calendar_sign * caps["months"].parse::<i64>()?,
        days: caps["days"].parse()?,
        hours: time_sign * caps["hours"].parse::<i64>()?,
        minutes: time_sign * caps["minutes"].parse::<i64>()?,
        seconds: time_sign * caps["seconds"].parse::<i64>()?,
        microseconds,
    }))
}
