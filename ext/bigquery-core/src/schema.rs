use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{BigQueryError, ErrorContext, Result};

/// Logical column types understood by the wire codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    // Integer types
    Integer,
    Int64,

    // Floating point types
    Float,
    Float64,

    // Decimal types
    Numeric,
    BigNumeric,
    Decimal,
    BigDecimal,

    // Other basic types
    Boolean,
    Bool,
    String,
    Geography,
    Bytes,

    // Date/Time types
    Timestamp,
    DateTime,
    Date,
    Time,
    Interval,

    // Nested struct
    Record,
}

/// Repetition mode of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Field can have 0 or 1 value
    #[default]
    Nullable,
    /// Field must have exactly one value
    Required,
    /// Field holds an array of values
    Repeated,
}

impl FieldType {
    /// Canonical API name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Int64 => "INT64",
            FieldType::Float => "FLOAT",
            FieldType::Float64 => "FLOAT64",
            FieldType::Numeric => "NUMERIC",
            FieldType::BigNumeric => "BIGNUMERIC",
            FieldType::Decimal => "DECIMAL",
            FieldType::BigDecimal => "BIGDECIMAL",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Bool => "BOOL",
            FieldType::String => "STRING",
            FieldType::Geography => "GEOGRAPHY",
            FieldType::Bytes => "BYTES",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::DateTime => "DATETIME",
            FieldType::Date => "DATE",
            FieldType::Time => "TIME",
            FieldType::Interval => "INTERVAL",
            FieldType::Record => "RECORD",
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, FieldType::Record)
    }
}

impl FromStr for FieldType {
    type Err = BigQueryError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "INTEGER" => FieldType::Integer,
            "INT64" => FieldType::Int64,
            "FLOAT" => FieldType::Float,
            "FLOAT64" => FieldType::Float64,
            "NUMERIC" => FieldType::Numeric,
            "BIGNUMERIC" => FieldType::BigNumeric,
            "DECIMAL" => FieldType::Decimal,
            "BIGDECIMAL" => FieldType::BigDecimal,
            "BOOLEAN" => FieldType::Boolean,
            "BOOL" => FieldType::Bool,
            "STRING" => FieldType::String,
            "GEOGRAPHY" => FieldType::Geography,
            "BYTES" => FieldType::Bytes,
            "TIMESTAMP" => FieldType::Timestamp,
            "DATETIME" => FieldType::DateTime,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "INTERVAL" => FieldType::Interval,
            "RECORD" | "STRUCT" => FieldType::Record,
            _ => return Err(BigQueryError::schema(format!("Unknown field type: {}", s))),
        })
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Nullable => "NULLABLE",
            Mode::Required => "REQUIRED",
            Mode::Repeated => "REPEATED",
        }
    }
}

impl FromStr for Mode {
    type Err = BigQueryError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "NULLABLE" => Mode::Nullable,
            "REQUIRED" => Mode::Required,
            "REPEATED" => Mode::Repeated,
            _ => return Err(BigQueryError::schema(format!("Unknown field mode: {}", s))),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Mode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // The API omits or nulls the mode for NULLABLE fields
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Mode::Nullable),
            Some(raw) => raw.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A single column (or nested subfield) of a table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaField {
    pub fn new<S: Into<String>>(name: S, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: Mode::Nullable,
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fields(mut self, fields: Vec<SchemaField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a field from its API mapping representation
    pub fn from_api_repr(resource: &serde_json::Value) -> Result<Self> {
        if !resource.is_object() {
            return Err(BigQueryError::type_mismatch(
                "schema field mapping",
                json_type_name(resource),
            ));
        }
        SchemaField::deserialize(resource).map_err(BigQueryError::from)
    }

    /// Render the field in its API mapping representation
    pub fn to_api_repr(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(BigQueryError::from)
    }

    pub fn is_nullable(&self) -> bool {
        self.mode == Mode::Nullable
    }

    pub fn is_required(&self) -> bool {
        self.mode == Mode::Required
    }

    pub fn is_repeated(&self) -> bool {
        self.mode == Mode::Repeated
    }
}

/// An ordered list of top-level fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Parse a schema from the `fields` array of an API table resource
    pub fn from_api_repr(resource: &serde_json::Value) -> Result<Self> {
        let items = resource
            .as_array()
            .ok_or_else(|| BigQueryError::type_mismatch("array", json_type_name(resource)))?;
        let fields = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                SchemaField::from_api_repr(item).with_context(|| format!("Schema field {}", i))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Schema { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for creating validated schemas
pub struct SchemaBuilder {
    fields: Vec<SchemaField>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Schema> {
        validate_fields(&self.fields, "")?;
        Ok(Schema {
            fields: self.fields,
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_fields(fields: &[SchemaField], parent: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(BigQueryError::schema(format!(
                "Empty field name under '{}'",
                parent
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(BigQueryError::schema(format!(
                "Duplicate field name: {}",
                field.name
            )));
        }
        match (field.field_type.is_record(), field.fields.is_empty()) {
            (true, true) => {
                return Err(BigQueryError::schema(format!(
                    "RECORD field '{}' has no subfields",
                    field.name
                )))
            }
            (false, false) => {
                return Err(BigQueryError::schema(format!(
                    "{} field '{}' cannot have subfields",
                    field.field_type, field.name
                )))
            }
            _ => {}
        }
        validate_fields(&field.fields, &field.name)?;
    }
    Ok(())
}

/// Create a mapping from field name to its position in the schema
pub fn field_to_index_mapping(fields: &[SchemaField]) -> IndexMap<String, usize> {
    fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name.clone(), i))
        .collect()
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
