//! Test utilities for bigquery-core

#[cfg(test)]
pub mod test {
    use crate::{BigQueryValue, FieldType, Mode, Schema, SchemaBuilder, SchemaField};
    use indexmap::IndexMap;
    use ordered_float::OrderedFloat;
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;

    /// Create a simple schema for testing
    pub fn sample_schema() -> Schema {
        SchemaBuilder::new()
            .with_field(SchemaField::new("id", FieldType::Int64).with_mode(Mode::Required))
            .with_field(SchemaField::new("name", FieldType::String))
            .with_field(SchemaField::new("age", FieldType::Integer))
            .with_field(SchemaField::new("salary", FieldType::Float64))
            .build()
            .unwrap()
    }

    /// Create a complex schema with nested and repeated fields
    pub fn complex_schema() -> Schema {
        SchemaBuilder::new()
            .with_field(SchemaField::new("id", FieldType::Int64).with_mode(Mode::Required))
            .with_field(SchemaField::new("person", FieldType::Record).with_fields(vec![
                SchemaField::new("name", FieldType::String).with_mode(Mode::Required),
                SchemaField::new("age", FieldType::Integer),
            ]))
            .with_field(SchemaField::new("scores", FieldType::Float).with_mode(Mode::Repeated))
            .build()
            .unwrap()
    }

    /// Wrap a wire value in a scalar cell
    pub fn cell(value: JsonValue) -> JsonValue {
        json!({ "v": value })
    }

    /// Wrap cells in a record (or row) envelope
    pub fn record(cells: Vec<JsonValue>) -> JsonValue {
        json!({ "f": cells })
    }

    /// Wire row matching the simple schema
    pub fn sample_wire_row() -> JsonValue {
        record(vec![
            cell(json!("1")),
            cell(json!("Alice")),
            cell(json!("30")),
            cell(json!("75000.0")),
        ])
    }

    /// Create sample row values matching the simple schema
    pub fn sample_values() -> Vec<BigQueryValue> {
        vec![
            BigQueryValue::Integer(1),
            BigQueryValue::String(Arc::from("Alice")),
            BigQueryValue::Integer(30),
            BigQueryValue::Float(OrderedFloat(75000.0)),
        ]
    }

    /// Wire row matching the complex schema
    pub fn complex_wire_row() -> JsonValue {
        record(vec![
            cell(json!("1")),
            cell(record(vec![cell(json!("Bob")), cell(json!("35"))])),
            cell(json!([cell(json!("90.5")), cell(json!("87.25"))])),
        ])
    }

    /// Create complex values matching the complex schema
    pub fn complex_values() -> Vec<BigQueryValue> {
        let mut person = IndexMap::new();
        person.insert(Arc::from("name"), BigQueryValue::String(Arc::from("Bob")));
        person.insert(Arc::from("age"), BigQueryValue::Integer(35));

        vec![
            BigQueryValue::Integer(1),
            BigQueryValue::Record(person),
            BigQueryValue::List(vec![
                BigQueryValue::Float(OrderedFloat(90.5)),
                BigQueryValue::Float(OrderedFloat(87.25)),
            ]),
        ]
    }

    /// Compare two values for equality, handling floating point comparison
    pub fn values_equal(a: &BigQueryValue, b: &BigQueryValue) -> bool {
        match (a, b) {
            (BigQueryValue::Float(OrderedFloat(a)), BigQueryValue::Float(OrderedFloat(b))) => {
                (a.is_nan() && b.is_nan()) || (a - b).abs() < f64::EPSILON || a == b
            }
            (BigQueryValue::List(a), BigQueryValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_equal(a, b))
            }
            (BigQueryValue::Record(a), BigQueryValue::Record(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|v2| values_equal(v, v2)))
            }
            _ => a == b,
        }
    }

    /// Assert that two slices of values are equal
    pub fn assert_values_equal(expected: &[BigQueryValue], actual: &[BigQueryValue]) {
        assert_eq!(
            expected.len(),
            actual.len(),
            "Value vectors have different lengths: expected {}, got {}",
            expected.len(),
            actual.len()
        );

        for (i, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
            assert!(
                values_equal(e, a),
                "Values at index {} are not equal:\nExpected: {:?}\nActual: {:?}",
                i,
                e,
                a
            );
        }
    }
}

#[cfg(test)]
mod test_utils_tests {
    use super::test::*;
    use crate::decode::row_tuple_from_json;

    #[test]
    fn test_sample_schema() {
        let schema = sample_schema();
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "age", "salary"]);
    }

    #[test]
    fn test_sample_fixtures_agree() {
        let decoded = row_tuple_from_json(&sample_wire_row(), &sample_schema().fields).unwrap();
        assert_values_equal(&sample_values(), &decoded);

        let decoded = row_tuple_from_json(&complex_wire_row(), &complex_schema().fields).unwrap();
        assert_values_equal(&complex_values(), &decoded);
    }

    #[test]
    fn test_values_equal() {
        use crate::BigQueryValue;

        assert!(values_equal(&BigQueryValue::Integer(42), &BigQueryValue::Integer(42)));
        assert!(values_equal(
            &BigQueryValue::float(f64::NAN),
            &BigQueryValue::float(f64::NAN)
        ));
        assert!(!values_equal(&BigQueryValue::Integer(42), &BigQueryValue::Integer(43)));
    }
}
