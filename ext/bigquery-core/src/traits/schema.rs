use crate::error::{ErrorContext, Result};
use crate::schema::{Schema, SchemaField};

/// Trait for schema introspection
///
/// This trait provides methods for examining and querying schemas
/// without modifying them.
pub trait SchemaInspector {
    /// Get the total number of fields (including nested)
    fn field_count(&self) -> usize;

    /// Get field by path (e.g., "address.city")
    fn get_field_by_path(&self, path: &str) -> Option<&SchemaField>;

    /// Check if schema contains a specific field
    fn has_field(&self, name: &str) -> bool {
        self.get_field_by_path(name).is_some()
    }

    /// Get all field paths in the schema
    fn all_field_paths(&self) -> Vec<String>;
}

impl SchemaInspector for [SchemaField] {
    fn field_count(&self) -> usize {
        self.iter().map(count_fields).sum()
    }

    fn get_field_by_path(&self, path: &str) -> Option<&SchemaField> {
        let parts: Vec<&str> = path.split('.').collect();
        get_field_by_path_parts(self, &parts)
    }

    fn all_field_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for field in self {
            collect_field_paths(field, String::new(), &mut paths);
        }
        paths
    }
}

impl SchemaInspector for Schema {
    fn field_count(&self) -> usize {
        self.fields.field_count()
    }

    fn get_field_by_path(&self, path: &str) -> Option<&SchemaField> {
        self.fields.get_field_by_path(path)
    }

    fn all_field_paths(&self) -> Vec<String> {
        self.fields.all_field_paths()
    }
}

// Helper functions for schema inspection
fn count_fields(field: &SchemaField) -> usize {
    1 + field.fields.iter().map(count_fields).sum::<usize>()
}

fn get_field_by_path_parts<'a>(
    fields: &'a [SchemaField],
    parts: &[&str],
) -> Option<&'a SchemaField> {
    let (first, rest) = parts.split_first()?;
    let field = fields.iter().find(|f| f.name == *first)?;
    if rest.is_empty() {
        Some(field)
    } else {
        get_field_by_path_parts(&field.fields, rest)
    }
}

fn collect_field_paths(field: &SchemaField, prefix: String, paths: &mut Vec<String>) {
    let current_path = if prefix.is_empty() {
        field.name.clone()
    } else {
        format!("{}.{}", prefix, field.name)
    };

    paths.push(current_path.clone());

    for sub in &field.fields {
        collect_field_paths(sub, current_path.clone(), paths);
    }
}

/// Anything that can be normalized into a [`SchemaField`]: descriptors
/// themselves or their raw API mappings.
pub trait IntoSchemaField {
    fn into_schema_field(self) -> Result<SchemaField>;
}

impl IntoSchemaField for SchemaField {
    fn into_schema_field(self) -> Result<SchemaField> {
        Ok(self)
    }
}

impl IntoSchemaField for &SchemaField {
    fn into_schema_field(self) -> Result<SchemaField> {
        Ok(self.clone())
    }
}

impl IntoSchemaField for serde_json::Value {
    fn into_schema_field(self) -> Result<SchemaField> {
        SchemaField::from_api_repr(&self)
    }
}

impl IntoSchemaField for &serde_json::Value {
    fn into_schema_field(self) -> Result<SchemaField> {
        SchemaField::from_api_repr(self)
    }
}

/// Normalize a sequence of descriptors or raw mappings into descriptors
pub fn to_schema_fields<I>(schema: I) -> Result<Vec<SchemaField>>
where
    I: IntoIterator,
    I::Item: IntoSchemaField,
{
    schema
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            item.into_schema_field()
                .with_context(|| format!("Schema field {}", i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, Mode, SchemaBuilder};
    use serde_json::json;

    #[test]
    fn test_schema_inspector() {
        let schema = SchemaBuilder::new()
            .with_field(SchemaField::new("id", FieldType::Int64).with_mode(Mode::Required))
            .with_field(
                SchemaField::new("address", FieldType::Record)
                    .with_fields(vec![SchemaField::new("city", FieldType::String)]),
            )
            .build()
            .unwrap();

        // Test field count
        assert_eq!(schema.field_count(), 3); // id, address, city

        // Test field lookup
        assert!(schema.has_field("id"));
        assert!(schema.has_field("address"));
        assert!(schema.has_field("address.city"));
        assert!(!schema.has_field("missing"));
        assert!(!schema.has_field("id.city"));

        // Test get field by path
        let city = schema.get_field_by_path("address.city").unwrap();
        assert_eq!(city.name, "city");

        assert_eq!(
            schema.all_field_paths(),
            vec!["id", "address", "address.city"]
        );
    }

    #[test]
    fn test_to_schema_fields_mixed_inputs() {
        let from_mappings = to_schema_fields(vec![
            json!({"name": "a", "type": "STRING"}),
            json!({"name": "b", "type": "INTEGER", "mode": "REQUIRED"}),
        ])
        .unwrap();
        let from_fields = to_schema_fields(&from_mappings).unwrap();

        assert_eq!(from_mappings, from_fields);
        assert_eq!(from_fields[1].mode, Mode::Required);
    }

    #[test]
    fn test_to_schema_fields_reports_position() {
        let err = to_schema_fields(vec![
            json!({"name": "a", "type": "STRING"}),
            json!({"name": "b", "type": "NOT_A_TYPE"}),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("Schema field 1"));
    }
}
