//! Nested-key access on API property mappings.

use serde_json::{Map, Value};
use std::fmt::Display;

use crate::error::{BigQueryError, Result};
use crate::schema::json_type_name;
use crate::traits::ApiResource;

/// Get a nested value; `None` if any key along the path is absent.
///
/// An empty path also yields `None`: the container is a map rather than a
/// [`Value`], so callers wanting the whole container already hold it.
pub fn get_sub_prop<'a>(container: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    let mut sub_val = container.get(*first)?;
    for key in rest {
        sub_val = sub_val.as_object()?.get(*key)?;
    }
    Some(sub_val)
}

/// Get a nested value, falling back to `default`
pub fn get_sub_prop_or<'a>(
    container: &'a Map<String, Value>,
    keys: &[&str],
    default: &'a Value,
) -> &'a Value {
    get_sub_prop(container, keys).unwrap_or(default)
}

/// Set a nested value, creating intermediate mappings as needed
pub fn set_sub_prop(container: &mut Map<String, Value>, keys: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = keys.split_last() else {
        return Err(BigQueryError::conversion("empty property path"));
    };

    let mut sub_val = container;
    for key in parents {
        let entry = sub_val
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let actual = json_type_name(entry);
        sub_val = entry
            .as_object_mut()
            .ok_or_else(|| BigQueryError::type_mismatch(format!("object at '{}'", key), actual))?;
    }
    sub_val.insert(last.to_string(), value);
    Ok(())
}

/// Remove a nested key if present.
///
/// Missing intermediate mappings end the walk without touching the
/// container.
pub fn del_sub_prop(container: &mut Map<String, Value>, keys: &[&str]) {
    let Some((last, parents)) = keys.split_last() else {
        return;
    };

    let mut sub_val = container;
    for key in parents {
        match sub_val.get_mut(*key).and_then(Value::as_object_mut) {
            Some(next) => sub_val = next,
            None => return,
        }
    }
    sub_val.remove(*last);
}

/// Deserialize an integer that may arrive as a JSON number or a string
pub fn int_or_none(value: &Value) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| BigQueryError::conversion(format!("{} is not an integer", n))),
        Value::String(s) => Ok(Some(s.trim().parse()?)),
        other => Err(BigQueryError::type_mismatch("integer", json_type_name(other))),
    }
}

/// Serialize an optional value to its string form
pub fn str_or_none<T: Display>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

/// Build a partial API resource containing only `filter_fields`.
///
/// Names with a declared API field copy that field (null when unset). Other
/// names are copied verbatim when present in the properties.
pub fn build_resource_from_properties<R: ApiResource + ?Sized>(
    resource: &R,
    filter_fields: &[&str],
) -> Result<Map<String, Value>> {
    let properties = resource.properties();
    let mut partial = Map::new();
    for filter_field in filter_fields {
        match resource.api_field(filter_field) {
            Some(api_field) => {
                let value = properties.get(api_field).cloned().unwrap_or(Value::Null);
                partial.insert(api_field.to_string(), value);
            }
            None => {
                let value = properties
                    .get(*filter_field)
                    .ok_or_else(|| BigQueryError::missing_property(*filter_field))?;
                partial.insert(filter_field.to_string(), value.clone());
            }
        }
    }
    Ok(partial)
}
