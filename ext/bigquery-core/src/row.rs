use indexmap::IndexMap;
use std::ops::Index;
use std::sync::Arc;

use crate::value::BigQueryValue;

/// A decoded table row: positional values plus a shared name→index mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<BigQueryValue>,
    field_to_index: Arc<IndexMap<String, usize>>,
}

impl Row {
    pub fn new(values: Vec<BigQueryValue>, field_to_index: Arc<IndexMap<String, usize>>) -> Self {
        Self {
            values,
            field_to_index,
        }
    }

    /// Values in schema order
    pub fn values(&self) -> &[BigQueryValue] {
        &self.values
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<&BigQueryValue> {
        self.field_to_index
            .get(name)
            .and_then(|&i| self.values.get(i))
    }

    /// Field names in schema order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.field_to_index.keys().map(String::as_str)
    }

    /// (name, value) pairs in schema order
    pub fn items(&self) -> impl Iterator<Item = (&str, &BigQueryValue)> {
        self.field_to_index
            .iter()
            .filter_map(|(name, &i)| self.values.get(i).map(|v| (name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<BigQueryValue> {
        self.values
    }
}

impl Index<usize> for Row {
    type Output = BigQueryValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}
