use serde_json::{Map, Value};

/// A resource whose state lives in an API-shaped property mapping
pub trait ApiResource {
    /// The raw API properties backing the resource
    fn properties(&self) -> &Map<String, Value>;

    /// API field name for a client-side property name, if one is declared
    fn api_field(&self, property: &str) -> Option<&str>;
}
