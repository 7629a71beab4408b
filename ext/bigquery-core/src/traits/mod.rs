pub mod resource;
pub mod schema;

pub use resource::ApiResource;
pub use schema::{to_schema_fields, IntoSchemaField, SchemaInspector};
