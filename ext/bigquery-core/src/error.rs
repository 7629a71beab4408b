use thiserror::Error;

use crate::schema::FieldType;

/// Core error type for wire conversions
#[derive(Error, Debug)]
pub enum BigQueryError {
    /// A REQUIRED field arrived as null on the wire
    #[error("Type error: got null for REQUIRED field '{field}' of type {field_type}")]
    NullOnRequired { field: String, field_type: FieldType },

    /// A wire string does not match the expected format or grammar
    #[error("Format error: {0}")]
    Format(String),

    /// Positional record input whose length disagrees with the schema
    #[error("The number of row fields ({values}) does not match schema length ({fields}).")]
    Arity { values: usize, fields: usize },

    /// Strict property lookup on a key that does not exist
    #[error("No property {0}")]
    MissingProperty(String),

    /// A value of the wrong shape was handed to a typed conversion
    #[error("Type error: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Type conversion errors
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// An error annotated with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<BigQueryError>,
    },

    /// Base64 decoding errors
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Temporal parsing and arithmetic errors
    #[error("Temporal error: {0}")]
    Temporal(#[from] jiff::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Number parsing errors
    #[error("Parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// Float parsing errors
    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}

/// Result type alias for wire conversions
pub type Result<T> = std::result::Result<T, BigQueryError>;

impl BigQueryError {
    /// Create a new format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        BigQueryError::Format(msg.into())
    }

    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        BigQueryError::Schema(msg.into())
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        BigQueryError::Conversion(msg.into())
    }

    /// Create a new missing property error
    pub fn missing_property<S: Into<String>>(key: S) -> Self {
        BigQueryError::MissingProperty(key.into())
    }

    /// Create a new type mismatch error
    pub fn type_mismatch<E: Into<String>, A: Into<String>>(expected: E, actual: A) -> Self {
        BigQueryError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<BigQueryError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| BigQueryError::Context {
            context: ctx.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| BigQueryError::Context {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}
