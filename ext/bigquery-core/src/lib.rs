//! Wire-format conversion core for a BigQuery client
//!
//! `bigquery-core` converts between the JSON representation the BigQuery REST
//! API uses for typed values and native Rust values, in both directions. Every
//! row fetched from or sent to the service passes through this layer.
//!
//! # Key Components
//!
//! - **Decoder**: wire JSON → [`BigQueryValue`]
//!   - Per-type scalar rules through [`decode::scalar_from_json`]
//!   - Repeated fields and nested records, driven by the schema
//!   - Whole rows through [`decode::rows_from_json`], sharing one name→index map
//!
//! - **Encoder**: [`BigQueryValue`] → JSON-safe values
//!   - Row and query-parameter forms of TIMESTAMP, selected by [`WireContext`]
//!   - Records from named or positional input ([`encode::RecordInput`])
//!   - Unknown record keys passed through as strings
//!
//! - **Schema**: [`SchemaField`] descriptors with API (de)serialization and
//!   introspection through [`traits::SchemaInspector`]
//!
//! - **Utilities**: qualified-id parsing ([`ident`]), nested property access
//!   ([`props`]), companion-library version probes ([`versions`]) and host
//!   configuration ([`config`])
//!
//! # Design Philosophy
//!
//! Conversions are pure functions over explicit arguments. Type dispatch is a
//! `match` over the closed [`FieldType`] enum and every failure is returned to
//! the caller unmodified; a malformed cell fails the whole row it belongs to.

pub mod config;
pub mod context;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ident;
pub mod props;
pub mod row;
pub mod schema;
pub mod temporal;
pub mod traits;
pub mod value;
pub mod versions;

#[cfg(test)]
pub mod test_utils;

pub use context::WireContext;
pub use decode::{
    field_from_json, query_param_from_json, record_from_json, row_from_json,
    row_tuple_from_json, rows_from_json, scalar_from_json,
};
pub use encode::{
    field_to_json, record_to_json, scalar_to_json, single_field_to_json, RecordInput,
};
pub use error::{BigQueryError, ErrorContext, Result};
pub use row::Row;
pub use schema::{FieldType, Mode, Schema, SchemaBuilder, SchemaField};
pub use value::{BigQueryValue, Interval};
