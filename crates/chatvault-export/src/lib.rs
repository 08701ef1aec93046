//! Serializers — turn extraction results to validated JSON or Markdown.

pub mod json;
pub mod markdown;
pub mod schema;

pub use json::{serialize_to_json, JsonExport};
pub use markdown::serialize_to_markdown;
pub use schema::{ExportData, ExportMetadata, TurnData, SCHEMA_VERSION};
