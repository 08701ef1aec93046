//! The export document contract — types and the canonical JSON Schema.
//!
//! The schema document is the bit-exact contract for the "2.0" export
//! format; every serialized document is checked against it before leaving
//! the serializer. A violation here is a defect in the serializer, never a
//! user-facing warning.

use chatvault_core::{Error, ExtractionMethod, Role, RoleSource};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const SCHEMA_VERSION: &str = "2.0";

/// Schema-versioned export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub schema_version: String,
    pub export_metadata: ExportMetadata,
    pub conversation: Vec<TurnData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub source_platform: String,
    pub source_url: String,
    pub export_timestamp: String,
    pub extension_version: String,
    pub total_turns: usize,
    pub flagged_turns: usize,
    pub integrity_warnings: Vec<String>,
}

/// One serialized turn; `turn` numbers are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnData {
    pub turn: usize,
    pub role: Role,
    pub content: String,
    pub classification_confidence: f64,
    pub classification_source: RoleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<ExtractionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
}

fn schema_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["schema_version", "export_metadata", "conversation"],
        "additionalProperties": false,
        "properties": {
            "schema_version": { "const": "2.0" },
            "export_metadata": {
                "type": "object",
                "required": [
                    "source_platform",
                    "source_url",
                    "export_timestamp",
                    "extension_version",
                    "total_turns",
                    "flagged_turns",
                    "integrity_warnings"
                ],
                "additionalProperties": false,
                "properties": {
                    "source_platform": { "type": "string" },
                    "source_url": { "type": "string", "format": "uri" },
                    "export_timestamp": { "type": "string", "format": "date-time" },
                    "extension_version": { "type": "string" },
                    "total_turns": { "type": "integer", "minimum": 0 },
                    "flagged_turns": { "type": "integer", "minimum": 0 },
                    "integrity_warnings": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                }
            },
            "conversation": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": [
                        "turn",
                        "role",
                        "content",
                        "classification_confidence",
                        "classification_source"
                    ],
                    "additionalProperties": false,
                    "properties": {
                        "turn": { "type": "integer", "minimum": 1 },
                        "role": { "enum": ["user", "assistant", "system"] },
                        "content": { "type": "string", "minLength": 1 },
                        "classification_confidence": {
                            "type": "number",
                            "minimum": 0,
                            "maximum": 1
                        },
                        "classification_source": {
                            "enum": ["clipboard", "direct", "heuristic", "structural"]
                        },
                        "extraction_method": { "enum": ["clipboard", "direct"] },
                        "timestamp": { "type": "string" },
                        "flagged": { "type": "boolean" },
                        "flag_reason": { "type": "string" }
                    }
                }
            }
        }
    })
}

static EXPORT_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let document = schema_document();
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .should_validate_formats(true)
        .compile(&document)
        .expect("export schema document is valid")
});

/// Validate a serialized export document against the "2.0" schema.
pub fn validate(document: &Value) -> Result<(), Error> {
    let outcome = EXPORT_SCHEMA.validate(document);
    if let Err(errors) = outcome {
        let details: Vec<String> = errors
            .map(|e| format!("{} (at {})", e, e.instance_path))
            .collect();
        return Err(Error::SchemaViolation(details.join("; ")));
    }
    Ok(())
}
