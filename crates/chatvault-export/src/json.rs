//! JSON serializer — schema-versioned, validated export documents.

use chatvault_core::{Error, ExtractionResult, Turn, VERSION};
use chatvault_heuristics::check_integrity;
use chrono::{SecondsFormat, Utc};
use tracing::error;

use crate::schema::{self, ExportData, ExportMetadata, TurnData, SCHEMA_VERSION};

/// A validated export document plus its pretty-printed form.
#[derive(Debug, Clone)]
pub struct JsonExport {
    pub data: ExportData,
    pub raw: String,
}

/// Serialize an extraction result to the "2.0" JSON export format.
///
/// Runs the integrity checker and merges its warnings with the run's own;
/// turns with confidence below 0.7 are flagged with a readable reason. The
/// finished document is validated against the export schema — a validation
/// failure is a serializer defect surfaced as [`Error::SchemaViolation`].
pub fn serialize_to_json(
    result: &ExtractionResult,
    platform: &str,
    source_url: &str,
) -> Result<JsonExport, Error> {
    let integrity = check_integrity(&result.turns);

    let conversation: Vec<TurnData> = result
        .turns
        .iter()
        .enumerate()
        .map(|(index, turn)| turn_to_data(turn, index + 1))
        .collect();

    let flagged_turns = conversation
        .iter()
        .filter(|t| t.flagged == Some(true))
        .count();

    let mut integrity_warnings = result.warnings.clone();
    integrity_warnings.extend(integrity.warnings);

    let data = ExportData {
        schema_version: SCHEMA_VERSION.to_string(),
        export_metadata: ExportMetadata {
            source_platform: platform.to_string(),
            source_url: source_url.to_string(),
            export_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            extension_version: VERSION.to_string(),
            total_turns: conversation.len(),
            flagged_turns,
            integrity_warnings,
        },
        conversation,
    };

    let value = serde_json::to_value(&data)?;
    if let Err(e) = schema::validate(&value) {
        error!("Export document failed schema validation: {}", e);
        return Err(e);
    }

    let raw = serde_json::to_string_pretty(&value)?;
    Ok(JsonExport { data, raw })
}

fn turn_to_data(turn: &Turn, turn_number: usize) -> TurnData {
    let flagged = turn.confidence < 0.7;
    TurnData {
        turn: turn_number,
        role: turn.role,
        content: turn.content.clone(),
        classification_confidence: turn.confidence,
        classification_source: turn.source,
        extraction_method: turn.extraction_method,
        timestamp: turn.timestamp.clone(),
        flagged: flagged.then_some(true),
        flag_reason: flagged.then(|| format!("Low confidence: {:.2}", turn.confidence)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatvault_core::{ExtractionMethod, Role, RoleSource};

    fn turn(role: Role, content: &str, confidence: f64) -> Turn {
        Turn {
            role,
            content: content.to_string(),
            confidence,
            source: RoleSource::Structural,
            extraction_method: Some(ExtractionMethod::Direct),
            timestamp: None,
            metadata: None,
        }
    }

    fn result_with(turns: Vec<Turn>) -> ExtractionResult {
        ExtractionResult {
            turns,
            errors: Vec::new(),
            warnings: Vec::new(),
            partial: false,
            duration_ms: 10,
        }
    }

    #[test]
    fn test_serializes_clean_conversation() {
        let result = result_with(vec![
            turn(Role::User, "What is Rust?", 0.95),
            turn(Role::Assistant, "A systems language.", 0.95),
        ]);
        let export = serialize_to_json(&result, "claude", "https://claude.ai/chat/abc").unwrap();

        assert_eq!(export.data.schema_version, "2.0");
        assert_eq!(export.data.export_metadata.total_turns, 2);
        assert_eq!(export.data.export_metadata.flagged_turns, 0);
        assert!(export.data.export_metadata.integrity_warnings.is_empty());
        assert_eq!(export.data.conversation[0].turn, 1);
        assert_eq!(export.data.conversation[1].turn, 2);
    }

    #[test]
    fn test_low_confidence_turns_flagged() {
        let result = result_with(vec![
            turn(Role::User, "Hi", 0.95),
            turn(Role::Assistant, "Hello", 0.55),
        ]);
        let export = serialize_to_json(&result, "grok", "https://grok.com/chat/1").unwrap();

        let flagged = &export.data.conversation[1];
        assert_eq!(flagged.flagged, Some(true));
        assert_eq!(flagged.flag_reason.as_deref(), Some("Low confidence: 0.55"));
        assert_eq!(export.data.export_metadata.flagged_turns, 1);

        let unflagged = &export.data.conversation[0];
        assert_eq!(unflagged.flagged, None);
        assert_eq!(unflagged.flag_reason, None);
    }

    #[test]
    fn test_flagged_count_matches_threshold() {
        let result = result_with(vec![
            turn(Role::User, "a", 0.69),
            turn(Role::Assistant, "b", 0.7),
            turn(Role::User, "c", 0.1),
        ]);
        let export = serialize_to_json(&result, "claude", "https://claude.ai/chat/x").unwrap();
        let below: usize = export
            .data
            .conversation
            .iter()
            .filter(|t| t.classification_confidence < 0.7)
            .count();
        assert_eq!(export.data.export_metadata.flagged_turns, below);
        assert_eq!(export.data.export_metadata.flagged_turns, 2);
    }

    #[test]
    fn test_merges_extraction_and_integrity_warnings() {
        let mut result = result_with(vec![
            turn(Role::Assistant, "starts with assistant", 0.9),
        ]);
        result.warnings.push("Turn 1 truncated from 9 to 5 chars".to_string());

        let export = serialize_to_json(&result, "gemini", "https://gemini.google.com/app/1").unwrap();
        let warnings = &export.data.export_metadata.integrity_warnings;
        assert!(warnings.contains(&"Turn 1 truncated from 9 to 5 chars".to_string()));
        assert!(warnings.contains(&"Conversation does not start with a user turn".to_string()));
    }

    #[test]
    fn test_round_trip_parses_and_revalidates() {
        let result = result_with(vec![
            turn(Role::User, "Q", 0.8),
            turn(Role::Assistant, "A", 0.4),
        ]);
        let export = serialize_to_json(&result, "deepseek", "https://chat.deepseek.com/a/1").unwrap();

        let reparsed: serde_json::Value = serde_json::from_str(&export.raw).unwrap();
        assert!(crate::schema::validate(&reparsed).is_ok());
        let data: ExportData = serde_json::from_str(&export.raw).unwrap();
        assert_eq!(data.conversation.len(), 2);
    }

    #[test]
    fn test_empty_run_serializes_with_invalid_integrity() {
        let result = result_with(Vec::new());
        let export = serialize_to_json(&result, "claude", "https://claude.ai/chat/x").unwrap();
        assert_eq!(export.data.export_metadata.total_turns, 0);
        assert_eq!(
            export.data.export_metadata.integrity_warnings,
            vec!["No turns extracted"]
        );
    }

    #[test]
    fn test_empty_content_is_schema_violation() {
        // The engine never emits empty turns; if one slips through, the
        // validation gate must refuse to ship the document.
        let result = result_with(vec![turn(Role::User, "", 0.9)]);
        let err = serialize_to_json(&result, "claude", "https://claude.ai/chat/x").unwrap_err();
        assert!(matches!(err, Error::SchemaViolation(_)));
    }
}
