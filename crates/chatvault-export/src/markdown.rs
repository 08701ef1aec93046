//! Markdown serializer — YAML frontmatter followed by one section per turn.

use chatvault_core::{ExtractionResult, VERSION};
use chatvault_heuristics::check_integrity;
use chrono::{SecondsFormat, Utc};

use crate::schema::SCHEMA_VERSION;

/// Serialize an extraction result to frontmatter-annotated Markdown.
pub fn serialize_to_markdown(result: &ExtractionResult, platform: &str, source_url: &str) -> String {
    let integrity = check_integrity(&result.turns);
    let mut all_warnings = result.warnings.clone();
    all_warnings.extend(integrity.warnings);
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut lines: Vec<String> = vec![
        "---".to_string(),
        format!("source_platform: {}", platform),
        format!("source_url: {}", source_url),
        format!("export_timestamp: {}", now),
        format!("extension_version: {}", VERSION),
        format!("total_turns: {}", result.turns.len()),
        format!("schema_version: \"{}\"", SCHEMA_VERSION),
    ];

    if !all_warnings.is_empty() {
        lines.push("integrity_warnings:".to_string());
        for warning in &all_warnings {
            lines.push(format!("  - \"{}\"", warning));
        }
    }

    lines.push("---".to_string());
    lines.push(String::new());

    for (index, turn) in result.turns.iter().enumerate() {
        lines.push(format!("## Turn {} — {}", index + 1, turn.role.display_label()));
        lines.push(String::new());
        lines.push(turn.content.clone());
        lines.push(String::new());
    }

    lines.join("\n")
}
