//! Exporter — wires detector, engine, integrity and serializers together.

use chatvault_core::{Error, ExportFormat, ExtractionLimits, Result};
use chatvault_export::{serialize_to_json, serialize_to_markdown};
use chatvault_extract::{detect_platform, extractor_for, ExtractionEngine};
use chatvault_page::Page;
use chatvault_protocol::{DetectResponse, ExtractResponse, SaveRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

/// Top-level facade exposing the host-facing operations: `detect`,
/// `extract`, and save-payload assembly.
pub struct Exporter {
    limits: ExtractionLimits,
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            limits: ExtractionLimits::default(),
        }
    }

    pub fn with_limits(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    /// Identify the platform behind a page, or `None` when unsupported.
    pub fn detect(&self, page: &dyn Page) -> Option<DetectResponse> {
        detect_platform(&page.url()).map(|platform| DetectResponse {
            platform: platform.name().to_string(),
            supported: true,
        })
    }

    /// Run one extraction and serialize into the requested format(s).
    ///
    /// Extraction itself never fails — a degraded run comes back with
    /// errors/warnings inside the response. The only error path out of here
    /// is a serializer defect (schema violation).
    pub async fn extract(&self, page: &dyn Page, format: ExportFormat) -> Result<ExtractResponse> {
        let url = page.url();
        let platform = detect_platform(&url)
            .ok_or_else(|| Error::UnsupportedPage(format!("no supported chat site at {}", url)))?;

        let extractor = extractor_for(platform);
        let engine = ExtractionEngine::new(self.limits.clone());
        let result = engine.extract(page, extractor.as_ref(), format).await;

        if !result.errors.is_empty() {
            warn!("Extraction finished with errors: {:?}", result.errors);
        }

        let mut json = None;
        let mut markdown = None;
        if format.wants_json() {
            json = Some(serialize_to_json(&result, platform.name(), &url)?.raw);
        }
        if format.wants_markdown() {
            markdown = Some(serialize_to_markdown(&result, platform.name(), &url));
        }

        info!(
            "Export ready: {} turns from {} ({} warnings)",
            result.turns.len(),
            platform,
            result.warnings.len()
        );

        Ok(ExtractResponse {
            success: result.errors.is_empty(),
            json,
            markdown,
            turn_count: result.turns.len(),
            errors: result.errors,
            warnings: result.warnings,
            duration_ms: result.duration_ms,
        })
    }

    /// Build save payloads for a finished response. A run with zero turns
    /// produces no files; warnings travel separately with the response.
    pub fn save_requests(&self, response: &ExtractResponse) -> Vec<SaveRequest> {
        self.save_requests_at(response, Utc::now())
    }

    fn save_requests_at(&self, response: &ExtractResponse, now: DateTime<Utc>) -> Vec<SaveRequest> {
        if response.turn_count == 0 {
            return Vec::new();
        }

        let timestamp = file_timestamp(now);
        let mut requests = Vec::new();
        if let Some(json) = &response.json {
            requests.push(SaveRequest {
                content: json.clone(),
                filename: format!("chat-vault-{}.json", timestamp),
                mime_type: "application/json".to_string(),
            });
        }
        if let Some(markdown) = &response.markdown {
            requests.push(SaveRequest {
                content: markdown.clone(),
                filename: format!("chat-vault-{}.md", timestamp),
                mime_type: "text/markdown".to_string(),
            });
        }
        requests
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Filesystem-safe timestamp: ISO instant with `:` and `.` replaced,
/// truncated to second precision (`2026-08-07T12-34-56`).
fn file_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
        .chars()
        .take(19)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_timestamp_shape() {
        let now = DateTime::parse_from_rfc3339("2026-08-07T12:34:56.789Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(file_timestamp(now), "2026-08-07T12-34-56");
    }

    #[test]
    fn test_zero_turn_response_produces_no_files() {
        let exporter = Exporter::new();
        let response = ExtractResponse {
            success: false,
            json: Some("{}".to_string()),
            markdown: None,
            turn_count: 0,
            errors: vec!["No conversation turns found on page".to_string()],
            warnings: Vec::new(),
            duration_ms: 3,
        };
        assert!(exporter.save_requests(&response).is_empty());
    }

    #[test]
    fn test_save_requests_for_both_formats() {
        let exporter = Exporter::new();
        let response = ExtractResponse {
            success: true,
            json: Some("{}".to_string()),
            markdown: Some("---".to_string()),
            turn_count: 2,
            errors: Vec::new(),
            warnings: Vec::new(),
            duration_ms: 3,
        };
        let now = DateTime::parse_from_rfc3339("2026-08-07T09:00:01.000Z")
            .unwrap()
            .with_timezone(&Utc);
        let requests = exporter.save_requests_at(&response, now);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].filename, "chat-vault-2026-08-07T09-00-01.json");
        assert_eq!(requests[0].mime_type, "application/json");
        assert_eq!(requests[1].filename, "chat-vault-2026-08-07T09-00-01.md");
        assert_eq!(requests[1].mime_type, "text/markdown");
    }
}
