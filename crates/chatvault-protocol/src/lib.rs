//! Host-process message types — matching the extension transport surface.
//!
//! The core exposes two request/response operations to its host (`detect`
//! and `extract`) and hands finished documents to an external `save`
//! operation. Single call each, no streaming; wire names are camelCase.

use chatvault_core::ExportFormat;
use serde::{Deserialize, Serialize};

/// Response to a `detect` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub platform: String,
    pub supported: bool,
}

/// An `extract` request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub format: ExportFormat,
}

/// Response to an `extract` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(rename = "turnCount")]
    pub turn_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// A finished document handed to the host's save operation. The core never
/// manages filesystem paths or retries saves itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    pub content: String,
    pub filename: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}
