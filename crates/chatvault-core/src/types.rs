//! Shared conversation types — turns, extraction results, export formats.

use serde::{Deserialize, Serialize};

/// Tool version stamped into exported documents.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Speaker role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// Display label used in rendered output ("User", "Assistant", "System").
    pub fn display_label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Provenance of a role decision.
///
/// `Clipboard` and `Direct` do not affect the role itself; they record the
/// extraction path when a site reports provenance that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSource {
    Structural,
    Heuristic,
    Clipboard,
    Direct,
}

/// How turn content was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Clipboard,
    Direct,
}

/// One conversational message reconstructed from the page.
///
/// Invariant: `content` is non-empty once a turn is accepted, and its length
/// never exceeds the configured per-turn cap (truncation records a warning).
/// `role` and `confidence` are always set together by the same classification
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Certainty of the role assignment, in [0, 1].
    pub confidence: f64,
    pub source: RoleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<ExtractionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Outcome of one extraction run.
///
/// Constructed fresh per invocation and immutable once returned; ownership
/// ends at the serializer boundary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    /// Turns in page order.
    pub turns: Vec<Turn>,
    /// Fatal-per-run problems (nothing extractable).
    pub errors: Vec<String>,
    /// Recoverable anomalies (truncation, timeout, capping).
    pub warnings: Vec<String>,
    /// True when any bounding limit fired or the run failed mid-way.
    pub partial: bool,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// Requested export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Markdown,
    Both,
}

impl ExportFormat {
    pub fn wants_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }

    pub fn wants_markdown(&self) -> bool {
        matches!(self, ExportFormat::Markdown | ExportFormat::Both)
    }
}
