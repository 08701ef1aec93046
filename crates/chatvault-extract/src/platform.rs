//! Supported chat platforms and URL-based detection.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Supported AI chat sites. A closed set: adding a platform means adding a
/// variant and its extractor, not loading plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Claude,
    #[serde(rename = "chatgpt")]
    ChatGpt,
    Gemini,
    Grok,
    #[serde(rename = "grok-x")]
    GrokX,
    Perplexity,
    DeepSeek,
}

impl Platform {
    pub fn all() -> &'static [Platform] {
        &[
            Self::Claude,
            Self::ChatGpt,
            Self::Gemini,
            Self::Grok,
            Self::GrokX,
            Self::Perplexity,
            Self::DeepSeek,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::ChatGpt => "chatgpt",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
            Self::GrokX => "grok-x",
            Self::Perplexity => "perplexity",
            Self::DeepSeek => "deepseek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::ChatGpt => "ChatGPT",
            Self::Gemini => "Gemini",
            Self::Grok => "Grok",
            Self::GrokX => "Grok (X)",
            Self::Perplexity => "Perplexity",
            Self::DeepSeek => "DeepSeek",
        }
    }

    pub fn domains(&self) -> &'static [&'static str] {
        match self {
            Self::Claude => &["claude.ai"],
            Self::ChatGpt => &["chatgpt.com", "chat.openai.com"],
            Self::Gemini => &["gemini.google.com"],
            Self::Grok => &["grok.com"],
            Self::GrokX => &["x.com"],
            Self::Perplexity => &["perplexity.ai"],
            Self::DeepSeek => &["chat.deepseek.com"],
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == name.to_lowercase())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Map a page URL to a platform.
///
/// Hostname must equal a configured domain or end with `.<domain>`. Grok on
/// X additionally requires the `/i/grok` path, since the rest of x.com is
/// not a chat surface.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let path = parsed.path();

    for platform in Platform::all() {
        for domain in platform.domains() {
            let matches_host = host == *domain || host.ends_with(&format!(".{}", domain));
            if !matches_host {
                continue;
            }
            if *platform == Platform::GrokX && !path.starts_with("/i/grok") {
                continue;
            }
            debug!("Detected platform {} for {}", platform, url);
            return Some(*platform);
        }
    }
    None
}
