//! Per-site extractor capability set and closed dispatch.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{NodeHandle, Page};

use crate::platform::Platform;
use crate::sites;

/// Outcome of structural role classification for one container.
#[derive(Debug, Clone, Copy)]
pub struct RoleDecision {
    pub role: Role,
    /// Structural marker matches land in 0.9–0.99; positional fallbacks in
    /// 0.5–0.8.
    pub confidence: f64,
    pub source: RoleSource,
}

/// Page-scraping primitives for one chat site.
///
/// Implementations are stateless; every query goes through the injected
/// [`Page`] capability. Selector strings are site configuration data, not
/// logic — when a site ships new markup, the cascade changes, the
/// algorithm does not.
pub trait PlatformExtractor {
    fn platform(&self) -> Platform;

    /// The scrollable region containing the conversation, if any.
    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle>;

    /// Ordered turn containers. Tries a prioritized cascade of selectors;
    /// the first non-empty result wins.
    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle>;

    /// Structural role classification for one container.
    fn classify_role(&self, page: &dyn Page, container: NodeHandle, index: usize) -> RoleDecision;

    /// Candidate selectors for a copy-to-clipboard control, in priority order.
    fn copy_button_selectors(&self) -> &'static [&'static str];

    /// Direct DOM text read, used when no copy mechanism exists or it fails.
    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String>;
}

/// Extractor for a detected platform. Closed dispatch over the supported
/// set — no plugin loading.
pub fn extractor_for(platform: Platform) -> Box<dyn PlatformExtractor> {
    match platform {
        Platform::Claude => Box::new(sites::claude::ClaudeExtractor),
        Platform::ChatGpt => Box::new(sites::chatgpt::ChatGptExtractor),
        Platform::Gemini => Box::new(sites::gemini::GeminiExtractor),
        Platform::Grok => Box::new(sites::grok::GrokExtractor),
        Platform::GrokX => Box::new(sites::grok_x::GrokXExtractor),
        Platform::Perplexity => Box::new(sites::perplexity::PerplexityExtractor),
        Platform::DeepSeek => Box::new(sites::deepseek::DeepSeekExtractor),
    }
}

/// Even positions read as user, odd as assistant, at fallback confidence.
pub(crate) fn positional_fallback(index: usize) -> RoleDecision {
    RoleDecision {
        role: if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        },
        confidence: 0.5,
        source: RoleSource::Heuristic,
    }
}

/// Zip two same-role node lists back into conversation order.
pub(crate) fn interleave(first: Vec<NodeHandle>, second: Vec<NodeHandle>) -> Vec<NodeHandle> {
    let mut combined = Vec::with_capacity(first.len() + second.len());
    let max = first.len().max(second.len());
    for i in 0..max {
        if let Some(&node) = first.get(i) {
            combined.push(node);
        }
        if let Some(&node) = second.get(i) {
            combined.push(node);
        }
    }
    combined
}
