//! Perplexity (perplexity.ai) extractor.
//!
//! Perplexity exposes no data attributes for roles; class-name fragments
//! are the only structural hook.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{interleave, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct PerplexityExtractor;

impl PlatformExtractor for PerplexityExtractor {
    fn platform(&self) -> Platform {
        Platform::Perplexity
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &["[class*=\"ThreadLayout\"]", "main"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        interleave(
            page.query_all("[class*=\"UserQuery\"], [class*=\"query-text\"]"),
            page.query_all(
                "[class*=\"AnswerBlock\"], [class*=\"prose\"], [class*=\"answer-text\"]",
            ),
        )
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, _index: usize) -> RoleDecision {
        let class = page.attr(container, "class").unwrap_or_default();
        if class.contains("UserQuery") || class.contains("query-text") {
            return RoleDecision {
                role: Role::User,
                confidence: 0.9,
                source: RoleSource::Structural,
            };
        }
        if class.contains("AnswerBlock")
            || class.contains("answer-text")
            || class.contains("prose")
        {
            return RoleDecision {
                role: Role::Assistant,
                confidence: 0.9,
                source: RoleSource::Structural,
            };
        }
        RoleDecision {
            role: Role::Assistant,
            confidence: 0.5,
            source: RoleSource::Heuristic,
        }
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &[
            "button[aria-label=\"Copy\"]",
            "button[aria-label=\"Copy Answer\"]",
        ]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(page, container, &["[class*=\"prose\"]"]) {
            return page.text(node);
        }
        page.text(container)
    }
}
