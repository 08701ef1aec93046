//! Grok embedded in X (x.com/i/grok) extractor.
//!
//! X's feed markup is noisier than the standalone site: message text is
//! scattered across spans, so the direct read stitches them back together.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{positional_fallback, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct GrokXExtractor;

impl PlatformExtractor for GrokXExtractor {
    fn platform(&self) -> Platform {
        Platform::GrokX
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &["[data-testid=\"grok-conversation\"]", "[role=\"main\"]"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let turns = page.query_all("[data-testid^=\"grok-message-\"]");
        if !turns.is_empty() {
            return turns;
        }
        page.query_all("[class*=\"message\"][class*=\"container\"]")
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, index: usize) -> RoleDecision {
        if let Some(test_id) = page.attr(container, "data-testid") {
            if test_id.contains("user") {
                return RoleDecision {
                    role: Role::User,
                    confidence: 0.9,
                    source: RoleSource::Structural,
                };
            }
            if test_id.contains("grok") {
                return RoleDecision {
                    role: Role::Assistant,
                    confidence: 0.9,
                    source: RoleSource::Structural,
                };
            }
        }

        let has_avatar = first_within(
            page,
            container,
            &["img[alt*=\"avatar\"], img[alt*=\"profile\"]"],
        )
        .is_some();
        if has_avatar {
            return RoleDecision {
                role: Role::User,
                confidence: 0.7,
                source: RoleSource::Heuristic,
            };
        }

        positional_fallback(index)
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &[
            "button[aria-label=\"Copy text\"]",
            "button[aria-label=\"Copy\"]",
            "button[data-testid=\"copy-button\"]",
        ]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        let parts: Vec<String> = page
            .query_within(container, "span")
            .into_iter()
            .filter_map(|span| page.text(span))
            .collect();
        if !parts.is_empty() {
            return Some(parts.join("\n"));
        }
        page.text(container)
    }
}
