//! Claude (claude.ai) extractor.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{interleave, positional_fallback, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

const USER_MESSAGE: &str = "[data-testid=\"user-message\"]";
const ASSISTANT_MESSAGE: &str = ".font-claude-message";

pub struct ClaudeExtractor;

impl PlatformExtractor for ClaudeExtractor {
    fn platform(&self) -> Platform {
        Platform::Claude
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(
            page,
            &["[class*=\"ThreadLayout\"]", "[class*=\"conversation\"]", "main"],
        )
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let turns = page.query_all("[data-test-render-count]");
        if !turns.is_empty() {
            return turns;
        }
        // No render-count wrappers: rebuild order from the per-role lists.
        interleave(
            page.query_all(USER_MESSAGE),
            page.query_all(ASSISTANT_MESSAGE),
        )
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, index: usize) -> RoleDecision {
        if page.matches(container, USER_MESSAGE) {
            return RoleDecision {
                role: Role::User,
                confidence: 0.95,
                source: RoleSource::Structural,
            };
        }
        if page.matches(container, ASSISTANT_MESSAGE) {
            return RoleDecision {
                role: Role::Assistant,
                confidence: 0.95,
                source: RoleSource::Structural,
            };
        }
        if !page.query_within(container, USER_MESSAGE).is_empty() {
            return RoleDecision {
                role: Role::User,
                confidence: 0.9,
                source: RoleSource::Structural,
            };
        }
        if !page.query_within(container, ASSISTANT_MESSAGE).is_empty() {
            return RoleDecision {
                role: Role::Assistant,
                confidence: 0.9,
                source: RoleSource::Structural,
            };
        }
        positional_fallback(index)
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &[
            "button[data-testid=\"action-bar-copy\"]",
            "button[aria-label=\"Copy\"]",
        ]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(page, container, &[USER_MESSAGE]) {
            return page.text(node);
        }
        if let Some(node) = first_within(page, container, &[ASSISTANT_MESSAGE]) {
            return page.text(node);
        }
        page.text(container)
    }
}
