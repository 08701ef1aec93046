//! Gemini (gemini.google.com) extractor.
//!
//! Gemini renders turns as custom elements, so the tag name itself is the
//! structural marker.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{interleave, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct GeminiExtractor;

impl PlatformExtractor for GeminiExtractor {
    fn platform(&self) -> Platform {
        Platform::Gemini
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &[".conversation-container", "main"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let combined = interleave(
            page.query_all("user-query"),
            page.query_all("model-response"),
        );
        if !combined.is_empty() {
            return combined;
        }
        page.query_all("div.conversation-container[id]")
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, _index: usize) -> RoleDecision {
        match page.tag_name(container).as_deref() {
            Some("user-query") => {
                return RoleDecision {
                    role: Role::User,
                    confidence: 0.99,
                    source: RoleSource::Structural,
                }
            }
            Some("model-response") => {
                return RoleDecision {
                    role: Role::Assistant,
                    confidence: 0.99,
                    source: RoleSource::Structural,
                }
            }
            _ => {}
        }
        if !page.query_within(container, "user-query").is_empty() {
            return RoleDecision {
                role: Role::User,
                confidence: 0.9,
                source: RoleSource::Structural,
            };
        }
        if !page.query_within(container, "model-response").is_empty() {
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
            "button[aria-label=\"Copy prompt\"]",
            "button[data-test-id=\"copy-button\"]",
            "button[aria-label=\"Copy\"]",
        ]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(
            page,
            container,
            &[".query-text", ".model-response-text", ".markdown-main-panel"],
        ) {
            return page.text(node);
        }
        page.text(container)
    }
}
