//! Grok (grok.com) extractor.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{positional_fallback, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct GrokExtractor;

impl PlatformExtractor for GrokExtractor {
    fn platform(&self) -> Platform {
        Platform::Grok
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &["[class*=\"conversation\"]", "main"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let responses = page.query_all("div[id^=\"response-\"]");
        if !responses.is_empty() {
            return responses;
        }
        page.query_all("[data-role=\"user\"], [data-role=\"assistant\"]")
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, index: usize) -> RoleDecision {
        match page.attr(container, "data-role").as_deref() {
            Some("user") => {
                return RoleDecision {
                    role: Role::User,
                    confidence: 0.95,
                    source: RoleSource::Structural,
                }
            }
            Some("assistant") => {
                return RoleDecision {
                    role: Role::Assistant,
                    confidence: 0.95,
                    source: RoleSource::Structural,
                }
            }
            _ => {}
        }

        // An avatar marked "You" separates the user's own turns.
        if let Some(avatar) = first_within(page, container, &["[class*=\"avatar\"]"]) {
            let label = page.text(avatar).unwrap_or_default();
            if label.contains("You") {
                return RoleDecision {
                    role: Role::User,
                    confidence: 0.8,
                    source: RoleSource::Heuristic,
                };
            }
            return RoleDecision {
                role: Role::Assistant,
                confidence: 0.7,
                source: RoleSource::Heuristic,
            };
        }

        positional_fallback(index)
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &["button[aria-label=\"Copy\"]", "button[aria-label=\"Copy text\"]"]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(
            page,
            container,
            &["[class*=\"message-content\"]", "[class*=\"prose\"]"],
        ) {
            return page.text(node);
        }
        page.text(container)
    }
}
