//! DeepSeek (chat.deepseek.com) extractor.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{positional_fallback, PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct DeepSeekExtractor;

impl PlatformExtractor for DeepSeekExtractor {
    fn platform(&self) -> Platform {
        Platform::DeepSeek
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &["[class*=\"chat-container\"]", "#chat-container", "main"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let messages = page.query_all("[class*=\"message-item\"], [class*=\"chat-message\"]");
        if !messages.is_empty() {
            return messages;
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

        let class = page.attr(container, "class").unwrap_or_default();
        if class.contains("user") {
            return RoleDecision {
                role: Role::User,
                confidence: 0.8,
                source: RoleSource::Heuristic,
            };
        }
        if class.contains("assistant") || class.contains("bot") {
            return RoleDecision {
                role: Role::Assistant,
                confidence: 0.8,
                source: RoleSource::Heuristic,
            };
        }

        positional_fallback(index)
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &["button[aria-label=\"Copy\"]", "button[class*=\"copy\"]"]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(
            page,
            container,
            &["[class*=\"markdown\"]", "[class*=\"prose\"]"],
        ) {
            return page.text(node);
        }
        page.text(container)
    }
}
