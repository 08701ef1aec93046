//! ChatGPT (chatgpt.com / chat.openai.com) extractor.
//!
//! The `data-message-author-role` attribute is the most reliable structural
//! marker any supported site ships, so matches on it score 0.99.

use chatvault_core::{Role, RoleSource};
use chatvault_page::{first_match, first_within, NodeHandle, Page};

use crate::extractor::{PlatformExtractor, RoleDecision};
use crate::platform::Platform;

pub struct ChatGptExtractor;

impl PlatformExtractor for ChatGptExtractor {
    fn platform(&self) -> Platform {
        Platform::ChatGpt
    }

    fn find_scroll_container(&self, page: &dyn Page) -> Option<NodeHandle> {
        first_match(page, &["[class*=\"react-scroll-to-bottom\"]", "main"])
    }

    fn find_turn_containers(&self, page: &dyn Page) -> Vec<NodeHandle> {
        let articles = page.query_all("article[data-testid^=\"conversation-turn-\"]");
        if !articles.is_empty() {
            return articles;
        }
        page.query_all("[data-message-author-role]")
    }

    fn classify_role(&self, page: &dyn Page, container: NodeHandle, _index: usize) -> RoleDecision {
        match page.attr(container, "data-message-author-role").as_deref() {
            Some("user") => {
                return RoleDecision {
                    role: Role::User,
                    confidence: 0.99,
                    source: RoleSource::Structural,
                }
            }
            Some("assistant") => {
                return RoleDecision {
                    role: Role::Assistant,
                    confidence: 0.99,
                    source: RoleSource::Structural,
                }
            }
            _ => {}
        }

        // Turn ids count from 1, users on odd positions.
        if let Some(turn_id) = page.attr(container, "data-testid") {
            if let Some(num) = turn_id
                .strip_prefix("conversation-turn-")
                .and_then(|n| n.parse::<u64>().ok())
            {
                return RoleDecision {
                    role: if num % 2 == 1 {
                        Role::User
                    } else {
                        Role::Assistant
                    },
                    confidence: 0.8,
                    source: RoleSource::Heuristic,
                };
            }
        }

        RoleDecision {
            role: Role::Assistant,
            confidence: 0.5,
            source: RoleSource::Heuristic,
        }
    }

    fn copy_button_selectors(&self) -> &'static [&'static str] {
        &[
            "button[data-testid=\"copy-turn-action-button\"]",
            "button[aria-label=\"Copy\"]",
        ]
    }

    fn direct_text(&self, page: &dyn Page, container: NodeHandle) -> Option<String> {
        if let Some(node) = first_within(page, container, &[".markdown", "[class*=\"prose\"]"]) {
            return page.text(node);
        }
        page.text(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatvault_page::HtmlPage;

    const FIXTURE: &str = r#"
        <main class="react-scroll-to-bottom--css">
          <article data-testid="conversation-turn-1" data-message-author-role="user">
            <div class="markdown">Show me a quicksort</div>
          </article>
          <article data-testid="conversation-turn-2" data-message-author-role="assistant">
            <div class="markdown">Here you go.</div>
            <button data-testid="copy-turn-action-button">copy</button>
          </article>
        </main>
    "#;

    #[test]
    fn test_author_role_attribute_wins() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/1");
        let extractor = ChatGptExtractor;
        let containers = extractor.find_turn_containers(&page);
        assert_eq!(containers.len(), 2);

        let decision = extractor.classify_role(&page, containers[0], 0);
        assert_eq!(decision.role, Role::User);
        assert_eq!(decision.confidence, 0.99);
        assert_eq!(decision.source, RoleSource::Structural);
    }

    #[test]
    fn test_turn_number_parity_fallback() {
        let html = r#"
            <article data-testid="conversation-turn-3">odd turn</article>
            <article data-testid="conversation-turn-4">even turn</article>
        "#;
        let page = HtmlPage::parse(html, "https://chatgpt.com/c/1");
        let extractor = ChatGptExtractor;
        let containers = page.query_all("article");

        let odd = extractor.classify_role(&page, containers[0], 0);
        assert_eq!(odd.role, Role::User);
        assert_eq!(odd.confidence, 0.8);
        assert_eq!(odd.source, RoleSource::Heuristic);

        let even = extractor.classify_role(&page, containers[1], 1);
        assert_eq!(even.role, Role::Assistant);
    }

    #[test]
    fn test_unmarked_container_defaults_to_assistant() {
        let page = HtmlPage::parse("<div id=\"x\">text</div>", "https://chatgpt.com/c/1");
        let extractor = ChatGptExtractor;
        let node = page.query_all("div")[0];
        let decision = extractor.classify_role(&page, node, 0);
        assert_eq!(decision.role, Role::Assistant);
        assert_eq!(decision.confidence, 0.5);
    }

    #[test]
    fn test_direct_text_prefers_markdown_block() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/1");
        let extractor = ChatGptExtractor;
        let containers = extractor.find_turn_containers(&page);
        assert_eq!(
            extractor.direct_text(&page, containers[0]).as_deref(),
            Some("Show me a quicksort")
        );
    }

    #[test]
    fn test_scroll_container_found() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/1");
        let extractor = ChatGptExtractor;
        assert!(extractor.find_scroll_container(&page).is_some());
    }
}
