//! The generic extraction algorithm, shared across all site extractors.
//!
//! Scroll to load the full history, enumerate turn containers, then walk
//! them in page order acquiring content clipboard-first. Every bound is
//! advisory: hitting one marks the run partial and the caller still gets
//! whatever was collected. No failure escapes the engine boundary.

use std::time::Instant;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use chatvault_core::{
    Error, ExportFormat, ExtractionLimits, ExtractionMethod, ExtractionResult, RoleSource, Turn,
};
use chatvault_heuristics::classify_role;
use chatvault_page::{first_within, NodeHandle, Page};

use crate::extractor::{PlatformExtractor, RoleDecision};

pub struct ExtractionEngine {
    limits: ExtractionLimits,
}

impl ExtractionEngine {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Run one extraction. The format is informational at this layer; the
    /// same turns feed every serializer.
    pub async fn extract(
        &self,
        page: &dyn Page,
        extractor: &dyn PlatformExtractor,
        format: ExportFormat,
    ) -> ExtractionResult {
        let start = Instant::now();
        debug!(
            "Starting {} extraction (format {:?})",
            extractor.platform(),
            format
        );

        let mut result = ExtractionResult::default();
        if let Err(e) = self.run(page, extractor, start, &mut result).await {
            result.errors.push(format!("Extraction error: {}", e));
            result.partial = true;
        }
        result.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extracted {} turns from {} in {}ms ({} warnings)",
            result.turns.len(),
            extractor.platform(),
            result.duration_ms,
            result.warnings.len()
        );
        result
    }

    async fn run(
        &self,
        page: &dyn Page,
        extractor: &dyn PlatformExtractor,
        start: Instant,
        out: &mut ExtractionResult,
    ) -> Result<(), Error> {
        if let Some(container) = extractor.find_scroll_container(page) {
            self.scroll_to_load_all(page, container, || {
                extractor.find_turn_containers(page).len()
            })
            .await;
        }

        let containers = extractor.find_turn_containers(page);
        if containers.is_empty() {
            out.errors.push("No conversation turns found on page".to_string());
            out.partial = true;
            return Ok(());
        }

        if containers.len() > self.limits.max_turns {
            warn!(
                "Capping {} containers at {}",
                containers.len(),
                self.limits.max_turns
            );
            out.warnings.push(format!(
                "Conversation has {} turns, capping at {}",
                containers.len(),
                self.limits.max_turns
            ));
            out.partial = true;
        }

        let limit = containers.len().min(self.limits.max_turns);
        for (index, &container) in containers[..limit].iter().enumerate() {
            if start.elapsed() > self.limits.time_budget() {
                out.warnings.push(format!(
                    "Extraction timed out after {}ms",
                    self.limits.max_extraction_time_ms
                ));
                out.partial = true;
                break;
            }

            if let Some(mut turn) = self.extract_turn(page, extractor, container, index).await {
                let length = turn.content.chars().count();
                if length > self.limits.max_single_turn_size {
                    out.warnings.push(format!(
                        "Turn {} truncated from {} to {} chars",
                        index + 1,
                        length,
                        self.limits.max_single_turn_size
                    ));
                    turn.content = turn
                        .content
                        .chars()
                        .take(self.limits.max_single_turn_size)
                        .collect();
                }
                out.turns.push(turn);
            }
        }

        Ok(())
    }

    /// Extract one turn, or `None` when no content could be acquired —
    /// such containers are dropped silently.
    async fn extract_turn(
        &self,
        page: &dyn Page,
        extractor: &dyn PlatformExtractor,
        container: NodeHandle,
        index: usize,
    ) -> Option<Turn> {
        let mut decision = extractor.classify_role(page, container, index);

        let mut content: Option<String> = None;
        let mut method = ExtractionMethod::Direct;

        if let Some(button) = first_within(page, container, extractor.copy_button_selectors()) {
            sleep(self.limits.hover_settle()).await;
            if page.click(button) {
                sleep(self.limits.clipboard_read_delay()).await;
                if let Some(text) = page.read_clipboard() {
                    content = Some(text);
                    method = ExtractionMethod::Clipboard;
                }
            }
        }

        if content.is_none() {
            content = extractor.direct_text(page, container);
            method = ExtractionMethod::Direct;
        }

        let content = content?;

        // No structural marker: let the content classifier compete with the
        // positional guess and keep the stronger fallback.
        if decision.source == RoleSource::Heuristic {
            let heuristic = classify_role(&content, index);
            if heuristic.confidence > decision.confidence {
                decision = RoleDecision {
                    role: heuristic.role,
                    confidence: heuristic.confidence,
                    source: RoleSource::Heuristic,
                };
            }
        }

        Some(Turn {
            role: decision.role,
            content,
            confidence: decision.confidence,
            source: decision.source,
            extraction_method: Some(method),
            timestamp: None,
            metadata: None,
        })
    }

    /// Repeatedly scroll to the top until the container count stabilizes,
    /// bounding virtualized lists by the iteration cap. Restores the scroll
    /// position to the bottom afterward.
    async fn scroll_to_load_all(
        &self,
        page: &dyn Page,
        container: NodeHandle,
        count_turns: impl Fn() -> usize,
    ) {
        let mut stable = 0;
        let mut last_count = count_turns();

        for iteration in 0..self.limits.max_scroll_iterations {
            page.scroll_to_top(container);
            sleep(self.limits.scroll_step_delay()).await;

            let current = count_turns();
            if current == last_count {
                stable += 1;
                if stable >= self.limits.scroll_stability_threshold {
                    debug!("Scroll stabilized at {} turns after {} iterations", current, iteration + 1);
                    break;
                }
            } else {
                stable = 0;
                last_count = current;
            }
        }

        page.scroll_to_bottom(container);
        sleep(self.limits.scroll_step_delay()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extractor_for;
    use crate::platform::Platform;
    use chatvault_page::HtmlPage;
    use chatvault_core::Role;

    fn engine() -> ExtractionEngine {
        ExtractionEngine::new(ExtractionLimits::instant())
    }

    fn chatgpt_page(turn_count: usize) -> HtmlPage {
        let mut html = String::from("<main>");
        for i in 1..=turn_count {
            let role = if i % 2 == 1 { "user" } else { "assistant" };
            html.push_str(&format!(
                "<article data-testid=\"conversation-turn-{i}\" data-message-author-role=\"{role}\">\
                 <div class=\"markdown\">Turn {i} content</div></article>"
            ));
        }
        html.push_str("</main>");
        HtmlPage::parse(&html, "https://chatgpt.com/c/test")
    }

    #[tokio::test]
    async fn test_basic_extraction_in_page_order() {
        let page = chatgpt_page(4);
        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert!(result.errors.is_empty());
        assert!(!result.partial);
        assert_eq!(result.turns.len(), 4);
        assert_eq!(result.turns[0].role, Role::User);
        assert_eq!(result.turns[1].role, Role::Assistant);
        assert_eq!(result.turns[0].content, "Turn 1 content");
        assert_eq!(
            result.turns[0].extraction_method,
            Some(ExtractionMethod::Direct)
        );
        assert_eq!(result.turns[0].source, RoleSource::Structural);
    }

    #[tokio::test]
    async fn test_empty_page_is_single_error_partial() {
        let page = HtmlPage::parse("<main></main>", "https://chatgpt.com/c/test");
        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.errors, vec!["No conversation turns found on page"]);
        assert!(result.partial);
        assert!(result.turns.is_empty());
    }

    #[tokio::test]
    async fn test_capping_processes_prefix_only() {
        let page = chatgpt_page(600);
        let extractor = extractor_for(Platform::ChatGpt);
        let mut limits = ExtractionLimits::instant();
        limits.max_turns = 500;
        let result = ExtractionEngine::new(limits)
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 500);
        assert!(result.partial);
        assert_eq!(
            result.warnings,
            vec!["Conversation has 600 turns, capping at 500"]
        );
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_budget_aborts_loop_not_run() {
        let page = chatgpt_page(3);
        let extractor = extractor_for(Platform::ChatGpt);
        let mut limits = ExtractionLimits::instant();
        limits.max_extraction_time_ms = 0;
        let result = ExtractionEngine::new(limits)
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert!(result.partial);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Extraction timed out after 0ms")));
        // The budget was already exhausted before the first turn.
        assert!(result.turns.is_empty());
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn test_clipboard_preferred_over_direct() {
        let html = r#"
            <main>
              <article data-testid="conversation-turn-1" data-message-author-role="user">
                <div class="markdown">visible text</div>
                <button data-testid="copy-turn-action-button">copy</button>
              </article>
            </main>
        "#;
        let page = HtmlPage::parse(html, "https://chatgpt.com/c/test");
        let button = page.query_all("button[data-testid=\"copy-turn-action-button\"]")[0];
        page.script_copy_text(button, "clipboard text");

        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 1);
        assert_eq!(result.turns[0].content, "clipboard text");
        assert_eq!(
            result.turns[0].extraction_method,
            Some(ExtractionMethod::Clipboard)
        );
    }

    #[tokio::test]
    async fn test_blocked_clipboard_falls_back_to_direct() {
        let html = r#"
            <main>
              <article data-testid="conversation-turn-1" data-message-author-role="user">
                <div class="markdown">visible text</div>
                <button aria-label="Copy">copy</button>
              </article>
            </main>
        "#;
        let page = HtmlPage::parse(html, "https://chatgpt.com/c/test");
        page.block_clipboard();

        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 1);
        assert_eq!(result.turns[0].content, "visible text");
        assert_eq!(
            result.turns[0].extraction_method,
            Some(ExtractionMethod::Direct)
        );
        // A failed clipboard read is soft: no errors, no warnings.
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_contentless_turn_dropped_silently() {
        let html = r#"
            <main>
              <article data-testid="conversation-turn-1" data-message-author-role="user">
                <div class="markdown">kept</div>
              </article>
              <article data-testid="conversation-turn-2" data-message-author-role="assistant">
              </article>
            </main>
        "#;
        let page = HtmlPage::parse(html, "https://chatgpt.com/c/test");
        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 1);
        assert_eq!(result.turns[0].content, "kept");
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert!(!result.partial);
    }

    #[tokio::test]
    async fn test_long_turn_truncated_with_warning() {
        let long_text = "a".repeat(150);
        let html = format!(
            "<main><article data-testid=\"conversation-turn-1\" \
             data-message-author-role=\"user\"><div class=\"markdown\">{}</div></article></main>",
            long_text
        );
        let page = HtmlPage::parse(&html, "https://chatgpt.com/c/test");
        let extractor = extractor_for(Platform::ChatGpt);
        let mut limits = ExtractionLimits::instant();
        limits.max_single_turn_size = 100;
        let result = ExtractionEngine::new(limits)
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns[0].content.chars().count(), 100);
        assert_eq!(
            result.warnings,
            vec!["Turn 1 truncated from 150 to 100 chars"]
        );
        // Truncation alone does not mark the run partial.
        assert!(!result.partial);
    }

    #[tokio::test]
    async fn test_lazy_list_fully_revealed_by_scrolling() {
        let page = chatgpt_page(6);
        page.reveal_gradually("article[data-testid^=\"conversation-turn-\"]", 2, 2);

        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 6);
        assert!(!result.partial);
    }

    #[tokio::test]
    async fn test_heuristic_fallback_beats_weak_positional_guess() {
        // Grok markup with no structural markers at all: the positional
        // guess (0.5) should lose to the content classifier.
        let html = r#"<div id="response-1">What is TypeScript?</div>"#;
        let page = HtmlPage::parse(html, "https://grok.com/chat/1");
        let extractor = extractor_for(Platform::Grok);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns.len(), 1);
        let turn = &result.turns[0];
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.source, RoleSource::Heuristic);
        assert!(turn.confidence > 0.5);
        assert!(turn.confidence <= 0.95);
    }

    #[tokio::test]
    async fn test_structural_decision_never_overridden() {
        // Long formatted content would classify as assistant, but the
        // structural marker says user and must win.
        let content = format!("# Heading\n- a\n- b\n- c\n{}", "filler ".repeat(100));
        let html = format!(
            "<main><article data-testid=\"conversation-turn-1\" \
             data-message-author-role=\"user\"><div class=\"markdown\">{}</div></article></main>",
            content
        );
        let page = HtmlPage::parse(&html, "https://chatgpt.com/c/test");
        let extractor = extractor_for(Platform::ChatGpt);
        let result = engine()
            .extract(&page, extractor.as_ref(), ExportFormat::Json)
            .await;

        assert_eq!(result.turns[0].role, Role::User);
        assert_eq!(result.turns[0].confidence, 0.99);
        assert_eq!(result.turns[0].source, RoleSource::Structural);
    }
}
