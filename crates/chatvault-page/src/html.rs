//! `HtmlPage` — a [`Page`] over a rendered-HTML snapshot.
//!
//! Backs two use cases with one implementation: offline export of a saved
//! chat page, and deterministic pipeline tests. Clipboard and scroll have no
//! real counterpart in static HTML, so both are simulated: copy buttons can
//! be scripted to place text on the page clipboard, the clipboard can be
//! blocked to exercise the direct-read fallback, and a lazy-reveal mode
//! grows the visible match set on each scroll-to-top like a virtualized
//! message list.

use std::collections::HashMap;

use parking_lot::Mutex;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::page::{NodeHandle, Page};

struct LazyReveal {
    selector: String,
    revealed: usize,
    step: usize,
}

pub struct HtmlPage {
    doc: Html,
    url: String,
    handles: Mutex<HandleTable>,
    clipboard: Mutex<Option<String>>,
    clipboard_blocked: Mutex<bool>,
    copy_scripts: Mutex<HashMap<NodeHandle, String>>,
    lazy: Mutex<Option<LazyReveal>>,
}

#[derive(Default)]
struct HandleTable {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl HandleTable {
    fn intern(&mut self, id: NodeId) -> NodeHandle {
        if let Some(&i) = self.index.get(&id) {
            return NodeHandle(i);
        }
        let i = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, i);
        NodeHandle(i)
    }

    fn get(&self, handle: NodeHandle) -> Option<NodeId> {
        self.ids.get(handle.0).copied()
    }
}

impl HtmlPage {
    /// Parse an HTML snapshot captured from `url`.
    pub fn parse(html: &str, url: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
            url: url.to_string(),
            handles: Mutex::new(HandleTable::default()),
            clipboard: Mutex::new(None),
            clipboard_blocked: Mutex::new(false),
            copy_scripts: Mutex::new(HashMap::new()),
            lazy: Mutex::new(None),
        }
    }

    fn parse_selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(sel) => Some(sel),
            Err(e) => {
                warn!("Invalid selector {:?}: {}", selector, e);
                None
            }
        }
    }

    fn element(&self, handle: NodeHandle) -> Option<ElementRef<'_>> {
        let id = self.handles.lock().get(handle)?;
        self.doc.tree.get(id).and_then(ElementRef::wrap)
    }

    fn intern(&self, id: NodeId) -> NodeHandle {
        self.handles.lock().intern(id)
    }

    // ---------------------------------------------------------------
    // Simulation hooks
    // ---------------------------------------------------------------

    /// Script a copy button: clicking `node` places `text` on the clipboard.
    pub fn script_copy_text(&self, node: NodeHandle, text: &str) {
        self.copy_scripts.lock().insert(node, text.to_string());
    }

    /// Make all clipboard reads fail, as when permission is denied.
    pub fn block_clipboard(&self) {
        *self.clipboard_blocked.lock() = true;
    }

    /// Preload the clipboard.
    pub fn set_clipboard(&self, text: &str) {
        *self.clipboard.lock() = Some(text.to_string());
    }

    /// Simulate a virtualized list: queries for exactly `selector` return
    /// only the first `initial` matches, and each scroll-to-top reveals
    /// `step` more.
    pub fn reveal_gradually(&self, selector: &str, initial: usize, step: usize) {
        *self.lazy.lock() = Some(LazyReveal {
            selector: selector.to_string(),
            revealed: initial,
            step,
        });
    }
}

impl Page for HtmlPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeHandle> {
        let Some(sel) = Self::parse_selector(selector) else {
            return Vec::new();
        };
        let mut handles: Vec<NodeHandle> = self
            .doc
            .select(&sel)
            .map(|el| self.intern(el.id()))
            .collect();
        if let Some(lazy) = self.lazy.lock().as_ref() {
            if lazy.selector == selector {
                handles.truncate(lazy.revealed);
            }
        }
        handles
    }

    fn query_within(&self, node: NodeHandle, selector: &str) -> Vec<NodeHandle> {
        let Some(sel) = Self::parse_selector(selector) else {
            return Vec::new();
        };
        let Some(el) = self.element(node) else {
            return Vec::new();
        };
        el.select(&sel).map(|el| self.intern(el.id())).collect()
    }

    fn matches(&self, node: NodeHandle, selector: &str) -> bool {
        let Some(sel) = Self::parse_selector(selector) else {
            return false;
        };
        self.element(node).is_some_and(|el| sel.matches(&el))
    }

    fn tag_name(&self, node: NodeHandle) -> Option<String> {
        self.element(node)
            .map(|el| el.value().name().to_ascii_lowercase())
    }

    fn attr(&self, node: NodeHandle, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    }

    fn text(&self, node: NodeHandle) -> Option<String> {
        let el = self.element(node)?;
        let text = el.text().collect::<String>();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn click(&self, node: NodeHandle) -> bool {
        if self.element(node).is_none() {
            return false;
        }
        if let Some(payload) = self.copy_scripts.lock().get(&node) {
            *self.clipboard.lock() = Some(payload.clone());
        }
        true
    }

    fn read_clipboard(&self) -> Option<String> {
        if *self.clipboard_blocked.lock() {
            return None;
        }
        self.clipboard.lock().clone().filter(|s| !s.is_empty())
    }

    fn scroll_to_top(&self, _node: NodeHandle) {
        if let Some(lazy) = self.lazy.lock().as_mut() {
            lazy.revealed = lazy.revealed.saturating_add(lazy.step);
        }
    }

    fn scroll_to_bottom(&self, _node: NodeHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{first_match, first_within};

    const FIXTURE: &str = r#"
        <html><body>
          <main>
            <article data-testid="conversation-turn-1" data-message-author-role="user">
              <div class="markdown">What is Rust?</div>
              <button aria-label="Copy">copy</button>
            </article>
            <article data-testid="conversation-turn-2" data-message-author-role="assistant">
              <div class="markdown">A systems programming language.</div>
            </article>
          </main>
        </body></html>
    "#;

    #[test]
    fn test_query_all_document_order() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let turns = page.query_all("article[data-testid^=\"conversation-turn-\"]");
        assert_eq!(turns.len(), 2);
        assert_eq!(
            page.attr(turns[0], "data-message-author-role").as_deref(),
            Some("user")
        );
        assert_eq!(
            page.attr(turns[1], "data-message-author-role").as_deref(),
            Some("assistant")
        );
    }

    #[test]
    fn test_text_is_trimmed() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let turns = page.query_all("[data-message-author-role]");
        let md = page.query_within(turns[0], ".markdown");
        assert_eq!(page.text(md[0]).as_deref(), Some("What is Rust?"));
    }

    #[test]
    fn test_matches_and_tag_name() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let turns = page.query_all("article");
        assert!(page.matches(turns[0], "[data-message-author-role=\"user\"]"));
        assert!(!page.matches(turns[0], "[data-message-author-role=\"assistant\"]"));
        assert_eq!(page.tag_name(turns[0]).as_deref(), Some("article"));
    }

    #[test]
    fn test_invalid_selector_is_soft() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        assert!(page.query_all("[[[").is_empty());
    }

    #[test]
    fn test_scripted_copy_button() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let button = first_match(&page, &["button[aria-label=\"Copy\"]"]).unwrap();
        page.script_copy_text(button, "copied text");

        assert_eq!(page.read_clipboard(), None);
        assert!(page.click(button));
        assert_eq!(page.read_clipboard().as_deref(), Some("copied text"));
    }

    #[test]
    fn test_blocked_clipboard() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        page.set_clipboard("something");
        page.block_clipboard();
        assert_eq!(page.read_clipboard(), None);
    }

    #[test]
    fn test_lazy_reveal_grows_on_scroll() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let sel = "article[data-testid^=\"conversation-turn-\"]";
        page.reveal_gradually(sel, 1, 1);

        let main = first_match(&page, &["main"]).unwrap();
        assert_eq!(page.query_all(sel).len(), 1);
        page.scroll_to_top(main);
        assert_eq!(page.query_all(sel).len(), 2);
        // Other selectors are unaffected.
        assert_eq!(page.query_all("article").len(), 2);
    }

    #[test]
    fn test_first_within_cascade() {
        let page = HtmlPage::parse(FIXTURE, "https://chatgpt.com/c/abc");
        let turns = page.query_all("article");
        let hit = first_within(&page, turns[0], &["[class*=\"prose\"]", ".markdown"]);
        assert!(hit.is_some());
        assert_eq!(page.text(hit.unwrap()).as_deref(), Some("What is Rust?"));
    }
}
