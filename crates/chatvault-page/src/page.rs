//! The injected page-query capability.

/// Opaque handle to one element on a page.
///
/// Handles are only meaningful to the [`Page`] that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) usize);

/// Read-only view of a rendered chat page.
///
/// Everything the extraction pipeline needs from a host page: CSS-selector
/// queries, text/attribute reads, synthetic click dispatch on copy controls,
/// clipboard access, and scroll positioning. All operations are soft —
/// invalid selectors and stale handles yield empty results, and a clipboard
/// read may fail silently (`None`) when permission is missing.
pub trait Page {
    /// Full URL of the page.
    fn url(&self) -> String;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<NodeHandle>;

    /// Descendants of `node` matching `selector`, in document order.
    fn query_within(&self, node: NodeHandle, selector: &str) -> Vec<NodeHandle>;

    /// Whether `node` itself matches `selector`.
    fn matches(&self, node: NodeHandle, selector: &str) -> bool;

    /// Lowercase tag name of `node`.
    fn tag_name(&self, node: NodeHandle) -> Option<String>;

    /// Attribute value of `node`.
    fn attr(&self, node: NodeHandle, name: &str) -> Option<String>;

    /// Trimmed text content of `node` and its descendants.
    fn text(&self, node: NodeHandle) -> Option<String>;

    /// Dispatch a synthetic click on `node`. Returns false if the node is gone.
    fn click(&self, node: NodeHandle) -> bool;

    /// Read the system clipboard; `None` on denial or empty clipboard.
    fn read_clipboard(&self) -> Option<String>;

    /// Reset scroll position of a scrollable container to the top.
    fn scroll_to_top(&self, node: NodeHandle);

    /// Reset scroll position of a scrollable container to the bottom.
    fn scroll_to_bottom(&self, node: NodeHandle);
}

/// First element matching any of `selectors`, trying them in order.
pub fn first_match(page: &dyn Page, selectors: &[&str]) -> Option<NodeHandle> {
    selectors
        .iter()
        .find_map(|sel| page.query_all(sel).into_iter().next())
}

/// First descendant of `node` matching any of `selectors`, trying them in order.
pub fn first_within(page: &dyn Page, node: NodeHandle, selectors: &[&str]) -> Option<NodeHandle> {
    selectors
        .iter()
        .find_map(|sel| page.query_within(node, sel).into_iter().next())
}
