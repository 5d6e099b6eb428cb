//! HTML loading and noise removal.

use scraper::{ElementRef, Html, Selector};

use crate::patterns;

/// Parse HTML permissively and strip presentation chrome.
///
/// Scripts, styles, embedded media and page furniture (`header`, `footer`,
/// `nav`, `aside`, forms and their controls) are detached with their
/// subtrees before anything else reads the tree.
pub fn parse_clean(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    remove_matching(&mut document, &patterns::NOISE);
    document
}

/// Detach every element matching `selector` along with its subtree.
fn remove_matching(document: &mut Html, selector: &Selector) {
    let ids: Vec<_> = document.select(selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// All descendant text of an element, concatenated without separators.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed descendant text, or `None` when only whitespace remains.
pub fn trimmed_text(element: &ElementRef<'_>) -> Option<String> {
    non_empty(element_text(element).trim())
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
