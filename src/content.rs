//! Main-content selection.
//!
//! No single selector identifies the primary content region across sites, so
//! candidates are tried in priority order and the first with visible text
//! wins. Pages without any of them fall back to the top-level body blocks.

use scraper::Html;

use crate::document::{collapse_whitespace, element_text, non_empty};
use crate::patterns;

/// Best-guess body text, whitespace-collapsed.
pub fn extract_main_content(document: &Html) -> Option<String> {
    let raw = prioritized_text(document).unwrap_or_else(|| body_sections_text(document));
    non_empty(&collapse_whitespace(&raw))
}

/// Text of the first element matched by the highest-priority selector that has any.
fn prioritized_text(document: &Html) -> Option<String> {
    patterns::MAIN_CONTENT
        .iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| element_text(&element))
        .find(|text| !text.trim().is_empty())
}

/// Direct `div`/`section` children of `body`, separated by blank lines.
fn body_sections_text(document: &Html) -> String {
    document
        .select(&patterns::BODY_SECTIONS)
        .map(|element| element_text(&element) + "\n\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_clean;

    #[test]
    fn main_beats_article() {
        let document = Html::parse_document(
            "<body><article>ARTICLE</article><main>  MAIN \n text </main></body>",
        );
        assert_eq!(extract_main_content(&document).as_deref(), Some("MAIN text"));
    }

    #[test]
    fn falls_through_empty_candidates() {
        let document = Html::parse_document(
            r#"<body><main>   </main><div id="content">ID CONTENT</div><div class="content">CLASS</div></body>"#,
        );
        assert_eq!(extract_main_content(&document).as_deref(), Some("ID CONTENT"));
    }

    #[test]
    fn role_main_is_recognised() {
        let document =
            Html::parse_document(r#"<body><div role="main">ROLE MAIN</div><div class="main">M</div></body>"#);
        assert_eq!(extract_main_content(&document).as_deref(), Some("ROLE MAIN"));
    }

    #[test]
    fn only_first_match_of_a_selector_is_used() {
        let document =
            Html::parse_document("<body><article>FIRST</article><article>SECOND</article></body>");
        assert_eq!(extract_main_content(&document).as_deref(), Some("FIRST"));
    }

    #[test]
    fn falls_back_to_top_level_blocks() {
        let document = Html::parse_document(
            "<body><div>Example Co sells</div><p>loose paragraph</p><section><div>premium widgets</div></section></body>",
        );
        assert_eq!(
            extract_main_content(&document).as_deref(),
            Some("Example Co sells premium widgets")
        );
    }

    #[test]
    fn noise_removed_before_selection() {
        let document = parse_clean("<body><main><nav>Home | Shop</nav><p>Body copy</p></main></body>");
        assert_eq!(extract_main_content(&document).as_deref(), Some("Body copy"));
    }

    #[test]
    fn absent_when_nothing_visible() {
        let document = Html::parse_document("<body><p>orphan text</p></body>");
        assert_eq!(extract_main_content(&document), None);
    }
}
