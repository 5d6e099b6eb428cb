//! Page metadata: title, description, keywords and headings.

use scraper::Html;

use crate::document::{non_empty, trimmed_text};
use crate::patterns;

/// Metadata pulled from the head and heading elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub headings: Option<Vec<String>>,
}

pub fn extract_metadata(document: &Html) -> PageMetadata {
    PageMetadata {
        title: extract_title(document),
        description: extract_description(document),
        keywords: extract_keywords(document),
        headings: extract_headings(document),
    }
}

/// Text of the first `<title>` element
pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&patterns::TITLE)
        .next()
        .and_then(|el| trimmed_text(&el))
}

pub fn extract_description(document: &Html) -> Option<String> {
    meta_content(document, &patterns::META_DESCRIPTION)
}

/// Comma-separated keywords, trimmed, empty entries dropped
pub fn extract_keywords(document: &Html) -> Option<Vec<String>> {
    let content = meta_content(document, &patterns::META_KEYWORDS)?;
    let keywords: Vec<String> = content
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();
    (!keywords.is_empty()).then_some(keywords)
}

/// H1-H3 text in document order
pub fn extract_headings(document: &Html) -> Option<Vec<String>> {
    let headings: Vec<String> = document
        .select(&patterns::HEADINGS)
        .filter_map(|el| trimmed_text(&el))
        .collect();
    (!headings.is_empty()).then_some(headings)
}

fn meta_content(document: &Html, selector: &scraper::Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|content| non_empty(content.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_head_metadata() {
        let document = Html::parse_document(
            r#"<html><head>
                <title>  Example Co  </title><title>Second</title>
                <meta name="description" content=" We make widgets ">
                <meta name="keywords" content="widgets, export,, , trade ">
            </head><body></body></html>"#,
        );
        let meta = extract_metadata(&document);
        assert_eq!(meta.title.as_deref(), Some("Example Co"));
        assert_eq!(meta.description.as_deref(), Some("We make widgets"));
        assert_eq!(
            meta.keywords,
            Some(vec!["widgets".to_string(), "export".to_string(), "trade".to_string()])
        );
        assert_eq!(meta.headings, None);
    }

    #[test]
    fn empty_values_are_absent() {
        let document = Html::parse_document(
            r#"<html><head><title>   </title>
                <meta name="description" content="">
                <meta name="keywords" content=" , ,">
            </head><body><h1> </h1></body></html>"#,
        );
        assert_eq!(extract_metadata(&document), PageMetadata::default());
    }

    #[test]
    fn headings_follow_document_order() {
        let document = Html::parse_document(
            "<body><h2>Our Products</h2><h1>Welcome</h1><h4>Skipped</h4><div><h3> Contact <em>us</em> </h3></div></body>",
        );
        assert_eq!(
            extract_headings(&document),
            Some(vec![
                "Our Products".to_string(),
                "Welcome".to_string(),
                "Contact us".to_string(),
            ])
        );
    }
}
