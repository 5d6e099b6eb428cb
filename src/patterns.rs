//! Compiled regex patterns and CSS selectors used by the extractors.
//!
//! Everything here is static data compiled once on first use. The selector
//! strings are kept alongside the compiled forms so they can be tested and
//! combined with user-supplied selectors.

#![allow(clippy::expect_used)]

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

/// Elements removed before any extraction runs.
pub const NOISE_ELEMENTS: &str =
    "script, style, noscript, iframe, svg, header, footer, nav, aside, form, button, input";

/// Main-content selectors, highest priority first.
pub const MAIN_CONTENT_SELECTORS: [&str; 6] = [
    "main",
    "article",
    "[role=\"main\"]",
    "#content",
    ".content",
    ".main",
];

/// Containers that look like a single product.
pub const PRODUCT_SELECTORS: [&str; 6] = [
    ".product",
    ".product-item",
    ".product-card",
    ".item",
    "[data-productid]",
    "[itemtype=\"http://schema.org/Product\"]",
];

pub const PRODUCT_NAME: &str = "h2, h3, h4, .product-title, .product-name, .item-title, .item-name";
pub const PRODUCT_PRICE: &str = ".price, .product-price, .price-amount, .product__price";
pub const PRODUCT_DESCRIPTION: &str = ".description, .product-description, .item-description";

/// Platform domains recognised as social links, in match order.
pub const SOCIAL_DOMAINS: [&str; 6] = [
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "instagram.com",
    "youtube.com",
    "pinterest.com",
];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

lazy_static! {
    pub static ref NOISE: Selector = selector(NOISE_ELEMENTS);
    pub static ref TITLE: Selector = selector("title");
    pub static ref META_DESCRIPTION: Selector = selector("meta[name=\"description\"]");
    pub static ref META_KEYWORDS: Selector = selector("meta[name=\"keywords\"]");
    pub static ref HEADINGS: Selector = selector("h1, h2, h3");
    pub static ref BODY: Selector = selector("body");
    pub static ref BODY_SECTIONS: Selector = selector("body > div, body > section");
    pub static ref MAIN_CONTENT: Vec<Selector> =
        MAIN_CONTENT_SELECTORS.iter().map(|css| selector(css)).collect();

    pub static ref PRODUCTS: Selector = selector(&PRODUCT_SELECTORS.join(", "));
    pub static ref NAME: Selector = selector(PRODUCT_NAME);
    pub static ref PRICE: Selector = selector(PRODUCT_PRICE);
    pub static ref DESCRIPTION: Selector = selector(PRODUCT_DESCRIPTION);
    pub static ref IMAGE: Selector = selector("img");
    pub static ref LINK: Selector = selector("a");
    pub static ref LINK_WITH_HREF: Selector = selector("a[href]");
    pub static ref MAILTO: Selector = selector("a[href^=\"mailto:\"]");

    /// Loose email shape; false positives are tolerated.
    pub static ref EMAIL: Regex =
        Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("EMAIL regex");

    /// North American numbers with optional country code, area code and extension.
    /// International formats are not reliably matched.
    pub static ref PHONE: Regex = Regex::new(concat!(
        r"(?:(?:\+?1\s*(?:[.-]\s*)?)?",
        r"(?:\(\s*([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9])\s*\)|([2-9]1[02-9]|[2-9][02-8]1|[2-9][02-8][02-9]))",
        r"\s*(?:[.-]\s*)?)?",
        r"([2-9]1[02-9]|[2-9][02-9]1|[2-9][02-9]{2})\s*(?:[.-]\s*)?([0-9]{4})",
        r"(?:\s*(?:#|x\.?|ext\.?|extension)\s*([0-9]+))?",
    ))
    .expect("PHONE regex");

    /// Characters stripped when normalizing a matched phone number.
    pub static ref PHONE_PUNCTUATION: Regex = Regex::new(r"[.\-()\s]").expect("PHONE_PUNCTUATION regex");

    /// First run of digits and separators in a price string.
    pub static ref PRICE_NUMBER: Regex = Regex::new(r"[0-9.,]+").expect("PRICE_NUMBER regex");
}

/// Returns true if the text contains a recognised currency symbol.
pub fn has_currency_symbol(text: &str) -> bool {
    text.contains(['$', '£', '€'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_selectors_compile() {
        lazy_static::initialize(&NOISE);
        lazy_static::initialize(&MAIN_CONTENT);
        lazy_static::initialize(&NAME);
        lazy_static::initialize(&PRICE);
        lazy_static::initialize(&DESCRIPTION);
        lazy_static::initialize(&MAILTO);
        lazy_static::initialize(&BODY_SECTIONS);
        lazy_static::initialize(&PRODUCTS);
        assert_eq!(MAIN_CONTENT.len(), MAIN_CONTENT_SELECTORS.len());
    }

    #[test]
    fn email_pattern() {
        let found: Vec<&str> = EMAIL
            .find_iter("write to sales@acme.co.uk or Info@Example.com today")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["sales@acme.co.uk", "Info@Example.com"]);
        assert!(!EMAIL.is_match("no address here @ all"));
    }

    #[test]
    fn phone_pattern() {
        for text in [
            "(555) 234-5678",
            "555.234.5678",
            "+1 555 234 5678",
            "555-234-5678 ext. 12",
        ] {
            assert!(PHONE.is_match(text), "expected a match for {text}");
        }
        assert!(!PHONE.is_match("Order 12345"));
    }

    #[test]
    fn currency_symbols() {
        assert!(has_currency_symbol("$9.99"));
        assert!(has_currency_symbol("9,99 €"));
        assert!(has_currency_symbol("£12"));
        assert!(!has_currency_symbol("12 USD"));
    }
}
