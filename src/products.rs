//! Product candidate detection.
//!
//! Scans the cleaned document for repeating product-like containers and pulls
//! name, price, image, link and description out of each. Only candidates with
//! a name and at least one of price, image or link are kept.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::document::{non_empty, trimmed_text};
use crate::normalize::resolve_url;
use crate::patterns;
use crate::record::{Currency, ProductCandidate};

/// Score assigned when no better signal is available.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid product selector '{selector}': {reason}")]
pub struct InvalidSelector {
    pub selector: String,
    pub reason: String,
}

/// Which fields a candidate element yielded, for confidence scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateEvidence {
    pub has_name: bool,
    pub has_price: bool,
    pub has_currency: bool,
    pub has_image: bool,
    pub has_link: bool,
    pub has_description: bool,
}

/// Maps candidate evidence to a score in `[0, 1]`.
pub type ConfidenceFn = fn(&CandidateEvidence) -> f64;

/// Constant score; the evidence is not yet weighed.
pub fn compute_confidence(_evidence: &CandidateEvidence) -> f64 {
    DEFAULT_CONFIDENCE
}

/// URLs a page's candidates are resolved and identified against
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// URL recorded for the page; feeds product ids
    pub page_url: &'a str,
    /// Where relative image and link references resolve from
    pub base: &'a Url,
}

#[derive(Debug, Clone)]
pub struct ProductExtractor {
    containers: Selector,
    confidence: ConfidenceFn,
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self {
            containers: patterns::PRODUCTS.clone(),
            confidence: compute_confidence,
        }
    }
}

impl ProductExtractor {
    /// Built-in containers followed by `extra` site-specific selectors.
    pub fn new(extra: &[String]) -> Result<Self, InvalidSelector> {
        if extra.is_empty() {
            return Ok(Self::default());
        }

        for css in extra {
            Selector::parse(css).map_err(|e| InvalidSelector {
                selector: css.clone(),
                reason: e.to_string(),
            })?;
        }

        let combined = patterns::PRODUCT_SELECTORS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ");
        let containers = Selector::parse(&combined).map_err(|e| InvalidSelector {
            selector: combined.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            containers,
            confidence: compute_confidence,
        })
    }

    /// Replace the confidence scoring function (builder pattern)
    pub fn with_confidence(mut self, confidence: ConfidenceFn) -> Self {
        self.confidence = confidence;
        self
    }

    /// Visit every matching container once, in document order.
    pub fn extract(&self, document: &Html, page: PageContext<'_>) -> Vec<ProductCandidate> {
        let mut products = Vec::new();
        let mut matched = 0;

        for (index, element) in document.select(&self.containers).enumerate() {
            matched += 1;
            if let Some(product) = self.extract_candidate(&element, index, page) {
                products.push(product);
            }
        }

        debug!(matched, kept = products.len(), "product candidates scanned");
        products
    }

    fn extract_candidate(
        &self,
        element: &ElementRef<'_>,
        index: usize,
        page: PageContext<'_>,
    ) -> Option<ProductCandidate> {
        let name = first_text(element, &patterns::NAME);
        let (price, currency) = price_text(element)
            .map(|text| parse_price(&text))
            .unwrap_or((None, None));
        let image_url = image_source(element).and_then(|src| resolve_url(page.base, &src));
        let product_url = link_target(element).and_then(|href| resolve_url(page.base, &href));
        let description = first_text(element, &patterns::DESCRIPTION);

        let name = name?;
        if price.is_none() && image_url.is_none() && product_url.is_none() {
            return None;
        }

        let evidence = CandidateEvidence {
            has_name: true,
            has_price: price.is_some(),
            has_currency: currency.is_some(),
            has_image: image_url.is_some(),
            has_link: product_url.is_some(),
            has_description: description.is_some(),
        };
        let confidence_score = (self.confidence)(&evidence).clamp(0.0, 1.0);

        let id_url = product_url.as_deref().unwrap_or(page.page_url);
        Some(ProductCandidate {
            product_id: product_id(&name, id_url, index),
            name: Some(name),
            category: None,
            price,
            currency,
            image_url,
            product_url,
            description,
            confidence_score,
        })
    }
}

/// Deterministic per-run id from name, URL and ordinal.
///
/// A 32-bit `31 * h + unit` hash over the UTF-16 code units of
/// `name + url_part`, rendered as signed hex. Not collision resistant and not
/// stable across runs if the page order changes.
pub fn product_id(name: &str, url_part: &str, index: usize) -> String {
    let hash = name
        .encode_utf16()
        .chain(url_part.encode_utf16())
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    let hex = if hash < 0 {
        format!("-{:x}", -i64::from(hash))
    } else {
        format!("{hash:x}")
    };
    format!("prod_{hex}_{index}")
}

/// Amount and currency from free-form price text.
///
/// The first run of digits, dots and commas is read with commas dropped and
/// parsed up to the second dot. The currency comes from the first symbol
/// found in `$`, `£`, `€` order.
pub fn parse_price(text: &str) -> (Option<f64>, Option<Currency>) {
    let amount = patterns::PRICE_NUMBER
        .find(text)
        .and_then(|run| leading_float(&run.as_str().replace(',', "")));
    (amount, Currency::detect(text))
}

fn leading_float(run: &str) -> Option<f64> {
    let mut seen_dot = false;
    let end = run
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' {
                let second = seen_dot;
                seen_dot = true;
                second
            } else {
                !c.is_ascii_digit()
            }
        })
        .map_or(run.len(), |(i, _)| i);

    let number = &run[..end];
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|found| trimmed_text(&found))
}

/// Price-class text, else the first descendant text node carrying a currency symbol.
fn price_text(element: &ElementRef<'_>) -> Option<String> {
    first_text(element, &patterns::PRICE).or_else(|| {
        element
            .descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| text.trim())
            .find(|text| patterns::has_currency_symbol(text))
            .map(String::from)
    })
}

/// First `img` descendant's `src`, `data-src` or `data-original`.
fn image_source(element: &ElementRef<'_>) -> Option<String> {
    let img = element.select(&patterns::IMAGE).next()?;
    ["src", "data-src", "data-original"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find_map(|value| non_empty(value.trim()))
}

/// First `a` descendant's `href`, or the container's own when it is a link.
fn link_target(element: &ElementRef<'_>) -> Option<String> {
    element
        .select(&patterns::LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| non_empty(href.trim()))
        .or_else(|| {
            if element.value().name() == "a" {
                element
                    .value()
                    .attr("href")
                    .and_then(|href| non_empty(href.trim()))
            } else {
                None
            }
        })
}
