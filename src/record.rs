//! ScrapedRecord - the structured output of one extraction run.

use chrono::{SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured candidate record extracted from a business website.
///
/// Absent fields are omitted from the JSON form. `extracted_products` and
/// `scraped_at` are always present, including on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecord {
    /// Normalized URL the fetch was attempted against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Content of `<meta name="description">`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// H1-H3 text in document order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<Vec<String>>,
    /// Whitespace-collapsed best-guess body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    #[serde(default)]
    pub extracted_products: Vec<ProductCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<Contacts>,
    /// At most one entry per platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
    /// ISO-8601 timestamp taken when the record was created
    pub scraped_at: String,
    /// Set only when the run failed; other fields hold whatever was extracted first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable failure class, e.g. `TIMEOUT` or `NOT_FOUND`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Whether repeating the same scrape might succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    /// Suggested next step for the user when the run failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_hint: Option<String>,
}

impl ScrapedRecord {
    /// Create an empty record stamped with the current time
    pub fn new() -> Self {
        Self {
            url: None,
            title: None,
            description: None,
            keywords: None,
            headings: None,
            main_content: None,
            extracted_products: Vec::new(),
            contacts: None,
            social_links: None,
            scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            error: None,
            error_code: None,
            retryable: None,
            resolution_hint: None,
        }
    }

    /// Check if the run failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl Default for ScrapedRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// A heuristically detected product-like entity on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    /// Per-run identifier; not stable across scrapes
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Heuristic quality signal in `[0, 1]`, not calibrated
    pub confidence_score: f64,
}

/// Currencies recognised from price symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// Match a currency symbol, checked in `$`, `£`, `€` order
    pub fn detect(text: &str) -> Option<Self> {
        if text.contains('$') {
            Some(Self::Usd)
        } else if text.contains('£') {
            Some(Self::Gbp)
        } else if text.contains('€') {
            Some(Self::Eur)
        } else {
            None
        }
    }
}

/// Contact details found on the page, deduplicated in first-seen order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Contacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SocialLink {
    /// Capitalised platform name, e.g. `Facebook` or `Linkedin`
    pub platform: String,
    pub url: String,
}
