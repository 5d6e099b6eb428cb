//! Website scraping pipeline.
//!
//! Normalizes the input URL, fetches the page, cleans the document and runs
//! every extractor over it. Failures never escape: they are recorded on the
//! returned [`ScrapedRecord`] together with whatever was extracted first.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::contacts::{extract_contacts, extract_social_links};
use crate::content::extract_main_content;
use crate::document::parse_clean;
use crate::fetch::{FetchError, HttpFetcher, PageSource};
use crate::metadata::extract_metadata;
use crate::normalize::normalize_input_url;
use crate::products::{InvalidSelector, PageContext, ProductExtractor};
use crate::record::ScrapedRecord;

const UNKNOWN_ERROR: &str = "Unknown scraping error";

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Selector(#[from] InvalidSelector),
}

impl ScrapeError {
    /// Machine-readable failure class
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(err) => err.code(),
            Self::Selector(_) => "PARSE_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(err) => err.is_retryable(),
            Self::Selector(_) => false,
        }
    }

    /// Short user-facing suggestion for recovering from the failure
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Fetch(err) => err.resolution_hint(),
            Self::Selector(_) => "Check extra_product_selectors in the configuration file.",
        }
    }
}

/// Runs the extraction pipeline against a page source.
#[derive(Clone)]
pub struct Scraper {
    source: Arc<dyn PageSource>,
    config: ScraperConfig,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new(ScraperConfig::default())
    }
}

impl Scraper {
    /// Scraper fetching over HTTP
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            source: Arc::new(HttpFetcher::new(&config)),
            config,
        }
    }

    /// Scraper reading pages from `source` instead of the network
    pub fn with_source<S: PageSource + 'static>(source: S, config: ScraperConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    /// Scrape one URL. Never fails; check [`ScrapedRecord::error`].
    pub async fn scrape(&self, raw_url: &str) -> ScrapedRecord {
        let mut record = ScrapedRecord::new();
        match self.run(raw_url, &mut record).await {
            Ok(()) => info!(
                url = record.url.as_deref().unwrap_or_default(),
                products = record.extracted_products.len(),
                "scraping finished"
            ),
            Err(err) => {
                warn!(
                    url = record.url.as_deref().unwrap_or_default(),
                    code = err.code(),
                    error = %err,
                    "scraping failed"
                );
                record_failure(&mut record, &err);
            }
        }
        record
    }

    /// Scrape one URL and serialize the record as pretty-printed JSON.
    pub async fn scrape_json(&self, raw_url: &str) -> String {
        to_json(&self.scrape(raw_url).await, true)
    }

    async fn run(&self, raw_url: &str, record: &mut ScrapedRecord) -> Result<(), ScrapeError> {
        let url = normalize_input_url(raw_url);
        record.url = Some(url.clone());
        info!(url = %url, "scraping website");

        let page = self.source.fetch(&url).await?;
        populate(record, &page.html, &page.final_url, &self.config)
    }
}

/// Extract a record from HTML that is already in hand.
///
/// `raw_url` is normalized like a fetched URL and used both as the record's
/// `url` and as the base for relative links.
pub fn extract_from_html(raw_url: &str, html: &str, config: &ScraperConfig) -> ScrapedRecord {
    let mut record = ScrapedRecord::new();
    let url = normalize_input_url(raw_url);
    record.url = Some(url.clone());

    let result = Url::parse(&url)
        .map_err(|e| {
            ScrapeError::from(FetchError::InvalidUrl {
                url: url.clone(),
                reason: e.to_string(),
            })
        })
        .and_then(|base| populate(&mut record, html, &base, config));
    if let Err(err) = result {
        record_failure(&mut record, &err);
    }
    record
}

/// Fill the record stage by stage; a failing stage leaves earlier fields set.
fn populate(
    record: &mut ScrapedRecord,
    html: &str,
    base: &Url,
    config: &ScraperConfig,
) -> Result<(), ScrapeError> {
    let document = parse_clean(html);

    let metadata = extract_metadata(&document);
    record.title = metadata.title;
    record.description = metadata.description;
    record.keywords = metadata.keywords;
    record.headings = metadata.headings;
    debug!(title = record.title.as_deref(), "metadata extracted");

    record.main_content = extract_main_content(&document);

    let extractor = ProductExtractor::new(&config.extra_product_selectors)?;
    let page_url = record.url.clone().unwrap_or_default();
    record.extracted_products = extractor.extract(
        &document,
        PageContext {
            page_url: &page_url,
            base,
        },
    );

    record.contacts = extract_contacts(&document);
    record.social_links = extract_social_links(&document);
    debug!(
        contacts = record.contacts.is_some(),
        social_links = record.social_links.as_ref().map_or(0, Vec::len),
        "contacts extracted"
    );
    Ok(())
}

fn record_failure(record: &mut ScrapedRecord, err: &ScrapeError) {
    let message = err.to_string();
    record.error = Some(if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    });
    record.error_code = Some(err.code().to_string());
    record.retryable = Some(err.is_retryable());
    record.resolution_hint = Some(err.resolution_hint().to_string());
}

/// Serialize a record; serialization failure still yields a record-shaped document.
pub fn to_json(record: &ScrapedRecord, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    };
    result.unwrap_or_else(|err| {
        serde_json::json!({
            "url": record.url,
            "extractedProducts": [],
            "scrapedAt": record.scraped_at,
            "error": err.to_string(),
        })
        .to_string()
    })
}

/// Scrape `url` over HTTP with default settings and return the JSON record.
pub async fn scrape_website(url: &str) -> String {
    Scraper::default().scrape_json(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticSource;

    #[test]
    fn invalid_selector_keeps_earlier_fields() {
        let config = ScraperConfig {
            extra_product_selectors: vec!["::nope".to_string()],
            ..ScraperConfig::default()
        };
        let record = extract_from_html(
            "a.com",
            "<html><head><title>Kept</title></head><body><main>Body</main></body></html>",
            &config,
        );
        assert_eq!(record.title.as_deref(), Some("Kept"));
        assert_eq!(record.main_content.as_deref(), Some("Body"));
        assert!(record.extracted_products.is_empty());
        assert_eq!(record.contacts, None);
        assert_eq!(record.error_code.as_deref(), Some("PARSE_ERROR"));
        assert_eq!(record.retryable, Some(false));
        assert!(record
            .resolution_hint
            .unwrap()
            .contains("extra_product_selectors"));
        assert!(record.error.unwrap().contains("::nope"));
    }

    #[test]
    fn unparsable_page_url_is_an_error_record() {
        let record = extract_from_html("http://[::1", "<p>x</p>", &ScraperConfig::default());
        assert_eq!(record.url.as_deref(), Some("http://[::1"));
        assert_eq!(record.error_code.as_deref(), Some("INVALID_URL"));
        assert!(record.extracted_products.is_empty());
    }

    #[tokio::test]
    async fn missing_page_sets_error_and_url() {
        let scraper = Scraper::with_source(StaticSource::new(), ScraperConfig::default());
        let record = scraper.scrape(" nowhere.test ").await;
        assert_eq!(record.url.as_deref(), Some("https://nowhere.test"));
        assert!(record.is_error());
        assert_eq!(record.title, None);
        assert_eq!(record.error_code.as_deref(), Some("NOT_FOUND"));
        assert!(record.resolution_hint.is_some());

        let json: serde_json::Value = serde_json::from_str(&to_json(&record, false)).unwrap();
        assert_eq!(json["resolutionHint"], record.resolution_hint.unwrap().as_str());
    }

    #[test]
    fn json_omits_absent_fields() {
        let record = ScrapedRecord::new();
        let json = to_json(&record, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"extractedProducts".to_string()));
        assert!(keys.contains(&"scrapedAt".to_string()));
    }
}
