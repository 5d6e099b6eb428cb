//! # TradeWizard scraper
//!
//! Website content extraction for export-readiness assessments.
//!
//! Given a business website URL, the pipeline fetches the page and extracts a
//! structured candidate record for downstream classification:
//!
//! - **Metadata**: title, meta description, keywords and H1-H3 headings
//! - **Main content**: best-guess body text via a selector fallback chain
//! - **Products**: repeating product-like containers with name, price,
//!   currency, image, link and a confidence score
//! - **Contacts**: emails, North American phone numbers and social profiles
//!
//! Failures are data: [`Scraper::scrape`] always returns a [`ScrapedRecord`],
//! with `error` set when the run could not complete.
//!
//! ```rust,no_run
//! # async fn run() {
//! let json = tradewizard_scraper::scrape_website("example.com").await;
//! println!("{json}");
//! # }
//! ```

pub mod config;
pub mod contacts;
pub mod content;
pub mod document;
pub mod fetch;
pub mod metadata;
pub mod normalize;
pub mod patterns;
pub mod products;
pub mod record;
pub mod scraper;

pub use config::{Config, ScraperConfig};
pub use fetch::{FetchError, FetchedPage, HttpFetcher, PageSource, StaticSource};
pub use normalize::normalize_input_url;
pub use record::{Contacts, Currency, ProductCandidate, ScrapedRecord, SocialLink};
pub use crate::scraper::{extract_from_html, scrape_website, to_json, ScrapeError, Scraper};
