//! Page fetching.
//!
//! Uses reqwest for the single GET issued per scrape. The [`PageSource`]
//! trait lets the pipeline run against canned HTML in tests.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScraperConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("timeout of {0:?} exceeded")]
    Timeout(Duration),
    #[error("failed to fetch URL: {0}")]
    Network(#[source] reqwest::Error),
    #[error("request failed with status code {}", .0.as_u16())]
    Status(StatusCode),
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("no page registered for {0}")]
    Missing(String),
}

impl FetchError {
    /// Machine-readable failure class
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "INVALID_URL",
            Self::Timeout(_) => "TIMEOUT",
            Self::Client(_) | Self::Network(_) => "NETWORK",
            Self::Status(status) => match status.as_u16() {
                404 | 410 => "NOT_FOUND",
                401 | 403 | 429 => "BLOCKED",
                407 => "AUTH_FAILED",
                _ => "HTTP_STATUS",
            },
            Self::Body(_) => "BODY",
            Self::Missing(_) => "NOT_FOUND",
        }
    }

    /// Whether the same request might succeed later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) | Self::Body(_) => true,
            Self::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::InvalidUrl { .. } | Self::Client(_) | Self::Missing(_) => false,
        }
    }

    /// Short user-facing suggestion for recovering from the failure
    pub fn resolution_hint(&self) -> &'static str {
        match self.code() {
            "INVALID_URL" => "Check that the website address is spelled correctly, e.g. example.com.",
            "TIMEOUT" => "The website took too long to respond. Try again in a few minutes.",
            "NOT_FOUND" => "The page could not be found. Check the address for typos.",
            "BLOCKED" if self.is_retryable() => {
                "The website is limiting requests. Wait a few minutes before trying again."
            }
            "BLOCKED" | "AUTH_FAILED" => {
                "The website refused automated access. Try another page or enter details manually."
            }
            "HTTP_STATUS" if self.is_retryable() => {
                "The website reported a server error. Try again later."
            }
            _ if self.is_retryable() => {
                "Could not reach the website. Check your connection and try again."
            }
            _ => "The website could not be analysed. Enter your details manually.",
        }
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Raw HTML plus the URL it was served from after redirects
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub html: String,
}

/// Something that can turn a URL into page HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Fetches pages over HTTP with a browser-like identity and a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }

    /// Create a configured HTTP client; it lives only for one fetch
    fn create_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(err)
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(&ScraperConfig::default())
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = parse_url(url)?;
        let client = self.create_client().map_err(FetchError::Client)?;

        debug!(url = %parsed, timeout = ?self.timeout, "HTTP fetch starting");
        let response = client.get(parsed).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            self.classify(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "HTTP status not successful");
            return Err(FetchError::Status(status));
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e)
            }
        })?;
        debug!(url = %final_url, bytes = html.len(), "HTTP fetch complete");

        Ok(FetchedPage { final_url, html })
    }
}

/// In-memory page source keyed by parsed URL.
///
/// Pages may declare a different final URL to simulate redirects. Requests
/// go through the same URL parsing as [`HttpFetcher`].
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: HashMap<Url, FetchedPage>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url` with no redirect (builder pattern)
    pub fn with_page(self, url: Url, html: impl Into<String>) -> Self {
        let final_url = url.clone();
        self.with_redirect(url, final_url, html)
    }

    /// Serve `html` for `url` as if redirected to `final_url`
    pub fn with_redirect(mut self, url: Url, final_url: Url, html: impl Into<String>) -> Self {
        self.pages.insert(
            url,
            FetchedPage {
                final_url,
                html: html.into(),
            },
        );
        self
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = parse_url(url)?;
        self.pages
            .get(&parsed)
            .cloned()
            .ok_or_else(|| FetchError::Missing(url.to_string()))
    }
}
