//! Fetcher boundary and the default HTTP fetcher
//!
//! The crawl engine only sees the [`Fetcher`] and [`Document`] traits. This
//! module also provides [`HttpFetcher`], which issues GET requests with
//! reqwest and parses responses into [`HtmlDocument`]s.

use crate::config::HttpConfig;
use crate::crawler::parser::parse_html;
use crate::url::Url;
use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// A fetched document the engine can pull outbound links from
pub trait Document: Send + Sync + 'static {
    /// Absolute hyperlink targets found in the document, in document order
    fn links(&self) -> Vec<String>;
}

/// Performs a single GET for the crawl engine
///
/// Any error is treated the same by the engine: it is logged and then either
/// skipped or, with stop-on-error, ends the crawl.
#[async_trait]
pub trait Fetcher: Send + Sync {
    type Document: Document;

    async fn fetch(&self, url: &Url) -> Result<Self::Document, FetchError>;
}

/// An HTTP response parsed for crawling
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Page body content
    pub body: String,
    /// Page title, for HTML responses that have one
    pub title: Option<String>,
    /// Hyperlinks resolved against `url`; empty for non-HTML responses
    pub links: Vec<String>,
    /// When the response body finished downloading
    pub fetched_at: DateTime<Utc>,
}

impl HtmlDocument {
    /// Builds a document from a response, extracting links when it is HTML
    ///
    /// A missing Content-Type is treated as HTML.
    pub fn new(url: Url, status: u16, content_type: Option<String>, body: String) -> Self {
        let is_html = content_type
            .as_deref()
            .map(|ct| ct.contains("html"))
            .unwrap_or(true);

        let parsed = if is_html {
            parse_html(&body, &url)
        } else {
            Default::default()
        };

        Self {
            url,
            status,
            content_type,
            body,
            title: parsed.title,
            links: parsed.links,
            fetched_at: Utc::now(),
        }
    }
}

impl Document for HtmlDocument {
    fn links(&self) -> Vec<String> {
        self.links.clone()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use scope_crawler::config::HttpConfig;
/// use scope_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Default [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Document = HtmlDocument;

    async fn fetch(&self, url: &Url) -> Result<HtmlDocument, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = Url::from(response.url().clone());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        Ok(HtmlDocument::new(
            final_url,
            status.as_u16(),
            content_type,
            body,
        ))
    }
}

/// Maps a transport error onto a fetch error
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
