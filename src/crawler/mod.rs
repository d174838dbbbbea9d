//! Crawler module for web page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - The fetcher boundary and the default HTTP fetcher
//! - HTML parsing and link extraction
//! - The breadth-first crawl engine

mod engine;
mod fetcher;
mod parser;

pub use engine::{Crawl, CrawlOptions, Crawler, Page};
pub use fetcher::{build_http_client, Document, Fetcher, HtmlDocument, HttpFetcher};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::CrawlError;

/// Crawls from a seed URL with a configuration and collects every returned page
///
/// This is the one-shot entry point used when the caller does not need to
/// process pages while the crawl is running.
///
/// # Returns
///
/// * `Ok(Vec<Page>)` - Pages in the order they were returned
/// * `Err(CrawlError)` - The configuration could not be turned into a crawler,
///   or the seed is not an absolute URL
pub async fn crawl(config: &Config, seed: &str) -> Result<Vec<Page<HtmlDocument>>, CrawlError> {
    let mut crawler = Crawler::from_config(config)?;
    let pages = crawler.crawl(seed)?.collect_pages().await;
    Ok(pages)
}
