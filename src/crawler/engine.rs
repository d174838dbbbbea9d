//! Crawl engine - breadth-first traversal and result production
//!
//! This module contains the crawl loop that:
//! - Seeds the frontier from the caller's URL
//! - Dequeues one URL per pass and fetches it
//! - Normalizes discovered links and queues the ones in scope
//! - Decides, via the whitelist/blacklist matchers, whether a page is returned
//!
//! Pages are produced lazily: every pull on a [`Crawl`] runs the loop until
//! one page is returned or the run ends, so nothing is fetched while the
//! consumer holds a page.

use crate::config::Config;
use crate::crawler::fetcher::{Document, Fetcher, HttpFetcher};
use crate::state::{CrawlState, Frontier};
use crate::url::{Url, UrlMatcher, UrlNormalizer};
use crate::CrawlError;
use futures::stream::{self, Stream};
use tracing::Instrument;

/// A returned page: the crawled URL and its fetched document
#[derive(Debug, Clone)]
pub struct Page<D> {
    url: Url,
    document: D,
}

impl<D> Page<D> {
    pub fn new(url: Url, document: D) -> Self {
        Self { url, document }
    }

    /// The URL that was dequeued and fetched
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_parts(self) -> (Url, D) {
        (self.url, self.document)
    }
}

/// Construction options for a [`Crawler`]
///
/// All fields are optional: the default is an unbounded crawl that skips
/// failed fetches and returns every crawled page.
#[derive(Default)]
pub struct CrawlOptions {
    /// Maximum number of pages to return, 0 = unbounded
    pub limit: usize,

    /// End the crawl on the first failed fetch instead of skipping it
    pub stop_on_error: bool,

    /// When non-empty, only pages matched by one of these are returned
    pub whitelist_url_matchers: Vec<Box<dyn UrlMatcher>>,

    /// Pages matched by one of these are not returned (ignored when a whitelist is set)
    pub blacklist_url_matchers: Vec<Box<dyn UrlMatcher>>,

    /// Applied in order to every discovered link
    pub url_normalizers: Vec<Box<dyn UrlNormalizer>>,
}

/// Breadth-first crawler confined to the seed URL
///
/// Configuration (limit, stop-on-error, matchers, normalizers, fetcher)
/// persists across calls to [`Crawler::crawl`]; the frontier does not.
pub struct Crawler<F: Fetcher = HttpFetcher> {
    fetcher: F,
    limit: usize,
    stop_on_error: bool,
    whitelist_url_matchers: Vec<Box<dyn UrlMatcher>>,
    blacklist_url_matchers: Vec<Box<dyn UrlMatcher>>,
    url_normalizers: Vec<Box<dyn UrlNormalizer>>,
    frontier: Frontier,
    state: CrawlState,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler with an [`HttpFetcher`] from a loaded configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scope_crawler::config::load_config;
    /// use scope_crawler::Crawler;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = load_config(Path::new("crawler.toml"))?;
    /// let mut crawler = Crawler::from_config(&config)?;
    ///
    /// let mut crawl = crawler.crawl("https://example.com/")?;
    /// while let Some(page) = crawl.next_page().await {
    ///     println!("{}", page.url());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config.http)?;
        let options = CrawlOptions {
            limit: config.crawler.limit,
            stop_on_error: config.crawler.stop_on_error,
            whitelist_url_matchers: config.whitelist_matchers()?,
            blacklist_url_matchers: config.blacklist_matchers()?,
            url_normalizers: config.normalizers(),
        };

        Ok(Self::with_options(fetcher, options))
    }
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler with default options
    pub fn new(fetcher: F) -> Self {
        Self::with_options(fetcher, CrawlOptions::default())
    }

    /// Creates a crawler with explicit options
    pub fn with_options(fetcher: F, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            limit: options.limit,
            stop_on_error: options.stop_on_error,
            whitelist_url_matchers: options.whitelist_url_matchers,
            blacklist_url_matchers: options.blacklist_url_matchers,
            url_normalizers: options.url_normalizers,
            frontier: Frontier::new(),
            state: CrawlState::Idle,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn stop_on_error(&self) -> bool {
        self.stop_on_error
    }

    pub fn set_stop_on_error(&mut self, stop_on_error: bool) -> &mut Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Replaces the whitelist matchers
    pub fn set_whitelist_url_matchers(
        &mut self,
        matchers: Vec<Box<dyn UrlMatcher>>,
    ) -> &mut Self {
        self.whitelist_url_matchers = matchers;
        self
    }

    pub fn add_whitelist_url_matcher(&mut self, matcher: impl UrlMatcher + 'static) -> &mut Self {
        self.whitelist_url_matchers.push(Box::new(matcher));
        self
    }

    pub fn clear_whitelist_url_matchers(&mut self) -> &mut Self {
        self.whitelist_url_matchers.clear();
        self
    }

    /// Replaces the blacklist matchers
    pub fn set_blacklist_url_matchers(
        &mut self,
        matchers: Vec<Box<dyn UrlMatcher>>,
    ) -> &mut Self {
        self.blacklist_url_matchers = matchers;
        self
    }

    pub fn add_blacklist_url_matcher(&mut self, matcher: impl UrlMatcher + 'static) -> &mut Self {
        self.blacklist_url_matchers.push(Box::new(matcher));
        self
    }

    pub fn clear_blacklist_url_matchers(&mut self) -> &mut Self {
        self.blacklist_url_matchers.clear();
        self
    }

    /// Replaces the normalizer chain
    pub fn set_url_normalizers(
        &mut self,
        normalizers: Vec<Box<dyn UrlNormalizer>>,
    ) -> &mut Self {
        self.url_normalizers = normalizers;
        self
    }

    pub fn add_url_normalizer(&mut self, normalizer: impl UrlNormalizer + 'static) -> &mut Self {
        self.url_normalizers.push(Box::new(normalizer));
        self
    }

    pub fn clear_url_normalizers(&mut self) -> &mut Self {
        self.url_normalizers.clear();
        self
    }

    /// Lifecycle state of the current (or last) run
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Read-only view of the bookkeeping of the current (or last) run
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.frontier.base_url()
    }

    pub fn urls_crawled(&self) -> &[String] {
        self.frontier.crawled()
    }

    pub fn urls_queued(&self) -> Vec<String> {
        self.frontier.queued()
    }

    pub fn urls_rejected(&self) -> &[String] {
        self.frontier.rejected()
    }

    pub fn urls_returned(&self) -> &[String] {
        self.frontier.returned()
    }

    pub fn urls_failed(&self) -> &[String] {
        self.frontier.failed()
    }

    /// Starts a fresh crawl from the seed URL
    ///
    /// All bookkeeping from a previous run is discarded. Nothing is fetched
    /// until the returned [`Crawl`] is pulled.
    ///
    /// # Returns
    ///
    /// * `Ok(Crawl)` - A lazy producer of returned pages
    /// * `Err(CrawlError::Url)` - The seed is not an absolute URL
    pub fn crawl(&mut self, seed: &str) -> Result<Crawl<'_, F>, CrawlError> {
        let base_url = Url::parse(seed)?;
        tracing::info!(seed = %base_url, "Starting crawl");

        let span = tracing::info_span!("crawl", seed = %base_url);
        self.frontier.reset(base_url);
        self.state = CrawlState::Seeded;

        Ok(Crawl {
            crawler: self,
            span,
        })
    }

    /// Runs the loop until one page is returned or the run ends
    async fn advance(&mut self) -> Option<Page<F::Document>> {
        if !self.state.is_active() {
            return None;
        }
        self.state = CrawlState::Looping;

        loop {
            if self.is_limit_reached() {
                tracing::info!(limit = self.limit, "Crawl limit reached");
                self.state = CrawlState::LimitReached;
                return None;
            }

            let Some(url) = self.frontier.dequeue() else {
                tracing::info!(
                    crawled = self.frontier.crawled_count(),
                    returned = self.frontier.returned_count(),
                    "Frontier is empty, crawl complete"
                );
                self.state = CrawlState::Drained;
                return None;
            };

            tracing::info!(url = %url, "Crawling page");

            let document = match self.fetcher.fetch(&url).await {
                Ok(document) => {
                    tracing::info!(url = %url, "Crawled page");
                    document
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Error requesting page");
                    self.frontier.mark_failed(&url);

                    if self.stop_on_error {
                        self.state = CrawlState::StoppedOnError;
                        return None;
                    }
                    continue;
                }
            };

            self.frontier.mark_crawled(&url);
            self.update_queue(&document);

            if self.should_return_url(&url) {
                tracing::debug!(url = %url, "Returning url");
                self.frontier.mark_returned(&url);
                return Some(Page::new(url, document));
            }
        }
    }

    /// Routes every link of a fetched document through normalize/dedupe/scope
    fn update_queue(&mut self, document: &F::Document) {
        for link in document.links() {
            if self.frontier.is_rejected(&link) {
                continue;
            }
            tracing::debug!(url = %link, "Found url in page");

            let url = match Url::parse(&link) {
                Ok(url) => self.normalize_url(url),
                Err(e) => {
                    tracing::warn!(url = %link, error = %e, "Url could not be parsed");
                    self.frontier.mark_rejected(&link);
                    continue;
                }
            };

            if self.frontier.should_crawl(&url) {
                self.frontier.enqueue(url);
            }
        }
    }

    /// Folds the normalizer chain over a URL, in configured order
    fn normalize_url(&self, url: Url) -> Url {
        self.url_normalizers
            .iter()
            .fold(url, |url, normalizer| normalizer.normalize(url))
    }

    /// Return policy: a non-empty whitelist decides alone, otherwise the blacklist vetoes
    fn should_return_url(&self, url: &Url) -> bool {
        if !self.whitelist_url_matchers.is_empty() {
            if self.whitelist_url_matchers.iter().any(|m| m.matches(url)) {
                return true;
            }
            tracing::info!(url = %url, "Skipped url: not whitelisted");
            return false;
        }

        if self.blacklist_url_matchers.iter().any(|m| m.matches(url)) {
            tracing::info!(url = %url, "Skipped url: blacklisted");
            return false;
        }

        true
    }

    fn is_limit_reached(&self) -> bool {
        self.limit > 0 && self.frontier.returned_count() >= self.limit
    }
}

/// One crawl run, pulled one page at a time
///
/// Holds the crawler mutably for as long as it lives; drop it to stop the
/// crawl. Each call to [`Crawl::next_page`] fetches until a page is returned
/// or the run ends, and returns `None` from then on.
pub struct Crawl<'a, F: Fetcher> {
    crawler: &'a mut Crawler<F>,
    span: tracing::Span,
}

impl<'a, F: Fetcher> Crawl<'a, F> {
    /// Pulls the next returned page, or `None` once the run has ended
    pub async fn next_page(&mut self) -> Option<Page<F::Document>> {
        let span = self.span.clone();
        self.crawler.advance().instrument(span).await
    }

    /// Lifecycle state of this run
    pub fn state(&self) -> CrawlState {
        self.crawler.state
    }

    /// Bookkeeping of this run so far
    pub fn frontier(&self) -> &Frontier {
        &self.crawler.frontier
    }

    /// Pulls every remaining page
    pub async fn collect_pages(mut self) -> Vec<Page<F::Document>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            pages.push(page);
        }
        pages
    }

    /// Adapts the run into a [`Stream`] of pages
    pub fn into_stream(self) -> impl Stream<Item = Page<F::Document>> + 'a {
        stream::unfold(self, |mut crawl| async move {
            crawl.next_page().await.map(|page| (page, crawl))
        })
    }
}
