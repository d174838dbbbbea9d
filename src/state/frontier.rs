//! Frontier and bookkeeping for a single crawl run
//!
//! This module tracks:
//! - The FIFO queue of discovered-but-not-yet-fetched URLs
//! - URLs that were fetched successfully (crawled)
//! - URLs permanently excluded from the run (rejected)
//! - URLs handed to the consumer (returned)
//! - URLs whose fetch failed (diagnostics only)
//!
//! A URL string is in at most one of queued, crawled and rejected at any time.

use crate::url::Url;
use std::collections::{HashSet, VecDeque};

/// An insertion-ordered set of URL strings
#[derive(Debug, Clone, Default)]
struct UrlSet {
    order: Vec<String>,
    index: HashSet<String>,
}

impl UrlSet {
    fn insert(&mut self, url: &str) -> bool {
        if self.index.insert(url.to_string()) {
            self.order.push(url.to_string());
            true
        } else {
            false
        }
    }

    fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    fn as_slice(&self) -> &[String] {
        &self.order
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// Frontier queue plus the crawled/rejected/returned sets of one run
///
/// Owned by exactly one crawl engine and reset at the start of every crawl.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// Scope anchor for the run
    base_url: Option<Url>,

    /// FIFO queue in discovery order
    queue: VecDeque<Url>,

    /// Keys of `queue`, for O(1) membership
    queued: HashSet<String>,

    crawled: UrlSet,
    rejected: UrlSet,
    returned: UrlSet,
    failed: UrlSet,
}

impl Frontier {
    /// Creates an empty frontier with no base URL
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every collection and seeds the queue with the base URL
    pub fn reset(&mut self, base_url: Url) {
        *self = Self::default();
        self.enqueue(base_url.clone());
        self.base_url = Some(base_url);
    }

    /// Returns the scope anchor of the current run
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Appends a URL to the back of the queue
    ///
    /// Returns false without touching the queue if the URL string is
    /// already queued.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the URL at the front of the queue
    pub fn dequeue(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    /// Records a successful fetch
    pub fn mark_crawled(&mut self, url: &Url) {
        self.crawled.insert(url.as_str());
    }

    /// Records a URL string as permanently excluded from this run
    pub fn mark_rejected(&mut self, url: &str) {
        self.rejected.insert(url);
    }

    /// Records a page handed to the consumer
    pub fn mark_returned(&mut self, url: &Url) {
        self.returned.insert(url.as_str());
    }

    /// Records a failed fetch
    ///
    /// This does not exclude the URL: a later page linking to it queues it again.
    pub fn mark_failed(&mut self, url: &Url) {
        self.failed.insert(url.as_str());
    }

    /// Returns true if the URL string is waiting in the queue
    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Returns true if the URL string was fetched successfully
    pub fn is_crawled(&self, url: &str) -> bool {
        self.crawled.contains(url)
    }

    /// Returns true if the URL string was rejected
    pub fn is_rejected(&self, url: &str) -> bool {
        self.rejected.contains(url)
    }

    /// Decides whether a discovered URL should be queued
    ///
    /// The URL must not be rejected, crawled or queued already, and must be
    /// part of the base URL. Failing the last check rejects the URL for the
    /// remainder of the run; the other checks never mutate anything.
    pub fn should_crawl(&mut self, url: &Url) -> bool {
        let url_str = url.as_str();
        if self.is_rejected(url_str) || self.is_crawled(url_str) || self.is_queued(url_str) {
            return false;
        }

        if !self.is_part_of_base_url(url) {
            self.mark_rejected(url_str);
            return false;
        }

        true
    }

    /// Scope check: the URL string must contain the base URL string
    ///
    /// This is a plain substring test, not an origin comparison.
    /// Always false when no run has been seeded.
    pub fn is_part_of_base_url(&self, url: &Url) -> bool {
        match &self.base_url {
            Some(base) => {
                tracing::debug!(base = %base, url = %url, "Checking scope");
                url.as_str().contains(base.as_str())
            }
            None => false,
        }
    }

    /// Snapshot of the queue in FIFO order
    pub fn queued(&self) -> Vec<String> {
        self.queue.iter().map(|url| url.to_string()).collect()
    }

    /// Crawled URL strings in fetch order
    pub fn crawled(&self) -> &[String] {
        self.crawled.as_slice()
    }

    /// Rejected URL strings in rejection order
    pub fn rejected(&self) -> &[String] {
        self.rejected.as_slice()
    }

    /// Returned URL strings in return order
    pub fn returned(&self) -> &[String] {
        self.returned.as_slice()
    }

    /// URL strings whose fetch failed, in failure order
    pub fn failed(&self) -> &[String] {
        self.failed.as_slice()
    }

    /// Returns the number of URLs in the queue
    pub fn queue_size(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of returned pages
    pub fn returned_count(&self) -> usize {
        self.returned.len()
    }

    pub fn crawled_count(&self) -> usize {
        self.crawled.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
