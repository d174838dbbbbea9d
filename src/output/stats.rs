//! Statistics generation from a finished crawl
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the crawler's frontier.

use crate::crawler::{Crawler, Fetcher};
use crate::state::CrawlState;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Seed the run was started from
    pub base_url: Option<String>,

    /// State the run ended in
    pub state: CrawlState,

    /// URLs fetched successfully
    pub crawled: usize,

    /// URLs still waiting in the queue
    pub queued: usize,

    /// URLs refused as out of scope or unparsable
    pub rejected: usize,

    /// Pages handed to the consumer
    pub returned: usize,

    /// URLs whose fetch failed
    pub failed: usize,
}

impl CrawlStatistics {
    /// Takes a snapshot of the crawler's current run
    pub fn from_crawler<F: Fetcher>(crawler: &Crawler<F>) -> Self {
        let frontier = crawler.frontier();
        Self {
            base_url: crawler.base_url().map(|url| url.to_string()),
            state: crawler.state(),
            crawled: frontier.crawled_count(),
            queued: frontier.queue_size(),
            rejected: frontier.rejected_count(),
            returned: frontier.returned_count(),
            failed: frontier.failed_count(),
        }
    }

    /// Share of crawled pages that were returned, in percent
    pub fn return_rate(&self) -> f64 {
        if self.crawled > 0 {
            (self.returned as f64 / self.crawled as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    if let Some(base_url) = &stats.base_url {
        println!("  Seed: {}", base_url);
    }
    println!("  Final state: {}", stats.state);
    println!();

    println!("URLs:");
    println!("  Crawled: {}", stats.crawled);
    println!("  Returned: {}", stats.returned);
    println!("  Rejected: {}", stats.rejected);
    println!("  Failed: {}", stats.failed);
    println!("  Still queued: {}", stats.queued);
    println!();

    println!(
        "Return Rate: {:.1}% ({} / {} crawled pages returned)",
        stats.return_rate(),
        stats.returned,
        stats.crawled
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Document;
    use crate::url::Url;
    use crate::FetchError;
    use async_trait::async_trait;

    struct Links(Vec<String>);

    impl Document for Links {
        fn links(&self) -> Vec<String> {
            self.0.clone()
        }
    }

    struct SiteFetcher;

    #[async_trait]
    impl Fetcher for SiteFetcher {
        type Document = Links;

        async fn fetch(&self, url: &Url) -> Result<Links, FetchError> {
            match url.path() {
                "/" => Ok(Links(vec![
                    "http://site.test/a".to_string(),
                    "http://site.test/missing".to_string(),
                    "http://elsewhere.test/".to_string(),
                ])),
                "/a" => Ok(Links(vec![])),
                _ => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    #[test]
    fn test_statistics_before_first_crawl() {
        let crawler = Crawler::new(SiteFetcher);
        let stats = CrawlStatistics::from_crawler(&crawler);

        assert_eq!(stats.base_url, None);
        assert_eq!(stats.state, CrawlState::Idle);
        assert_eq!(stats.crawled, 0);
        assert_eq!(stats.return_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_statistics_after_crawl() {
        let mut crawler = Crawler::new(SiteFetcher);
        let pages = crawler
            .crawl("http://site.test/")
            .unwrap()
            .collect_pages()
            .await;
        assert_eq!(pages.len(), 2);

        let stats = CrawlStatistics::from_crawler(&crawler);
        assert_eq!(stats.base_url.as_deref(), Some("http://site.test/"));
        assert_eq!(stats.state, CrawlState::Drained);
        assert_eq!(stats.crawled, 2);
        assert_eq!(stats.returned, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.return_rate(), 100.0);
    }
}
