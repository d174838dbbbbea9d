//! Output module for crawl summaries
//!
//! This module handles:
//! - Snapshotting the crawler's URL bookkeeping after a run
//! - Printing crawl statistics for the command line

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
