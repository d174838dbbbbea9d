//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Where a crawl run is in its lifecycle (seeded, looping, drained, etc.)
//! - `Frontier`: The queued/crawled/rejected/returned bookkeeping for one run

mod crawl_state;
mod frontier;

// Re-export main types
pub use crawl_state::CrawlState;
pub use frontier::Frontier;
