//! Lifecycle states of a single crawl run
//!
//! A run moves `Idle -> Seeded -> Looping` and ends in exactly one of the
//! terminal states. Every terminal state is a normal completion from the
//! consumer's point of view: the page sequence simply ends.

use std::fmt;

/// Represents where a crawl run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlState {
    // ===== Non-terminal States =====
    /// No crawl has been started on this engine
    #[default]
    Idle,

    /// The frontier holds the seed URL and nothing has been fetched yet
    Seeded,

    /// The engine is dequeuing and fetching pages
    Looping,

    // ===== Terminal States =====
    /// The frontier ran empty
    Drained,

    /// The configured number of pages has been returned
    LimitReached,

    /// A fetch failed while stop-on-error was enabled
    StoppedOnError,
}

impl CrawlState {
    /// Returns true if the run is finished and will not fetch again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Drained | Self::LimitReached | Self::StoppedOnError
        )
    }

    /// Returns true if the run can still make progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Seeded | Self::Looping)
    }

    /// Returns the snake_case name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Seeded => "seeded",
            Self::Looping => "looping",
            Self::Drained => "drained",
            Self::LimitReached => "limit_reached",
            Self::StoppedOnError => "stopped_on_error",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
