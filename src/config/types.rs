use crate::url::{
    HostMatcher, PathPrefixMatcher, PathRegexMatcher, RemoveFragmentNormalizer,
    RemoveQueryNormalizer, TrackingParamsNormalizer, TrailingSlashNormalizer, UrlMatcher,
    UrlNormalizer, UrlRegexMatcher,
};
use crate::ConfigError;
use serde::Deserialize;

/// Main configuration structure for Scope-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub whitelist: Vec<MatcherEntry>,
    #[serde(default)]
    pub blacklist: Vec<MatcherEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL used when none is given on the command line
    #[serde(default)]
    pub seed: Option<String>,

    /// Maximum number of pages to return, 0 = unbounded
    #[serde(default)]
    pub limit: usize,

    /// Abort the crawl on the first failed fetch
    #[serde(rename = "stop-on-error", default)]
    pub stop_on_error: bool,

    /// Normalizers applied, in order, to every discovered link
    #[serde(default)]
    pub normalizers: Vec<NormalizerKind>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("scope-crawler/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Which kind of URL matcher a config entry builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherKind {
    /// Wildcard host pattern (e.g., "example.com" or "*.example.com")
    Host,
    /// URL path prefix (e.g., "/blog")
    PathPrefix,
    /// Regular expression over the URL path
    PathRegex,
    /// Regular expression over the full URL
    UrlRegex,
}

/// A whitelist or blacklist matcher entry
#[derive(Debug, Clone, Deserialize)]
pub struct MatcherEntry {
    pub kind: MatcherKind,
    pub pattern: String,
}

impl MatcherEntry {
    /// Builds the matcher described by this entry
    pub fn build(&self) -> Result<Box<dyn UrlMatcher>, ConfigError> {
        let invalid = |e: regex::Error| {
            ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", self.pattern, e))
        };

        let matcher: Box<dyn UrlMatcher> = match self.kind {
            MatcherKind::Host => Box::new(HostMatcher::new(self.pattern.as_str())),
            MatcherKind::PathPrefix => Box::new(PathPrefixMatcher::new(self.pattern.as_str())),
            MatcherKind::PathRegex => {
                Box::new(PathRegexMatcher::new(&self.pattern).map_err(invalid)?)
            }
            MatcherKind::UrlRegex => {
                Box::new(UrlRegexMatcher::new(&self.pattern).map_err(invalid)?)
            }
        };

        Ok(matcher)
    }
}

/// Which URL normalizer a config entry builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizerKind {
    RemoveFragment,
    RemoveQuery,
    TrailingSlash,
    StripTrackingParams,
}

impl NormalizerKind {
    pub fn build(&self) -> Box<dyn UrlNormalizer> {
        match self {
            Self::RemoveFragment => Box::new(RemoveFragmentNormalizer),
            Self::RemoveQuery => Box::new(RemoveQueryNormalizer),
            Self::TrailingSlash => Box::new(TrailingSlashNormalizer),
            Self::StripTrackingParams => Box::new(TrackingParamsNormalizer),
        }
    }
}

impl Config {
    /// Builds the whitelist matchers in configured order
    pub fn whitelist_matchers(&self) -> Result<Vec<Box<dyn UrlMatcher>>, ConfigError> {
        self.whitelist.iter().map(MatcherEntry::build).collect()
    }

    /// Builds the blacklist matchers in configured order
    pub fn blacklist_matchers(&self) -> Result<Vec<Box<dyn UrlMatcher>>, ConfigError> {
        self.blacklist.iter().map(MatcherEntry::build).collect()
    }

    /// Builds the normalizer chain in configured order
    pub fn normalizers(&self) -> Vec<Box<dyn UrlNormalizer>> {
        self.crawler
            .normalizers
            .iter()
            .map(NormalizerKind::build)
            .collect()
    }
}
