//! URL matchers used by the whitelist and blacklist pools

use super::domain::matches_wildcard;
use super::Url;
use regex::Regex;

/// A side-effect free predicate over a [`Url`]
///
/// Closures of type `Fn(&Url) -> bool` implement this trait, so ad-hoc
/// matchers do not need a named type.
pub trait UrlMatcher: Send + Sync {
    /// Returns true if the URL is matched
    fn matches(&self, url: &Url) -> bool;
}

impl<F> UrlMatcher for F
where
    F: Fn(&Url) -> bool + Send + Sync,
{
    fn matches(&self, url: &Url) -> bool {
        self(url)
    }
}

/// Matches URLs whose host fits a wildcard domain pattern
///
/// See [`matches_wildcard`](super::matches_wildcard) for the pattern rules.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    pattern: String,
}

impl HostMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
        }
    }
}

impl UrlMatcher for HostMatcher {
    fn matches(&self, url: &Url) -> bool {
        url.host()
            .map(|host| matches_wildcard(&self.pattern, &host))
            .unwrap_or(false)
    }
}

/// Matches URLs whose path starts with a prefix
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl UrlMatcher for PathPrefixMatcher {
    fn matches(&self, url: &Url) -> bool {
        url.path().starts_with(&self.prefix)
    }
}

/// Matches URLs whose path matches a regular expression
#[derive(Debug, Clone)]
pub struct PathRegexMatcher {
    regex: Regex,
}

impl PathRegexMatcher {
    /// Compiles the pattern, failing on invalid regex syntax
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl From<Regex> for PathRegexMatcher {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl UrlMatcher for PathRegexMatcher {
    fn matches(&self, url: &Url) -> bool {
        self.regex.is_match(url.path())
    }
}

/// Matches URLs whose full string form matches a regular expression
#[derive(Debug, Clone)]
pub struct UrlRegexMatcher {
    regex: Regex,
}

impl UrlRegexMatcher {
    /// Compiles the pattern, failing on invalid regex syntax
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl From<Regex> for UrlRegexMatcher {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl UrlMatcher for UrlRegexMatcher {
    fn matches(&self, url: &Url) -> bool {
        self.regex.is_match(url.as_str())
    }
}
