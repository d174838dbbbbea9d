//! URL handling module for Scope-Crawler
//!
//! This module provides the [`Url`] value used as the unit of identity by the
//! crawl engine, the [`UrlMatcher`] and [`UrlNormalizer`] capabilities, and the
//! concrete matchers and normalizers shipped with the crate.

mod domain;
mod matcher;
mod normalize;

use crate::UrlError;
use std::fmt;
use std::str::FromStr;

// Re-export matcher and normalizer types
pub use domain::{extract_domain, matches_wildcard};
pub use matcher::{HostMatcher, PathPrefixMatcher, PathRegexMatcher, UrlMatcher, UrlRegexMatcher};
pub use normalize::{
    RemoveFragmentNormalizer, RemoveQueryNormalizer, TrackingParamsNormalizer,
    TrailingSlashNormalizer, UrlNormalizer,
};

/// An immutable, absolute URL
///
/// Two values are equal exactly when their string forms are equal. No
/// canonicalization happens here beyond what parsing itself does; that is
/// the job of a [`UrlNormalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Url(::url::Url);

impl Url {
    /// Parses an absolute URL string
    ///
    /// # Arguments
    ///
    /// * `raw` - The string to parse
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The parsed URL
    /// * `Err(UrlError::Malformed)` - The string is not a syntactically valid absolute URL
    ///
    /// # Examples
    ///
    /// ```
    /// use scope_crawler::url::Url;
    ///
    /// let url = Url::parse("http://example.com/about").unwrap();
    /// assert_eq!(url.as_str(), "http://example.com/about");
    ///
    /// assert!(Url::parse("/about").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        ::url::Url::parse(raw)
            .map(Self)
            .map_err(|e| UrlError::Malformed {
                url: raw.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns the string form used as the dedup key
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the lowercase host, if any
    pub fn host(&self) -> Option<String> {
        extract_domain(&self.0)
    }

    /// Returns the path component
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Returns the query string, if any
    pub fn query(&self) -> Option<&str> {
        self.0.query()
    }

    /// Returns the fragment, if any
    pub fn fragment(&self) -> Option<&str> {
        self.0.fragment()
    }

    /// Resolves a possibly relative reference against this URL
    pub fn join(&self, reference: &str) -> Result<Self, UrlError> {
        self.0
            .join(reference)
            .map(Self)
            .map_err(|e| UrlError::Malformed {
                url: reference.to_string(),
                reason: e.to_string(),
            })
    }

    /// Borrows the underlying parsed URL
    pub fn as_parsed(&self) -> &::url::Url {
        &self.0
    }

    /// Consumes the value, returning the underlying parsed URL
    pub fn into_parsed(self) -> ::url::Url {
        self.0
    }
}

impl From<::url::Url> for Url {
    fn from(url: ::url::Url) -> Self {
        Self(url)
    }
}

impl FromStr for Url {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Url {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_absolute_url() {
        let url = Url::parse("http://example.com/about").unwrap();
        assert_eq!(url.as_str(), "http://example.com/about");
        assert_eq!(url.path(), "/about");
        assert_eq!(url.host(), Some("example.com".to_string()));
    }

    #[test]
    fn test_parse_canonicalizes_seed() {
        let url = Url::parse("http://example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");

        let url = Url::parse("  HTTP://Example.COM/docs  ").unwrap();
        assert_eq!(url.as_str(), "http://example.com/docs");
    }

    #[test]
    fn test_parse_relative_url_is_malformed() {
        let result = Url::parse("/about");
        assert!(matches!(result, Err(UrlError::Malformed { .. })));
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(Url::parse("not a url").is_err());
        assert!(Url::parse("").is_err());
        assert!(Url::parse("http://").is_err());
    }

    #[test]
    fn test_malformed_error_keeps_raw_string() {
        match Url::parse("::nope") {
            Err(UrlError::Malformed { url, .. }) => assert_eq!(url, "::nope"),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_equality_is_by_string_form() {
        let a = Url::parse("http://example.com/page").unwrap();
        let b = Url::parse("http://example.com/page").unwrap();
        let c = Url::parse("http://example.com/page/").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Url> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_join_relative_reference() {
        let base = Url::parse("http://example.com/docs/index.html").unwrap();
        let joined = base.join("../about").unwrap();
        assert_eq!(joined.as_str(), "http://example.com/about");
    }

    #[test]
    fn test_display_and_from_str() {
        let url: Url = "https://example.com/a?b=c".parse().unwrap();
        assert_eq!(url.to_string(), "https://example.com/a?b=c");
        assert_eq!(url.query(), Some("b=c"));
    }
}
