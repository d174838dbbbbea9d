//! URL normalizers applied to discovered links before dedup and scope checks

use super::Url;

/// List of tracking query parameters removed by [`TrackingParamsNormalizer`]
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// A total, side-effect free transform over a [`Url`]
///
/// Normalizers are applied in list order, each one consuming the output of
/// the previous one. Closures of type `Fn(Url) -> Url` implement this trait.
pub trait UrlNormalizer: Send + Sync {
    /// Returns the canonical form of the URL
    fn normalize(&self, url: Url) -> Url;
}

impl<F> UrlNormalizer for F
where
    F: Fn(Url) -> Url + Send + Sync,
{
    fn normalize(&self, url: Url) -> Url {
        self(url)
    }
}

/// Drops the `#fragment` part of a URL
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveFragmentNormalizer;

impl UrlNormalizer for RemoveFragmentNormalizer {
    fn normalize(&self, url: Url) -> Url {
        let mut url = url.into_parsed();
        url.set_fragment(None);
        url.into()
    }
}

/// Drops the whole query string
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveQueryNormalizer;

impl UrlNormalizer for RemoveQueryNormalizer {
    fn normalize(&self, url: Url) -> Url {
        let mut url = url.into_parsed();
        url.set_query(None);
        url.into()
    }
}

/// Removes the trailing slash from non-root paths
///
/// `http://example.com/docs/` becomes `http://example.com/docs`, while
/// `http://example.com/` is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingSlashNormalizer;

impl UrlNormalizer for TrailingSlashNormalizer {
    fn normalize(&self, url: Url) -> Url {
        let path = url.path();
        if path.len() <= 1 || !path.ends_with('/') {
            return url;
        }

        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();

        let mut url = url.into_parsed();
        url.set_path(&trimmed);
        url.into()
    }
}

/// Removes tracking query parameters and sorts the remaining ones
///
/// An empty query string left behind is removed entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingParamsNormalizer;

impl UrlNormalizer for TrackingParamsNormalizer {
    fn normalize(&self, url: Url) -> Url {
        if url.query().is_none() {
            return url;
        }

        let mut url = url.into_parsed();
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }

        url.into()
    }
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_remove_fragment() {
        let result = RemoveFragmentNormalizer.normalize(url("https://example.com/page#section"));
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_query() {
        let result = RemoveQueryNormalizer.normalize(url("https://example.com/page?a=1&b=2#top"));
        assert_eq!(result.as_str(), "https://example.com/page#top");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = TrailingSlashNormalizer.normalize(url("https://example.com/page/"));
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = TrailingSlashNormalizer.normalize(url("https://example.com/"));
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_trailing_slash_keeps_query() {
        let result = TrailingSlashNormalizer.normalize(url("https://example.com/docs/?v=2"));
        assert_eq!(result.as_str(), "https://example.com/docs?v=2");
    }

    #[test]
    fn test_remove_tracking_params() {
        let result =
            TrackingParamsNormalizer.normalize(url("https://example.com/page?utm_source=twitter"));
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_sort_query_params() {
        let result = TrackingParamsNormalizer.normalize(url("https://example.com/page?b=2&a=1"));
        assert_eq!(result.as_str(), "https://example.com/page?a=1&b=2");
    }

    #[test]
    fn test_mixed_query_params() {
        let result = TrackingParamsNormalizer.normalize(url(
            "https://example.com/page?keep=yes&utm_medium=email&another=value&fbclid=123",
        ));
        assert_eq!(
            result.as_str(),
            "https://example.com/page?another=value&keep=yes"
        );
    }

    #[test]
    fn test_custom_utm_param() {
        let result =
            TrackingParamsNormalizer.normalize(url("https://example.com/page?utm_custom=value"));
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_closure_normalizer() {
        let upper_path = |url: Url| {
            let mut parsed = url.into_parsed();
            let path = parsed.path().to_uppercase();
            parsed.set_path(&path);
            Url::from(parsed)
        };
        let result = upper_path.normalize(url("https://example.com/about"));
        assert_eq!(result.as_str(), "https://example.com/ABOUT");
    }
}
