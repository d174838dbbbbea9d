//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through the HTTP fetcher.

use futures::StreamExt;
use scope_crawler::config::{
    parse_config, Config, CrawlerConfig, MatcherEntry, MatcherKind, NormalizerKind,
};
use scope_crawler::crawler::crawl;
use scope_crawler::output::CrawlStatistics;
use scope_crawler::{CrawlError, CrawlState, Crawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at the given path
async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                format!(
                    "<html><head><title>{}</title></head><body>{}</body></html>",
                    title, body
                ),
                "text/html; charset=utf-8",
            ),
        )
        .mount(server)
        .await;
}

/// Starts a small site:
///
/// ```text
/// /          -> /about, /blog/, http://elsewhere.test/
/// /about     -> /
/// /blog/     -> /blog/post.pdf, /about#team
/// ```
async fn start_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/about">About</a>
           <a href="/blog/">Blog</a>
           <a href="http://elsewhere.test/">Elsewhere</a>"#,
    )
    .await;
    mount_page(&server, "/about", "About", r#"<a href="/">Home</a>"#).await;
    mount_page(
        &server,
        "/blog/",
        "Blog",
        r#"<a href="post.pdf">Post</a>
           <a href="/about#team">Team</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/blog/post.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"),
        )
        .mount(&server)
        .await;

    server
}

fn seed_of(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

fn paths(pages: &[String], server: &MockServer) -> Vec<String> {
    pages
        .iter()
        .map(|url| url.trim_start_matches(&server.uri()).to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_breadth_first() {
    let server = start_site().await;
    let seed = seed_of(&server);

    let mut crawler = Crawler::from_config(&Config::default()).unwrap();
    let pages = crawler.crawl(&seed).unwrap().collect_pages().await;

    let returned: Vec<String> = pages.iter().map(|p| p.url().to_string()).collect();
    assert_eq!(
        paths(&returned, &server),
        vec!["/", "/about", "/blog/", "/blog/post.pdf", "/about#team"]
    );

    // Home page was parsed as HTML
    let home = pages[0].document();
    assert_eq!(home.status, 200);
    assert_eq!(home.title.as_deref(), Some("Home"));

    // Non-HTML responses carry no links
    assert!(pages[3].document().links.is_empty());

    assert_eq!(crawler.state(), CrawlState::Drained);
    assert_eq!(crawler.urls_rejected(), &["http://elsewhere.test/".to_string()]);
    assert!(crawler.urls_queued().is_empty());
    assert!(crawler.urls_failed().is_empty());
}

#[tokio::test]
async fn test_limit_stops_without_extra_fetch() {
    let server = start_site().await;
    let seed = seed_of(&server);

    let config = Config {
        crawler: CrawlerConfig {
            limit: 1,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut crawler = Crawler::from_config(&config).unwrap();
    let pages = crawler.crawl(&seed).unwrap().collect_pages().await;

    assert_eq!(pages.len(), 1);
    assert_eq!(crawler.state(), CrawlState::LimitReached);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/");

    // Links of the returned page are still queued
    assert_eq!(crawler.urls_queued().len(), 2);
}

#[tokio::test]
async fn test_stop_on_error_when_seed_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config {
        crawler: CrawlerConfig {
            stop_on_error: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut crawler = Crawler::from_config(&config).unwrap();
    let pages = crawler
        .crawl(&seed_of(&server))
        .unwrap()
        .collect_pages()
        .await;

    assert!(pages.is_empty());
    assert_eq!(crawler.state(), CrawlState::StoppedOnError);
    assert_eq!(crawler.urls_failed().len(), 1);
    assert!(crawler.urls_crawled().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_is_skipped() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "Home",
        r#"<a href="/missing">Missing</a><a href="/found">Found</a>"#,
    )
    .await;
    mount_page(&server, "/found", "Found", "").await;

    let mut crawler = Crawler::from_config(&Config::default()).unwrap();
    let pages = crawler
        .crawl(&seed_of(&server))
        .unwrap()
        .collect_pages()
        .await;

    let returned: Vec<String> = pages.iter().map(|p| p.url().to_string()).collect();
    assert_eq!(paths(&returned, &server), vec!["/", "/found"]);
    assert_eq!(
        paths(crawler.urls_failed(), &server),
        vec!["/missing".to_string()]
    );
    assert_eq!(crawler.state(), CrawlState::Drained);
}

#[tokio::test]
async fn test_matchers_and_normalizers_from_config() {
    let server = start_site().await;
    let seed = seed_of(&server);

    let config = parse_config(
        r#"
[crawler]
normalizers = ["remove-fragment"]

[[blacklist]]
kind = "path-regex"
pattern = '\.pdf$'
"#,
    )
    .unwrap();

    let mut crawler = Crawler::from_config(&config).unwrap();
    let pages = crawler.crawl(&seed).unwrap().collect_pages().await;

    let returned: Vec<String> = pages.iter().map(|p| p.url().to_string()).collect();
    // "/about#team" normalizes to an already crawled URL; the pdf is crawled but not returned
    assert_eq!(paths(&returned, &server), vec!["/", "/about", "/blog/"]);
    assert_eq!(crawler.urls_crawled().len(), 4);
}

#[tokio::test]
async fn test_whitelist_only_returns_matching_pages() {
    let server = start_site().await;
    let seed = seed_of(&server);

    let config = Config {
        whitelist: vec![MatcherEntry {
            kind: MatcherKind::PathPrefix,
            pattern: "/blog".to_string(),
        }],
        crawler: CrawlerConfig {
            normalizers: vec![NormalizerKind::RemoveFragment],
            ..Default::default()
        },
        ..Default::default()
    };

    let pages = crawl(&config, &seed).await.unwrap();
    let returned: Vec<String> = pages.iter().map(|p| p.url().to_string()).collect();
    assert_eq!(paths(&returned, &server), vec!["/blog/", "/blog/post.pdf"]);
}

#[tokio::test]
async fn test_stream_and_statistics() {
    let server = start_site().await;
    let seed = seed_of(&server);

    let mut crawler = Crawler::from_config(&Config::default()).unwrap();
    {
        let stream = crawler.crawl(&seed).unwrap().into_stream();
        futures::pin_mut!(stream);
        let first_two: Vec<_> = stream.take(2).collect().await;
        assert_eq!(first_two.len(), 2);
    }

    let stats = CrawlStatistics::from_crawler(&crawler);
    assert_eq!(stats.state, CrawlState::Looping);
    assert_eq!(stats.returned, 2);
    assert_eq!(stats.crawled, 2);
    assert_eq!(stats.queued, 1);
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let mut crawler = Crawler::from_config(&Config::default()).unwrap();
    let result = crawler.crawl("not a url");

    assert!(matches!(result, Err(CrawlError::Url(_))));
    assert_eq!(crawler.state(), CrawlState::Idle);
}
