//! End-to-end crawl tests against an in-process HTTP server, covering the
//! boundary scenarios of the crawl contract: single page extraction, depth
//! capping, duplicate discovery, redirect chains, robots denial, and retry
//! exhaustion.

use std::time::Duration;

use seo_crawler_core::config::CrawlConfig;
use seo_crawler_core::types::{DomainFilter, ExportFormat, IssueKind};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(start_url: String) -> CrawlConfig {
    CrawlConfig {
        start_url,
        max_depth: 3,
        max_pages: 100,
        domain_filter: DomainFilter::Same,
        workers: 2,
        delay: Duration::from_millis(0),
        timeout: Duration::from_secs(5),
        user_agent: "seo-crawler-test/1.0".to_string(),
        respect_robots: true,
        parse_sitemap: false,
        max_retries: 2,
        export_format: ExportFormat::Json,
        export_path: None,
    }
}

async fn allow_all_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn single_page_no_links() {
    let server = MockServer::start().await;
    allow_all_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html><head><title>Hi</title></head><body><h1>Hi</h1></body></html>"),
        )
        .mount(&server)
        .await;

    let report = seo_crawler_crawler::crawl(&config(server.uri())).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.title, "Hi");
    assert_eq!(page.h1, vec!["Hi".to_string()]);
    assert_eq!(page.meta_description, "");
    assert!(page.internal_links.is_empty());
    assert!(page.external_links.is_empty());

    let kinds: Vec<_> = report.issues.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&IssueKind::MissingMetaDescription));
    assert!(kinds.contains(&IssueKind::ShortTitle));
    assert!(kinds.contains(&IssueKind::NoCanonical));
}

#[tokio::test]
async fn depth_cap_stops_before_unreached_page() {
    let server = MockServer::start().await;
    allow_all_robots(&server).await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(format!(r#"<html><head><title>A</title></head><body><h1>A</h1><a href="{base}/b">b</a></body></html>"#)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(format!(r#"<html><head><title>B</title></head><body><h1>B</h1><a href="{base}/c">c</a></body></html>"#)),
        )
        .mount(&server)
        .await;

    let mut cfg = config(format!("{base}/a"));
    cfg.max_depth = 1;
    let report = seo_crawler_crawler::crawl(&cfg).await.unwrap();

    let mut urls: Vec<_> = report.results.iter().map(|p| p.url.clone()).collect();
    urls.sort();
    assert_eq!(urls, vec![format!("{base}/a"), format!("{base}/b")]);

    let edges: std::collections::HashSet<_> = report
        .graph
        .iter()
        .flat_map(|(src, targets)| targets.iter().map(move |t| (src.clone(), t.clone())))
        .collect();
    assert!(edges.contains(&(format!("{base}/a"), format!("{base}/b"))));
    assert!(edges.contains(&(format!("{base}/b"), format!("{base}/c"))));
}

#[tokio::test]
async fn duplicate_discovery_fetches_target_once() {
    let server = MockServer::start().await;
    allow_all_robots(&server).await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(format!(r#"<html><head><title>A</title></head><body><h1>A</h1><a href="{base}/seed">seed</a><a href="{base}/c">c</a></body></html>"#)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(r#"<html><head><title>C</title></head><body><h1>C</h1></body></html>"#),
        )
        .mount(&server)
        .await;
    // "seed" itself links to /c as well, so both /seed and /a point at /c.
    Mock::given(method("GET"))
        .and(path("/seed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(format!(r#"<html><head><title>Seed</title></head><body><h1>Seed</h1><a href="{base}/a">a</a><a href="{base}/c">c</a></body></html>"#)),
        )
        .mount(&server)
        .await;

    let cfg = config(format!("{base}/seed"));
    let report = seo_crawler_crawler::crawl(&cfg).await.unwrap();

    let c_results: Vec<_> = report.results.iter().filter(|p| p.url == format!("{base}/c")).collect();
    assert_eq!(c_results.len(), 1);

    let edges: std::collections::HashSet<_> = report
        .graph
        .iter()
        .flat_map(|(src, targets)| targets.iter().map(move |t| (src.clone(), t.clone())))
        .collect();
    assert!(edges.contains(&(format!("{base}/a"), format!("{base}/c"))));
    assert!(edges.contains(&(format!("{base}/seed"), format!("{base}/c"))));
}

#[tokio::test]
async fn redirect_chain_is_recorded_on_the_requested_url() {
    let server = MockServer::start().await;
    allow_all_robots(&server).await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{base}/b")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", format!("{base}/c")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html><head><title>C</title></head><body><h1>C</h1></body></html>"),
        )
        .mount(&server)
        .await;

    let cfg = config(format!("{base}/a"));
    let report = seo_crawler_crawler::crawl(&cfg).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.url, format!("{base}/a"));
    assert_eq!(page.status_code, 200);
    assert_eq!(page.redirect_chain, vec![format!("{base}/b"), format!("{base}/c")]);
    assert!(report.issues.iter().any(|i| i.kind == IssueKind::RedirectChain && i.url == page.url));
}

#[tokio::test]
async fn robots_denied_page_is_recorded_as_broken_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string("<html></html>"),
        )
        .mount(&server)
        .await;

    let cfg = config(format!("{base}/private"));
    let report = seo_crawler_crawler::crawl(&cfg).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.status_code, 0);
    assert!(page.error.starts_with("blocked by robots.txt"));
    assert!(report.issues.iter().any(|i| i.kind == IssueKind::BrokenLink && i.url == page.url));
}

#[tokio::test]
async fn retry_exhaustion_on_persistent_5xx() {
    let server = MockServer::start().await;
    allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut cfg = config(server.uri());
    cfg.max_retries = 2;
    let report = seo_crawler_crawler::crawl(&cfg).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let page = &report.results[0];
    assert_eq!(page.status_code, 503);
    assert_eq!(page.error, "HTTP 503");
    assert!(report.issues.iter().any(|i| i.kind == IssueKind::BrokenLink));

    let received = server.received_requests().await.unwrap();
    let attempts = received.iter().filter(|r| r.url.path() == "/").count();
    assert_eq!(attempts, 3);
}
