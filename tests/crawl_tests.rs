//! End-to-end crawl tests against mock HTTP servers.
//!
//! These drive the full fetch -> extract -> convert -> save cycle and pin
//! down the crawl guarantees: at-most-once visits, budget enforcement,
//! robots compliance, sitemap flattening and failure isolation.

use docmirror::config::{default_user_agent, CrawlConfig, DiscoveryMethod};
use docmirror::crawler::{build_http_client, Crawler};
use docmirror::output::CrawlStats;
use docmirror::{CrawlError, SitemapError};
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::watch;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str, output: &Path, discovery: DiscoveryMethod) -> CrawlConfig {
    CrawlConfig {
        base_url: Url::parse(&format!("{}/", server_uri)).unwrap(),
        output_dir: output.to_path_buf(),
        method: discovery,
        sitemap_url: None,
        delay: 0.0,
        max_pages: None,
        respect_robots: true,
        user_agent: default_user_agent(),
    }
}

async fn run_crawler(config: CrawlConfig) -> Result<CrawlStats, CrawlError> {
    let client = build_http_client(&config.user_agent).unwrap();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut crawler = Crawler::new(config, client, shutdown_rx).await?;
    crawler.run().await
}

/// An HTML page with a title and a list of in-body links
fn page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect();
    format!(
        "<html><head><title>{title}</title></head>\
         <body><main><p>{title} body</p>{anchors}</main></body></html>"
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recursive_crawl_visits_diamond_once() {
    let server = MockServer::start().await;

    // Diamond: / -> /a, /b; /a -> /d; /b -> /d. The shared node /d must be
    // fetched exactly once even though two pages discover it.
    mount_page(&server, "/", page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", page("A", &["/d"]), 1).await;
    mount_page(&server, "/b", page("B", &["/d"]), 1).await;
    mount_page(&server, "/d", page("D", &[]), 1).await;

    let output = TempDir::new().unwrap();
    let config = test_config(&server.uri(), output.path(), DiscoveryMethod::Recursive);

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 4);
    assert_eq!(stats.pages_failed, 0);

    for file in ["index.md", "a.md", "b.md", "d.md"] {
        assert!(output.path().join(file).exists(), "{file} missing");
    }

    let index = std::fs::read_to_string(output.path().join("index.md")).unwrap();
    assert!(index.starts_with("---\n"));
    assert!(index.contains("title: Home"));
    assert!(index.contains("source_url: "));
    assert!(index.contains("Home body"));
}

#[tokio::test]
async fn test_page_budget_halts_recursive_crawl() {
    let server = MockServer::start().await;

    // Chain with plenty of reachable pages; only the first two may be visited
    mount_page(&server, "/", page("Home", &["/p1"]), 1).await;
    mount_page(&server, "/p1", page("P1", &["/p2"]), 1).await;
    mount_page(&server, "/p2", page("P2", &["/p3"]), 0).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Recursive);
    config.max_pages = Some(2);

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_visited(), 2);
    assert!(output.path().join("index.md").exists());
    assert!(output.path().join("p1.md").exists());
    assert!(!output.path().join("p2.md").exists());
}

#[tokio::test]
async fn test_robots_disallow_keeps_url_out_of_frontier() {
    let server = MockServer::start().await;

    mount_robots(&server, "User-agent: *\nDisallow: /private/").await;
    mount_page(
        &server,
        "/",
        page("Home", &["/private/secret", "/public"]),
        1,
    )
    .await;
    mount_page(&server, "/public", page("Public", &[]), 1).await;
    // Never fetched: excluded by the robots policy before entering pending
    mount_page(&server, "/private/secret", page("Secret", &[]), 0).await;

    let output = TempDir::new().unwrap();
    let config = test_config(&server.uri(), output.path(), DiscoveryMethod::Recursive);

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 2);
    assert!(!output.path().join("private").join("secret.md").exists());
}

#[tokio::test]
async fn test_sitemap_index_is_flattened() {
    let server = MockServer::start().await;
    let base = server.uri();

    let index = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sitemap><loc>{base}/sitemap-a.xml</loc></sitemap>
            <sitemap><loc>{base}/sitemap-b.xml</loc></sitemap>
        </sitemapindex>"#
    );
    // 3 + 5 entries with /s3 listed in both: 7 distinct pages
    let leaf_a = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>{base}/s1</loc></url>
            <url><loc>{base}/s2</loc></url>
            <url><loc>{base}/s3</loc></url>
        </urlset>"#
    );
    let leaf_b = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>{base}/s3</loc></url>
            <url><loc>{base}/s4</loc></url>
            <url><loc>{base}/s5</loc></url>
            <url><loc>{base}/s6</loc></url>
            <url><loc>{base}/s7</loc></url>
        </urlset>"#
    );

    mount_page(&server, "/sitemap.xml", index, 1).await;
    mount_page(&server, "/sitemap-a.xml", leaf_a, 1).await;
    mount_page(&server, "/sitemap-b.xml", leaf_b, 1).await;

    for route in ["/s1", "/s2", "/s3", "/s4", "/s5", "/s6", "/s7"] {
        // Pages link onward, but sitemap mode must not follow links
        mount_page(&server, route, page(route, &["/unlisted"]), 1).await;
    }
    mount_page(&server, "/unlisted", page("Unlisted", &[]), 0).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Sitemap);
    config.sitemap_url = Some(Url::parse(&format!("{base}/sitemap.xml")).unwrap());
    config.respect_robots = false;

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 7);
    assert!(output.path().join("s3.md").exists());
    assert!(!output.path().join("unlisted.md").exists());
}

#[tokio::test]
async fn test_sitemap_budget_truncates_by_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>{base}/s1</loc></url>
            <url><loc>{base}/s2</loc></url>
            <url><loc>{base}/s3</loc></url>
            <url><loc>{base}/s4</loc></url>
        </urlset>"#
    );

    mount_page(&server, "/sitemap.xml", sitemap, 1).await;
    mount_page(&server, "/s1", page("S1", &[]), 1).await;
    mount_page(&server, "/s2", page("S2", &[]), 1).await;
    mount_page(&server, "/s3", page("S3", &[]), 0).await;
    mount_page(&server, "/s4", page("S4", &[]), 0).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Sitemap);
    config.sitemap_url = Some(Url::parse(&format!("{base}/sitemap.xml")).unwrap());
    config.respect_robots = false;
    config.max_pages = Some(2);

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 2);
    assert!(output.path().join("s1.md").exists());
    assert!(output.path().join("s2.md").exists());
    assert!(!output.path().join("s3.md").exists());
}

#[tokio::test]
async fn test_sitemap_with_no_matching_urls_fails_explicit_mode() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Every entry points at a different host, so nothing survives filtering
    let sitemap = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>https://elsewhere.example.org/a</loc></url>
            <url><loc>https://elsewhere.example.org/b</loc></url>
        </urlset>"#;

    mount_page(&server, "/sitemap.xml", sitemap.to_string(), 1).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Sitemap);
    config.sitemap_url = Some(Url::parse(&format!("{base}/sitemap.xml")).unwrap());
    config.respect_robots = false;

    let result = run_crawler(config).await;
    assert!(matches!(
        result,
        Err(CrawlError::Sitemap(SitemapError::NoUrls))
    ));
}

#[tokio::test]
async fn test_auto_mode_falls_back_to_recursive_when_sitemap_is_unusable() {
    let server = MockServer::start().await;

    // The probe finds a sitemap, but its entries are all out of scope
    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let sitemap = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
            <url><loc>https://elsewhere.example.org/a</loc></url>
        </urlset>"#;
    mount_page(&server, "/sitemap.xml", sitemap.to_string(), 1).await;

    mount_page(&server, "/", page("Home", &["/child"]), 1).await;
    mount_page(&server, "/child", page("Child", &[]), 1).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Auto);
    config.respect_robots = false;

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 2);
    assert!(output.path().join("index.md").exists());
    assert!(output.path().join("child.md").exists());
}

#[tokio::test]
async fn test_page_failure_does_not_abort_the_run() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Home", &["/broken", "/ok"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", page("Ok", &[]), 1).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Recursive);
    config.respect_robots = false;

    let stats = run_crawler(config).await.unwrap();

    assert_eq!(stats.pages_saved, 2);
    assert_eq!(stats.pages_failed, 1);
    assert!(!output.path().join("broken.md").exists());
    assert!(output.path().join("ok.md").exists());
}

#[tokio::test]
async fn test_mirrored_tree_preserves_url_structure() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        page("Home", &["/guide/setup/install", "/api/reference"]),
        1,
    )
    .await;
    mount_page(&server, "/guide/setup/install", page("Install", &[]), 1).await;
    mount_page(&server, "/api/reference", page("Reference", &[]), 1).await;

    let output = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), output.path(), DiscoveryMethod::Recursive);
    config.respect_robots = false;

    run_crawler(config).await.unwrap();

    assert!(output
        .path()
        .join("guide")
        .join("setup")
        .join("install.md")
        .exists());
    assert!(output.path().join("api").join("reference.md").exists());
}
