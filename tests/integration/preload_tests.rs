//! Integration tests for the preload engine
//!
//! These tests use wiremock to stand up a mock site with sitemaps and pages,
//! then run the whole preload (discovery, first pass, retry, summary).

use cache_preload::config::{Config, HttpConfig, PreloadConfig};
use cache_preload::output::MemorySink;
use cache_preload::Preloader;
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given sitemap sources
fn create_test_config(sitemaps: Vec<String>, workers: usize) -> Config {
    Config {
        sitemaps,
        preload: PreloadConfig {
            workers,
            timeout_secs: 2,
        },
        http: HttpConfig {
            user_agent: Some("PreloadTestBot/1.0".to_string()),
            headers: BTreeMap::from([("Connection".to_string(), "close".to_string())]),
        },
    }
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

async fn mount_sitemap(server: &MockServer, route: &str, locs: &[String]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(locs)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("<html></html>"))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_preload_with_recovered_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let a = format!("{}/a", base_url);
    let b = format!("{}/b", base_url);
    let c = format!("{}/c", base_url);

    mount_sitemap(&mock_server, "/page-sitemap.xml", &[a.clone(), b.clone()]).await;
    mount_sitemap(&mock_server, "/post-sitemap.xml", &[b.clone(), c.clone()]).await;

    mount_page(&mock_server, "/a", 200, 1).await;
    mount_page(&mock_server, "/c", 200, 1).await;

    // /b fails once, then succeeds on the retry pass
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/b", 200, 1).await;

    let config = create_test_config(
        vec![
            format!("{}/page-sitemap.xml", base_url),
            format!("{}/post-sitemap.xml", base_url),
        ],
        2,
    );
    let sink = Arc::new(MemorySink::new());
    let preloader = Preloader::new(config, sink.clone()).expect("Failed to create preloader");

    let summary = preloader.run().await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.retried, 1);
    assert!(summary.still_failed.is_empty());
    assert_eq!(summary.success_count(), 3);

    let lines = sink.lines();
    assert!(lines.contains(&"Total unique pages to visit: 3".to_string()));
    assert_eq!(sink.lines_starting_with("[Worker-").len(), 3);
    assert!(lines.contains(&"Retrying 1 failed pages a second time...".to_string()));
    assert!(lines.contains(&format!("[RETRY] {} -> 200", b)));
    assert!(lines.contains(&"Successfully loaded 3 pages out of 3 total.".to_string()));

    // Every `.expect(n)` above is checked here
    mock_server.verify().await;
}

#[tokio::test]
async fn test_preload_with_persistent_failure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let ok = format!("{}/ok", base_url);
    let gone = format!("{}/gone", base_url);

    mount_sitemap(&mock_server, "/sitemap.xml", &[ok.clone(), gone.clone()]).await;
    mount_page(&mock_server, "/ok", 200, 1).await;
    mount_page(&mock_server, "/gone", 404, 2).await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 3);
    let sink = Arc::new(MemorySink::new());
    let preloader = Preloader::new(config, sink.clone()).expect("Failed to create preloader");

    let summary = preloader.run().await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.still_failed, vec![gone.clone()]);
    assert_eq!(summary.success_count(), 1);
    assert!(!summary.still_failed.contains(&ok));
    assert!(sink
        .lines()
        .contains(&"Successfully loaded 1 pages out of 2 total.".to_string()));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_unreachable_sitemap_does_not_abort() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let one = format!("{}/one", base_url);
    let two = format!("{}/two", base_url);

    mount_sitemap(&mock_server, "/first.xml", &[one.clone()]).await;
    mount_sitemap(&mock_server, "/second.xml", &[two.clone()]).await;
    mount_page(&mock_server, "/one", 200, 1).await;
    mount_page(&mock_server, "/two", 200, 1).await;

    let config = create_test_config(
        vec![
            format!("{}/first.xml", base_url),
            "http://127.0.0.1:1/sitemap.xml".to_string(),
            format!("{}/second.xml", base_url),
        ],
        3,
    );
    let sink = Arc::new(MemorySink::new());
    let preloader = Preloader::new(config, sink.clone()).expect("Failed to create preloader");

    let summary = preloader.run().await;

    assert_eq!(summary.total, 2);
    assert_eq!(summary.success_count(), 2);
    assert_eq!(sink.lines_starting_with("Failed to parse").len(), 1);
    assert!(sink
        .lines()
        .contains(&"No failed pages in the first pass.".to_string()));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_timed_out_page_enters_retry_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let slow = format!("{}/slow", base_url);
    mount_sitemap(&mock_server, "/sitemap.xml", &[slow.clone()]).await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 1);
    let sink = Arc::new(MemorySink::new());
    let preloader = Preloader::new(config, sink.clone()).expect("Failed to create preloader");

    let summary = preloader.run().await;

    assert_eq!(summary.retried, 1);
    assert_eq!(summary.still_failed, vec![slow.clone()]);

    let worker_lines = sink.lines_starting_with("[Worker-1]");
    assert_eq!(worker_lines.len(), 1);
    assert!(worker_lines[0].contains("Error: request timed out"));
    assert_eq!(
        sink.lines_starting_with(&format!("[RETRY] Error {}:", slow)).len(),
        1
    );
}

#[tokio::test]
async fn test_not_modified_page_counts_as_loaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let fresh = format!("{}/fresh", base_url);
    let cached = format!("{}/cached", base_url);

    mount_sitemap(&mock_server, "/sitemap.xml", &[fresh.clone(), cached.clone()]).await;
    mount_page(&mock_server, "/fresh", 200, 1).await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/sitemap.xml", base_url)], 2);
    let sink = Arc::new(MemorySink::new());
    let preloader = Preloader::new(config, sink.clone()).expect("Failed to create preloader");

    let summary = preloader.run().await;

    assert_eq!(summary.retried, 0);
    assert!(summary.still_failed.is_empty());
    assert_eq!(summary.success_count(), 2);
    assert!(sink
        .lines()
        .contains(&"No failed pages in the first pass.".to_string()));
    assert!(sink
        .lines()
        .contains(&"Successfully loaded 2 pages out of 2 total.".to_string()));

    mock_server.verify().await;
}
