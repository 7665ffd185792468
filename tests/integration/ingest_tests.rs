//! Integration tests for the ingestion run
//!
//! These tests use wiremock to serve listing pages by `page` query
//! parameter and run the full reset, ingest, report cycle end-to-end.

use repo_tally::config::{Config, OutputConfig, SourceConfig};
use repo_tally::crawler::{ingest, PageOutcome, StopReason};
use repo_tally::output::render_report;
use repo_tally::storage::{open_fresh_store, RepositoryStore};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) TestBrowser/1.0";

/// Creates a test configuration pointed at the given listing URL
fn create_test_config(base_url: String, pages: Vec<u32>, db_path: &str) -> Config {
    Config {
        source: SourceConfig {
            base_url,
            page_param: "page".to_string(),
            pages,
            delay_ms: 0,
            user_agent: TEST_USER_AGENT.to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

fn listing_page(repos: &[(&str, Option<&str>, &str)]) -> String {
    let items: String = repos
        .iter()
        .map(|(name, language, stars)| {
            let language = language
                .map(|l| format!(r#"<span itemprop="programmingLanguage">{}</span>"#, l))
                .unwrap_or_default();
            format!(
                r#"<li class="col-12 d-flex">
                    <div class="flex-auto">
                      <h3><a href="/acme/{0}" itemprop="name codeRepository"> {0} </a></h3>
                      <div class="f6 color-fg-muted mt-2">
                        {1}
                        <a class="Link--muted mr-3" href="/acme/{0}/stargazers">
                          <svg aria-label="star"></svg> {2}
                        </a>
                        <a class="Link--muted mr-3" href="/acme/{0}/forks">12</a>
                      </div>
                    </div>
                  </li>"#,
                name, language, stars
            )
        })
        .collect();
    format!(
        r#"<html><head><title>acme repositories</title></head><body>
        <div id="org-repositories"><ul data-filterable-for="your-repos-filter">{}</ul></div>
        </body></html>"#,
        items
    )
}

fn empty_page() -> String {
    r#"<html><body><div class="blankslate"><h3>This organization has no more repositories.</h3></div></body></html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, page: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/acme"))
        .and(query_param("tab", "repositories"))
        .and(query_param("page", page))
        .respond_with(template)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing_url(server: &MockServer) -> String {
    format!("{}/acme?tab=repositories", server.uri())
}

#[tokio::test]
async fn test_full_run_stores_and_orders_repositories() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "1",
        html(listing_page(&[
            ("five", Some("Rust"), "5"),
            ("hundred", Some("Go"), "100"),
        ])),
    )
    .await;
    mount_page(
        &mock_server,
        "2",
        html(listing_page(&[("zero", None, "0"), ("forty-two", Some("C"), "42")])),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(
        listing_url(&mock_server),
        vec![1, 2],
        db_path.to_str().unwrap(),
    );

    let mut store = open_fresh_store(&db_path).unwrap();
    let report = ingest(&config, &mut store).await;

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(report.inserted, 4);

    let rows = store.list_by_stars().unwrap();
    let stars: Vec<i64> = rows.iter().map(|r| r.stars).collect();
    assert_eq!(stars, vec![100, 42, 5, 0]);
    assert_eq!(rows[3].language, "No Language");

    let rendered = render_report(&rows);
    assert!(rendered.ends_with(&format!("Total: {} repositories\n", rows.len())));
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/acme"))
        .and(query_param("page", "1"))
        .and(header("user-agent", TEST_USER_AGENT))
        .respond_with(html(listing_page(&[("tagged", Some("Rust"), "1")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(listing_url(&mock_server), vec![1], db_path.to_str().unwrap());

    let mut store = open_fresh_store(&db_path).unwrap();
    let report = ingest(&config, &mut store).await;

    assert_eq!(report.inserted, 1);
}

#[tokio::test]
async fn test_empty_page_stops_before_later_pages() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "1",
        html(listing_page(&[("a", Some("Rust"), "1,234"), ("b", None, "7")])),
    )
    .await;
    mount_page(&mock_server, "2", html(empty_page())).await;

    for page in ["3", "4"] {
        Mock::given(method("GET"))
            .and(path("/acme"))
            .and(query_param("page", page))
            .respond_with(html(listing_page(&[("never", None, "1")])))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(
        listing_url(&mock_server),
        vec![1, 2, 3, 4],
        db_path.to_str().unwrap(),
    );

    let mut store = open_fresh_store(&db_path).unwrap();
    let report = ingest(&config, &mut store).await;

    assert_eq!(report.stop, StopReason::EmptyPage(2));
    assert_eq!(report.visited_pages(), vec![1, 2]);

    let rows = store.list_by_stars().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "a");
    assert_eq!(rows[0].stars, 1234);
}

#[tokio::test]
async fn test_http_error_page_does_not_stop_the_run() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "1", html(listing_page(&[("one", Some("Rust"), "1")]))).await;
    mount_page(&mock_server, "2", ResponseTemplate::new(503)).await;
    mount_page(&mock_server, "3", html(listing_page(&[("three", Some("Go"), "3")]))).await;
    mount_page(&mock_server, "4", html(listing_page(&[("four", None, "4")]))).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(
        listing_url(&mock_server),
        vec![1, 2, 3, 4],
        db_path.to_str().unwrap(),
    );

    let mut store = open_fresh_store(&db_path).unwrap();
    let report = ingest(&config, &mut store).await;

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(
        report.pages[1],
        PageOutcome::HttpError {
            page: 2,
            status_code: 503
        }
    );

    let mut names: Vec<String> = store
        .list_by_stars()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["four", "one", "three"]);
}

#[tokio::test]
async fn test_unreachable_server_stops_the_run() {
    // Bind then drop a listener so the port is closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(
        format!("http://127.0.0.1:{}/acme?tab=repositories", port),
        vec![1, 2],
        db_path.to_str().unwrap(),
    );

    let mut store = open_fresh_store(&db_path).unwrap();
    let report = ingest(&config, &mut store).await;

    assert!(matches!(report.stop, StopReason::NetworkError { page: 1, .. }));
    assert!(report.pages.is_empty());
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_rerun_discards_previous_rows() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "1", html(listing_page(&[("only", Some("Rust"), "9")]))).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("repos.db");
    let config = create_test_config(listing_url(&mock_server), vec![1], db_path.to_str().unwrap());

    for _ in 0..2 {
        let mut store = open_fresh_store(&db_path).unwrap();
        ingest(&config, &mut store).await;
        store.close().unwrap();
    }

    let mut store = open_fresh_store(&db_path).unwrap();
    assert_eq!(store.count().unwrap(), 0);

    ingest(&config, &mut store).await;
    let rows = store.list_by_stars().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
}
