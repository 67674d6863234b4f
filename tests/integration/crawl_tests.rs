//! Integration tests for the crawlers
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! crawl cycle end-to-end against a temporary SQLite database.

use docglean::config::{Config, CrawlConfig, SiteConfig, StoreConfig};
use docglean::crawler::{self, CrawlMode};
use docglean::storage::{SqliteStore, Store};
use docglean::GleanError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at a mock server and temp database
fn create_test_config(server_uri: &str, db_path: &str) -> Config {
    Config {
        site: SiteConfig {
            base_url: server_uri.to_string(),
            allowed_domain: "127.0.0.1".to_string(),
            sitemap_url: Some(format!("{}/sitemap.xml", server_uri)),
            glossary_index_url: Some(format!("{}/glossary", server_uri)),
        },
        crawl: CrawlConfig {
            // Effectively unthrottled: 1ms spacing, no inter-item delay
            requests_per_minute: Some(60_000),
            delay_between_items: Some(0),
            char_threshold: None,
        },
        store: StoreConfig {
            database_url: db_path.to_string(),
        },
    }
}

/// A documentation page with comfortably more than 500 readable characters
fn long_article_page(title: &str) -> String {
    let paragraph = "Dashboards collect related questions into a single view so that a \
        team can monitor the metrics it cares about without rebuilding the same query \
        over and over again for every meeting or report.";
    let body: String = (0..5).map(|_| format!("<p>{}</p>", paragraph)).collect();
    format!(
        r#"<html><head><title>{}</title></head><body>
        <nav class="main-menu"><a href="/docs/other">Other</a></nav>
        <article><h1>{}</h1>{}</article>
        <footer>Footer boilerplate</footer>
        </body></html>"#,
        title, title, body
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_docs_site(server: &MockServer) {
    let sitemap = format!(
        "<?xml version=\"1.0\"?><urlset>\
        <url><loc>{0}/docs/a</loc></url>\
        <url><loc>{0}/api/b</loc></url>\
        <url><loc>{0}/learn/c</loc></url>\
        </urlset>",
        server.uri()
    );
    mount_page(server, "/sitemap.xml", sitemap).await;
    mount_page(server, "/docs/a", long_article_page("Page A")).await;
    mount_page(server, "/learn/c", long_article_page("Page C")).await;
}

#[tokio::test]
async fn test_docs_crawl_end_to_end() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let summary = crawler::run(CrawlMode::Docs, config).await.unwrap();

    // The /api/ entry is excluded even though it appears in a <loc> tag
    assert_eq!(summary.total, 2);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);

    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();
    assert_eq!(store.count_documents().unwrap(), 2);

    let doc = store
        .get_document(&format!("{}/docs/a", server.uri()))
        .unwrap()
        .unwrap();
    assert!(doc.content.contains("# Page A"));
    assert!(doc.content.contains("Dashboards collect related questions"));
    assert!(!doc.content.contains("Footer boilerplate"));
    assert!(doc.token_count > 0);

    let api_doc = store
        .get_document(&format!("{}/api/b", server.uri()))
        .unwrap();
    assert!(api_doc.is_none());
}

#[tokio::test]
async fn test_docs_recrawl_skips_existing_rows() {
    let server = MockServer::start().await;
    mount_docs_site(&server).await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let db_str = db_path.to_str().unwrap();

    let first = crawler::run(CrawlMode::Docs, create_test_config(&server.uri(), db_str))
        .await
        .unwrap();
    assert_eq!(first.saved, 2);

    let url_a = format!("{}/docs/a", server.uri());
    let before = {
        let store = SqliteStore::open(db_str).unwrap();
        store.get_document(&url_a).unwrap().unwrap()
    };

    let second = crawler::run(CrawlMode::Docs, create_test_config(&server.uri(), db_str))
        .await
        .unwrap();

    // Re-crawling existing URLs is a skip, not an update
    assert_eq!(second.saved, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.failed, 0);

    let store = SqliteStore::open(db_str).unwrap();
    assert_eq!(store.count_documents().unwrap(), 2);
    let after = store.get_document(&url_a).unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after.content, before.content);
}

#[tokio::test]
async fn test_docs_short_page_is_failed_item_not_crash() {
    let server = MockServer::start().await;

    let sitemap = format!(
        "<urlset><url><loc>{}/docs/tiny</loc></url></urlset>",
        server.uri()
    );
    mount_page(&server, "/sitemap.xml", sitemap).await;
    // Roughly 300 readable characters, below the 500-character threshold
    let short_paragraph = "A short release note that mentions a fix or two but never \
        reaches the length of a real documentation article.";
    mount_page(
        &server,
        "/docs/tiny",
        format!(
            "<html><body><article><p>{0}</p><p>{0}</p><p>{0}</p></article></body></html>",
            short_paragraph
        ),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let summary = crawler::run(CrawlMode::Docs, config).await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.saved, 0);
    assert_eq!(summary.failed, 1);

    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();
    assert_eq!(store.count_documents().unwrap(), 0);
}

#[tokio::test]
async fn test_docs_discovery_failure_is_fatal() {
    let server = MockServer::start().await;
    // No sitemap mock mounted: the discovery fetch gets a 404

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let result = crawler::run(CrawlMode::Docs, config).await;
    assert!(matches!(result, Err(GleanError::Discovery { .. })));
}

#[tokio::test]
async fn test_bad_connection_string_is_fatal() {
    let server = MockServer::start().await;
    let mut config = create_test_config(&server.uri(), "ignored");
    config.store.database_url = "postgres://localhost/nope".to_string();

    let result = crawler::run(CrawlMode::Docs, config).await;
    assert!(matches!(result, Err(GleanError::Store(_))));
}

async fn mount_glossary_site(server: &MockServer, etl_definition: &str) {
    let index = r#"<html><body>
        <a href="/glossary/etl">ETL</a>
        <a href="/glossary/etl">ETL duplicate</a>
        <a href="/glossary/data-warehouse">Data Warehouse</a>
        <a href="/pricing">Pricing</a>
        </body></html>"#;
    mount_page(server, "/glossary", index.to_string()).await;

    let etl_page = format!(
        r#"<html><body><main>
        <h2>What is ETL?</h2>
        <p>{}</p>
        </main></body></html>"#,
        etl_definition
    );
    mount_page(server, "/glossary/etl", etl_page).await;

    let warehouse_page = r#"<html><body><main>
        <h2>What is a data warehouse?</h2>
        <p>A data warehouse is a central repository of integrated data from disparate sources.</p>
        <h4>Also known as</h4>
        <div><span>Enterprise Data Warehouse</span></div>
        </main></body></html>"#;
    mount_page(server, "/glossary/data-warehouse", warehouse_page.to_string()).await;
}

const ETL_DEFINITION: &str =
    "ETL is a data integration process that extracts, transforms, and loads data.";

#[tokio::test]
async fn test_glossary_crawl_end_to_end() {
    let server = MockServer::start().await;
    mount_glossary_site(&server, ETL_DEFINITION).await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let summary = crawler::run(CrawlMode::Glossary, config).await.unwrap();

    // The duplicate index link is de-duplicated during discovery
    assert_eq!(summary.total, 2);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.failed, 0);

    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();

    let etl = store.get_keyword("Etl").unwrap().unwrap();
    assert_eq!(etl.definition, ETL_DEFINITION);
    assert_eq!(etl.category, "Glossary");
    assert!(etl.is_active);
    // No "also known as" block on the ETL page: no synonyms recorded
    assert!(store.get_synonyms("Etl").unwrap().is_empty());

    let warehouse = store.get_keyword("Data Warehouse").unwrap().unwrap();
    assert!(warehouse.definition.starts_with("A data warehouse is"));

    let synonyms = store.get_synonyms("Data Warehouse").unwrap();
    assert_eq!(synonyms.len(), 1);
    assert_eq!(synonyms[0].word, "Enterprise Data Warehouse");
}

#[tokio::test]
async fn test_glossary_recrawl_refreshes_without_duplicating() {
    let server = MockServer::start().await;
    mount_glossary_site(&server, ETL_DEFINITION).await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let db_str = db_path.to_str().unwrap();

    crawler::run(CrawlMode::Glossary, create_test_config(&server.uri(), db_str))
        .await
        .unwrap();

    // Second crawl sees a revised definition on the same page
    let revised = "ETL is the process of moving data from source systems into a warehouse.";
    server.reset().await;
    mount_glossary_site(&server, revised).await;

    let second = crawler::run(CrawlMode::Glossary, create_test_config(&server.uri(), db_str))
        .await
        .unwrap();
    assert_eq!(second.saved, 2);
    assert_eq!(second.failed, 0);

    let store = SqliteStore::open(db_str).unwrap();

    // Refreshed in place: still one row per keyword, new definition
    assert_eq!(store.count_keywords().unwrap(), 2);
    let etl = store.get_keyword("Etl").unwrap().unwrap();
    assert_eq!(etl.definition, revised);

    // Synonym insertion is idempotent across runs
    let synonyms = store.get_synonyms("Data Warehouse").unwrap();
    assert_eq!(synonyms.len(), 1);
}

#[tokio::test]
async fn test_glossary_page_without_definition_is_failed_item() {
    let server = MockServer::start().await;

    let index = r#"<html><body><a href="/glossary/empty-term">Empty</a></body></html>"#;
    mount_page(&server, "/glossary", index.to_string()).await;
    mount_page(
        &server,
        "/glossary/empty-term",
        "<html><body><main><div></div></main></body></html>".to_string(),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("glean.db");
    let config = create_test_config(&server.uri(), db_path.to_str().unwrap());

    let summary = crawler::run(CrawlMode::Glossary, config).await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.failed, 1);

    let store = SqliteStore::open(db_path.to_str().unwrap()).unwrap();
    assert_eq!(store.count_keywords().unwrap(), 0);
}
