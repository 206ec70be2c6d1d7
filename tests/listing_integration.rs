//! Curated listing harvest tests against the bundled fixture and a mock server

use mcp_radar::{
    ArtifactKind, ArtifactStore, AwesomeListing, Category, Harvester, ListingSource, RunOptions,
    TechStack,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/awesome_listing.md")
}

#[tokio::test]
async fn test_file_listing_skips_non_server_sections() {
    let harvester =
        AwesomeListing::new(ListingSource::File(fixture()), Duration::from_secs(5)).unwrap();
    let report = harvester.harvest().await.unwrap();

    let names: Vec<&str> = report.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "acme/pg-mcp",
            "bolt/sqlite-explorer",
            "searcher/web-mcp",
            "coins/ledger"
        ]
    );
    assert!(report.failures.is_empty());
    assert!(report.entries.iter().all(|e| e.stars == 0 && e.forks == 0));
}

#[tokio::test]
async fn test_missing_listing_file_is_an_error() {
    let harvester = AwesomeListing::new(
        ListingSource::File(PathBuf::from("/nonexistent/README.md")),
        Duration::from_secs(5),
    )
    .unwrap();
    assert!(harvester.harvest().await.is_err());
}

#[tokio::test]
async fn test_listing_over_http() {
    let mut server = mockito::Server::new_async().await;
    let body = std::fs::read_to_string(fixture()).unwrap();
    let mock = server
        .mock("GET", "/README.md")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let source = ListingSource::parse(&format!("{}/README.md", server.url()));
    let harvester = AwesomeListing::new(source, Duration::from_secs(5)).unwrap();
    let report = harvester.harvest().await.unwrap();

    mock.assert_async().await;
    assert_eq!(report.entries.len(), 4);
}

#[tokio::test]
async fn test_listing_http_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/README.md")
        .with_status(404)
        .create_async()
        .await;

    let source = ListingSource::parse(&format!("{}/README.md", server.url()));
    let harvester = AwesomeListing::new(source, Duration::from_secs(5)).unwrap();
    let err = harvester.harvest().await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_listing_run_classifies_from_markers() {
    let temp = TempDir::new().unwrap();
    let store = ArtifactStore::new(temp.path());
    let harvester =
        AwesomeListing::new(ListingSource::File(fixture()), Duration::from_secs(5)).unwrap();

    let summary = mcp_radar::pipeline::run(&harvester, &store, &RunOptions::today())
        .await
        .unwrap();
    assert_eq!(summary.stats.inserted, 4);

    let snapshot = store.load_latest(ArtifactKind::Listing);
    let pg = snapshot.get("acme/pg-mcp").unwrap();
    assert_eq!(pg.category, Category::Database);
    assert!(pg.techstack.contains(&TechStack::Python));
    assert!(pg.techstack.contains(&TechStack::Local));

    let explorer = snapshot.get("bolt/sqlite-explorer").unwrap();
    assert!(explorer.techstack.contains(&TechStack::MacOs));
    assert!(explorer.techstack.contains(&TechStack::Windows));
    assert!(explorer.techstack.contains(&TechStack::Linux));

    let ledger = snapshot.get("coins/ledger").unwrap();
    assert!(ledger.techstack.contains(&TechStack::Rust));
    assert!(ledger.techstack.contains(&TechStack::Cloud));
}
