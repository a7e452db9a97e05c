//! Checkpoint and resume behaviour across runs

use crate::common::{
    listing_page, load_test_config, mount_page, mount_page_expecting, profile_page,
    read_records, LISTING_PATH,
};
use profile_harvest::crawler::Coordinator;
use profile_harvest::state::{CheckpointStore, ProgressState};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_resume_only_processes_new_urls() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        LISTING_PATH,
        listing_page(&["dr-a", "dr-b", "dr-c"], None),
    )
    .await;
    mount_page_expecting(&server, "/doctor/dr-a", profile_page("Dr. A. Sharma"), 0).await;
    mount_page_expecting(&server, "/doctor/dr-b", profile_page("Dr. B. Rao"), 0).await;
    mount_page_expecting(&server, "/doctor/dr-c", profile_page("Dr. C. Iyer"), 1).await;

    let (config, hash) = load_test_config(&server, dir.path(), "");

    let store = CheckpointStore::new(config.output.progress_path());
    let mut state = ProgressState::new(Some(hash.clone()));
    state.mark_processed(&format!("{}/doctor/dr-a", server.uri()));
    state.mark_processed(&format!("{}/doctor/dr-b", server.uri()));
    store.save(&mut state).unwrap();

    let summary = Coordinator::new(config.clone(), hash, true)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.skipped_processed, 2);
    assert_eq!(summary.succeeded, 1);

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.processed_count(), 3);
    assert!(reloaded.last_updated.is_some());
}

#[tokio::test]
async fn test_second_run_does_not_duplicate_output() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, LISTING_PATH, listing_page(&["dr-a", "dr-gone"], None)).await;
    mount_page_expecting(&server, "/doctor/dr-a", profile_page("Dr. A. Sharma"), 1).await;
    Mock::given(method("GET"))
        .and(path("/doctor/dr-gone"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let (config, hash) = load_test_config(&server, dir.path(), "");

    let first = Coordinator::new(config.clone(), hash.clone(), true)
        .run()
        .await
        .expect("First harvest failed");
    assert_eq!(first.succeeded, 1);
    assert_eq!(first.extraction_failed, 1);

    let second = Coordinator::new(config.clone(), hash, true)
        .run()
        .await
        .expect("Second harvest failed");
    assert_eq!(second.scheduled, 0);
    assert_eq!(second.failures.len(), 1);

    assert_eq!(read_records(&config.output.records_jsonl_path()).len(), 1);

    let csv = std::fs::read_to_string(config.output.records_csv_path()).unwrap();
    assert_eq!(csv.lines().filter(|l| l.starts_with("source,")).count(), 1);

    let mut reader = csv::Reader::from_path(config.output.failures_csv_path()).unwrap();
    assert_eq!(reader.records().count(), 1);
}

#[tokio::test]
async fn test_fresh_run_ignores_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, LISTING_PATH, listing_page(&["dr-a"], None)).await;
    mount_page_expecting(&server, "/doctor/dr-a", profile_page("Dr. A. Sharma"), 1).await;

    let (config, hash) = load_test_config(&server, dir.path(), "");

    let store = CheckpointStore::new(config.output.progress_path());
    let mut state = ProgressState::new(Some("an-older-config".to_string()));
    state.mark_processed(&format!("{}/doctor/dr-a", server.uri()));
    store.save(&mut state).unwrap();

    let summary = Coordinator::new(config.clone(), hash.clone(), false)
        .run()
        .await
        .expect("Harvest failed");
    assert_eq!(summary.scheduled, 1);
    assert_eq!(summary.succeeded, 1);

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.config_hash.as_deref(), Some(hash.as_str()));
}
