//! End-to-end harvests against a mock site

use crate::common::{
    listing_page, load_test_config, mount_page, mount_page_expecting, profile_page,
    read_records, LISTING_PATH,
};
use profile_harvest::crawler::Coordinator;
use profile_harvest::extract::CSV_HEADERS;
use profile_harvest::validation::violations;
use profile_harvest::HarvestError;
use std::collections::HashSet;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_harvest_across_two_listing_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let page2 = format!("{}/page/2", LISTING_PATH);
    mount_page(
        &server,
        LISTING_PATH,
        listing_page(&["dr-a-sharma", "dr-b-rao"], Some(&page2)),
    )
    .await;
    mount_page(&server, &page2, listing_page(&["dr-b-rao", "dr-c-iyer"], None)).await;
    for (slug, name) in [
        ("dr-a-sharma", "Dr. A. Sharma"),
        ("dr-b-rao", "Dr. B. Rao"),
        ("dr-c-iyer", "Dr. C. Iyer"),
    ] {
        mount_page_expecting(&server, &format!("/doctor/{}", slug), profile_page(name), 1).await;
    }

    let (config, hash) = load_test_config(&server, dir.path(), "");
    let summary = Coordinator::new(config.clone(), hash, true)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.scheduled, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.validation_failed + summary.extraction_failed, 0);
    assert!(summary.failures_csv.is_none());

    let records = read_records(&config.output.records_jsonl_path());
    assert_eq!(records.len(), 3);

    let urls: HashSet<&str> = records.iter().map(|r| r.profile_url.as_str()).collect();
    assert_eq!(urls.len(), 3);

    for record in &records {
        assert!(violations(record, "zenonco").is_empty());
        assert_eq!(record.listing_page_url, config.site.listing_url);
        assert_eq!(record.designation.as_deref(), Some("Senior Consultant"));
        assert_eq!(record.years_experience.as_deref(), Some("15"));
        assert_eq!(record.consultation_fee.as_deref(), Some("₹1,200"));
        assert_eq!(record.city.as_deref(), Some("Bengaluru"));
        assert_eq!(record.state.as_deref(), Some("Karnataka"));
        assert_eq!(record.languages, vec!["English", "Hindi"]);
    }

    let sharma = records
        .iter()
        .find(|r| r.profile_url.ends_with("/doctor/dr-a-sharma"))
        .expect("Dr. A. Sharma missing");
    assert_eq!(sharma.name.as_deref(), Some("Dr. A. Sharma"));

    let mut reader = csv::Reader::from_path(config.output.records_csv_path()).unwrap();
    let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
    assert_eq!(headers, CSV_HEADERS);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    let languages = CSV_HEADERS.iter().position(|h| *h == "languages").unwrap();
    assert!(rows.iter().all(|row| &row[languages] == "English; Hindi"));

    let report = std::fs::read_to_string(config.output.summary_path()).unwrap();
    assert!(report.contains("# Profile Harvest Summary"));
}

#[tokio::test]
async fn test_timed_out_profile_is_retried_then_recorded_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        LISTING_PATH,
        listing_page(&["dr-a-sharma", "dr-slow"], None),
    )
    .await;
    mount_page_expecting(&server, "/doctor/dr-a-sharma", profile_page("Dr. A. Sharma"), 1).await;
    Mock::given(method("GET"))
        .and(path("/doctor/dr-slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(profile_page("Dr. Slow"))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let (config, hash) = load_test_config(&server, dir.path(), "navigation-timeout = 300");
    let summary = Coordinator::new(config.clone(), hash.clone(), true)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.extraction_failed, 1);
    assert_eq!(summary.debug_snapshots, 1);
    assert!(config.output.debug_dir().join("dr-slow.html").exists());

    let records = read_records(&config.output.records_jsonl_path());
    assert_eq!(records.len(), 1);
    assert!(records[0].profile_url.ends_with("/doctor/dr-a-sharma"));

    let failures_path = summary.failures_csv.clone().expect("No failures file");
    let mut reader = csv::Reader::from_path(&failures_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0][0].ends_with("/doctor/dr-slow"));
    assert!(!rows[0][1].is_empty());
    assert!(!rows[0][2].is_empty());
}

#[tokio::test]
async fn test_missing_profile_is_an_extraction_failure() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, LISTING_PATH, listing_page(&["dr-gone"], None)).await;
    Mock::given(method("GET"))
        .and(path("/doctor/dr-gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let (config, hash) = load_test_config(&server, dir.path(), "");
    let summary = Coordinator::new(config.clone(), hash, true)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.extraction_failed, 1);
    assert!(summary.failures[0].error.contains("404"));
    assert!(read_records(&config.output.records_jsonl_path()).is_empty());
}

#[tokio::test]
async fn test_unreachable_listing_aborts_with_snapshot() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (config, hash) = load_test_config(&server, dir.path(), "");
    let result = Coordinator::new(config.clone(), hash, true).run().await;

    assert!(matches!(
        result,
        Err(HarvestError::ListingUnreachable { .. })
    ));
    assert!(config
        .output
        .debug_dir()
        .join("listing-page-error.html")
        .exists());
    assert!(config.output.progress_path().exists());
    assert!(!config.output.records_jsonl_path().exists());
}

#[tokio::test]
async fn test_limit_caps_discovered_urls() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        LISTING_PATH,
        listing_page(&["dr-a", "dr-b", "dr-c", "dr-d"], None),
    )
    .await;
    mount_page_expecting(&server, "/doctor/dr-a", profile_page("Dr. A"), 1).await;
    mount_page_expecting(&server, "/doctor/dr-b", profile_page("Dr. B"), 1).await;
    mount_page_expecting(&server, "/doctor/dr-c", profile_page("Dr. C"), 0).await;
    mount_page_expecting(&server, "/doctor/dr-d", profile_page("Dr. D"), 0).await;

    let (config, hash) = load_test_config(&server, dir.path(), "target-count = 2");
    let summary = Coordinator::new(config.clone(), hash, true)
        .run()
        .await
        .expect("Harvest failed");

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.succeeded, 2);
}
