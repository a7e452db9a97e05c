//! Shared fixtures: mock site pages and config files

use profile_harvest::config::{load_config_with_hash, Config};
use profile_harvest::Record;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LISTING_PATH: &str = "/best-oncologist-in-india";

/// Writes a config file pointing at `server` and loads it back
///
/// `extra_crawler` is appended to the `[crawler]` table.
pub fn load_test_config(server: &MockServer, dir: &Path, extra_crawler: &str) -> (Config, String) {
    let extra_crawler = if extra_crawler.contains("navigation-timeout") {
        extra_crawler.to_string()
    } else {
        format!("navigation-timeout = 2000\n{}", extra_crawler)
    };

    let toml = format!(
        r#"
[site]
listing-url = "{}{}"
source-tag = "zenonco"

[crawler]
concurrency = 2
max-retries = 3
retry-base-delay = 10
min-delay = 0
max-delay = 0
idle-timeout = 100
checkpoint-interval = 1
{}

[output]
directory = "{}"
records-jsonl = "zenonco_oncologists.jsonl"
records-csv = "zenonco_oncologists.csv"
"#,
        server.uri(),
        LISTING_PATH,
        extra_crawler,
        dir.join("output").display()
    );

    let config_path = dir.join("harvest.toml");
    std::fs::write(&config_path, toml).expect("Failed to write config");
    load_config_with_hash(&config_path).expect("Failed to load config")
}

/// Serves `body` as HTML at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Serves `body` at `route`, expecting exactly `hits` requests
pub async fn mount_page_expecting(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// A listing page linking to `/doctor/<slug>` for each slug
pub fn listing_page(slugs: &[&str], next: Option<&str>) -> String {
    let cards: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<div class="doctor-card"><a href="/doctor/{0}">{0}</a></div>"#,
                slug
            )
        })
        .collect();
    let pager = next
        .map(|href| format!(r#"<nav><a href="{}">Next</a></nav>"#, href))
        .unwrap_or_default();

    format!(
        "<html><head><title>Best Oncologists</title></head><body>{}{}</body></html>",
        cards, pager
    )
}

/// A profile page with the usual sections filled in
pub fn profile_page(name: &str) -> String {
    format!(
        r#"<html><head><title>{0}</title></head><body>
        <h1 class="doctor-name">{0}</h1>
        <p class="designation">Senior Consultant</p>
        <div class="address">12 MG Road, Bengaluru, Karnataka</div>
        <ul class="language"><li>English</li><li>Hindi</li></ul>
        <p>MBBS, MD (Oncology). 15 years experience. Consultation fee: Rs. 1,200</p>
        </body></html>"#,
        name
    )
}

/// Parses every line of a JSONL file
pub fn read_records(path: &Path) -> Vec<Record> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSONL line"))
        .collect()
}
