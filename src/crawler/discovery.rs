//! Listing traversal and detail-URL discovery
//!
//! The engine walks the listing surface as a small state machine:
//! load the listing, extract links, then advance by clicking "next", else
//! "load more", else scrolling and re-extracting. It stops when an advance
//! yields nothing new, when the page cap is hit, or when enough URLs have
//! been collected.

use crate::browser::{Locator, PageSession};
use crate::config::Config;
use crate::extract::strategies;
use crate::extract::waterfall::all_hrefs;
use crate::output::{save_debug_html, LISTING_ERROR_SLUG};
use crate::url::CandidateFilter;
use crate::{HarvestError, NavigationError};
use scraper::Html;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Discovery-ordered set of candidate URLs
///
/// Owned by the discovery loop; inserting a URL already present is a no-op.
#[derive(Debug, Default)]
pub struct UrlAccumulator {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl UrlAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL; returns false if it was already present
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// The collected URLs in discovery order, truncated to `limit`
    pub fn into_urls(self, limit: Option<usize>) -> Vec<String> {
        let mut urls = self.urls;
        if let Some(limit) = limit {
            urls.truncate(limit);
        }
        urls
    }
}

/// How the last pagination attempt went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advance {
    Clicked(&'static str),
    Scrolled { new_urls: usize },
}

/// Produces the candidate detail-URL list from the listing page
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    listing_url: String,
    filter: CandidateFilter,
    max_pages: u32,
    target_count: Option<usize>,
    navigation_timeout: Duration,
    idle_timeout: Duration,
    debug_dir: PathBuf,
}

impl DiscoveryEngine {
    pub fn new(config: &Config, filter: CandidateFilter) -> Self {
        Self {
            listing_url: config.site.listing_url.clone(),
            filter,
            max_pages: config.crawler.max_listing_pages,
            target_count: config.crawler.target_count,
            navigation_timeout: config.crawler.navigation_timeout(),
            idle_timeout: config.crawler.idle_timeout(),
            debug_dir: config.output.debug_dir(),
        }
    }

    /// Traverses the listing and returns the discovered URLs
    ///
    /// # Errors
    ///
    /// Only a listing page that cannot be loaded at all is fatal. A
    /// diagnostic snapshot is saved before the error is returned. Errors
    /// after the first load end the traversal early with what was found.
    pub async fn discover(&self, page: &mut dyn PageSession) -> Result<Vec<String>, HarvestError> {
        tracing::info!("Discovering profile URLs from {}", self.listing_url);

        if let Err(e) = page.goto(&self.listing_url, self.navigation_timeout).await {
            tracing::error!("Failed to load listing page {}: {}", self.listing_url, e);
            self.save_listing_snapshot(page, &e).await;
            return Err(HarvestError::ListingUnreachable {
                url: self.listing_url.clone(),
                source: e,
            });
        }
        self.settle(page).await;

        let mut accumulator = UrlAccumulator::new();
        let mut iteration: u32 = 0;

        loop {
            iteration += 1;
            let found = self.extract_links(page, &mut accumulator).await;
            tracing::info!(
                "Listing page {}: {} new profile URLs (total: {})",
                iteration,
                found,
                accumulator.len()
            );

            if self.target_reached(&accumulator) {
                tracing::info!("Reached target of {} URLs", accumulator.len());
                break;
            }

            if iteration >= self.max_pages {
                tracing::warn!("Listing page cap of {} reached", self.max_pages);
                break;
            }

            match self.advance(page, &mut accumulator).await {
                Advance::Clicked(control) => {
                    tracing::debug!("Advanced listing via {}", control);
                }
                Advance::Scrolled { new_urls: 0 } => {
                    tracing::info!("No more pages or content found");
                    break;
                }
                Advance::Scrolled { new_urls } => {
                    tracing::debug!("Scrolling revealed {} new URLs", new_urls);
                    if self.target_reached(&accumulator) {
                        break;
                    }
                }
            }
        }

        let urls = accumulator.into_urls(self.target_count);
        tracing::info!("Discovered {} unique profile URLs", urls.len());
        Ok(urls)
    }

    fn target_reached(&self, accumulator: &UrlAccumulator) -> bool {
        self.target_count
            .is_some_and(|target| accumulator.len() >= target)
    }

    /// Tries "next", then "load more", then scroll + re-extract
    async fn advance(
        &self,
        page: &mut dyn PageSession,
        accumulator: &mut UrlAccumulator,
    ) -> Advance {
        if self.click_first(page, strategies::PAGINATION_NEXT).await {
            self.settle(page).await;
            return Advance::Clicked("next");
        }

        if self.click_first(page, strategies::LOAD_MORE).await {
            self.settle(page).await;
            return Advance::Clicked("load more");
        }

        if let Err(e) = page.scroll_to_bottom().await {
            tracing::warn!("Scroll failed: {}", e);
        }
        self.settle(page).await;

        let new_urls = self.extract_links(page, accumulator).await;
        Advance::Scrolled { new_urls }
    }

    /// Clicks the first locator that matches a visible, enabled control
    async fn click_first(&self, page: &mut dyn PageSession, locators: &[Locator]) -> bool {
        for locator in locators {
            match page.click(locator).await {
                Ok(true) => return true,
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("Clicking {} failed: {}", locator, e);
                }
            }
        }
        false
    }

    async fn settle(&self, page: &mut dyn PageSession) {
        if !page.wait_for_idle(self.idle_timeout).await {
            tracing::debug!("Listing did not become idle within {:?}", self.idle_timeout);
        }
    }

    /// Adds every accepted link on the current document; returns how many were new
    async fn extract_links(
        &self,
        page: &mut dyn PageSession,
        accumulator: &mut UrlAccumulator,
    ) -> usize {
        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Could not read listing content: {}", e);
                return 0;
            }
        };

        let base = page
            .current_url()
            .and_then(|url| Url::parse(&url).ok())
            .or_else(|| Url::parse(&self.listing_url).ok());
        let Some(base) = base else {
            return 0;
        };

        candidate_urls(&html, &base, &self.filter)
            .into_iter()
            .filter(|url| accumulator.insert(url.clone()))
            .count()
    }

    async fn save_listing_snapshot(&self, page: &mut dyn PageSession, error: &NavigationError) {
        let html = match page.content().await {
            Ok(html) => html,
            Err(_) => format!("<!-- {} -->\n", error),
        };

        if let Err(e) = save_debug_html(&self.debug_dir, LISTING_ERROR_SLUG, &html) {
            tracing::warn!("Failed to save listing snapshot: {}", e);
        }
    }
}

/// Accepted candidate URLs in a document, in locator then document order
///
/// May contain duplicates; the accumulator dedups.
pub fn candidate_urls(html: &str, base: &Url, filter: &CandidateFilter) -> Vec<String> {
    let document = Html::parse_document(html);
    all_hrefs(strategies::DETAIL_LINKS, &document)
        .iter()
        .filter_map(|href| filter.accept(href, base))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::scripted::ScriptedBrowser;
    use crate::browser::Browser;
    use crate::config::parse_config;
    use tempfile::TempDir;

    const LISTING: &str = "https://zenonco.io/best-oncologist-in-india";

    fn engine(dir: &TempDir, target: Option<usize>) -> DiscoveryEngine {
        let toml = format!(
            r#"
            [site]
            listing-url = "{}"

            [crawler]
            max-listing-pages = 5

            [output]
            directory = "{}"
            "#,
            LISTING,
            dir.path().display()
        );
        let mut config = parse_config(&toml).unwrap();
        config.crawler.target_count = target;
        let filter = CandidateFilter::for_site(&config.site).unwrap();
        DiscoveryEngine::new(&config, filter)
    }

    #[test]
    fn test_accumulator_dedups_in_order() {
        let mut acc = UrlAccumulator::new();
        assert!(acc.insert("a".to_string()));
        assert!(acc.insert("b".to_string()));
        assert!(!acc.insert("a".to_string()));
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.into_urls(Some(1)), vec!["a".to_string()]);
    }

    #[test]
    fn test_candidate_urls_filter() {
        let base = Url::parse(LISTING).unwrap();
        let filter = CandidateFilter::new("zenonco.io", vec!["/doctor/".to_string()]);
        let html = r##"
            <a href="/doctor/a">A</a>
            <a href="https://zenonco.io/doctor/b#reviews">B</a>
            <a href="https://other.com/doctor/c">C</a>
            <a href="javascript:void(0)">JS</a>
            <a href="/blog/post">Blog</a>
            <article><a href="/doctor/a">A again</a></article>
        "##;

        // Both anchors match the href locator; the article one matches twice
        let urls = candidate_urls(html, &base, &filter);
        assert_eq!(urls.len(), 3);
        assert!(urls.iter().all(|u| u == "https://zenonco.io/doctor/a"));
    }

    #[test]
    fn test_discovered_set_never_exceeds_distinct_hrefs() {
        let base = Url::parse(LISTING).unwrap();
        let filter = CandidateFilter::new("zenonco.io", vec!["/doctor/".to_string()]);
        let hrefs = ["/doctor/a", "/doctor/b", "/doctor/a", "/doctor/c", "/doctor/b"];
        let html: String = hrefs
            .iter()
            .map(|h| format!("<a href=\"{}\">x</a>", h))
            .collect();

        let mut acc = UrlAccumulator::new();
        for url in candidate_urls(&html, &base, &filter) {
            acc.insert(url);
        }

        let urls = acc.into_urls(None);
        let distinct: HashSet<&String> = urls.iter().collect();
        assert_eq!(distinct.len(), urls.len());
        assert_eq!(urls.len(), 3);
    }

    #[tokio::test]
    async fn test_two_pages_via_next() {
        let dir = TempDir::new().unwrap();
        let page2 = "https://zenonco.io/best-oncologist-in-india?page=2";
        let browser = ScriptedBrowser::new()
            .page(
                LISTING,
                r#"<a href="/doctor/a">A</a><a href="/doctor/b">B</a>
                   <a class="pager" href="?page=2">Next</a>"#,
            )
            .page(
                page2,
                r#"<a href="/doctor/b">B</a><a href="/doctor/c">C</a>"#,
            );

        let mut page = browser.new_page().await.unwrap();
        let urls = engine(&dir, None).discover(page.as_mut()).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://zenonco.io/doctor/a".to_string(),
                "https://zenonco.io/doctor/b".to_string(),
                "https://zenonco.io/doctor/c".to_string(),
            ]
        );
        assert_eq!(browser.visits(page2), 1);
    }

    #[tokio::test]
    async fn test_load_more_then_scroll() {
        let dir = TempDir::new().unwrap();
        let more = "https://zenonco.io/best-oncologist-in-india?offset=1";
        let browser = ScriptedBrowser::new()
            .page(
                LISTING,
                r#"<a href="/doctor/a">A</a>
                   <button class="load-more" data-href="?offset=1">Load More</button>"#,
            )
            .page(more, r#"<a href="/doctor/a">A</a><a href="/oncologist/b">B</a>"#)
            .after_scroll(
                more,
                r#"<a href="/doctor/a">A</a><a href="/oncologist/b">B</a><a href="/profile/c">C</a>"#,
            );

        let mut page = browser.new_page().await.unwrap();
        let urls = engine(&dir, None).discover(page.as_mut()).await.unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[2], "https://zenonco.io/profile/c");
    }

    #[tokio::test]
    async fn test_target_count_truncates() {
        let dir = TempDir::new().unwrap();
        let browser = ScriptedBrowser::new().page(
            LISTING,
            r#"<a href="/doctor/a">A</a><a href="/doctor/b">B</a><a href="/doctor/c">C</a>
               <a href="?page=2">Next</a>"#,
        );

        let mut page = browser.new_page().await.unwrap();
        let urls = engine(&dir, Some(2)).discover(page.as_mut()).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(browser.visits("https://zenonco.io/best-oncologist-in-india?page=2"), 0);
    }

    #[tokio::test]
    async fn test_page_cap_stops_cycles() {
        let dir = TempDir::new().unwrap();
        // "Next" points back at the listing itself
        let browser = ScriptedBrowser::new().page(
            LISTING,
            r#"<a href="/doctor/a">A</a><a href="/best-oncologist-in-india">Next</a>"#,
        );

        let mut page = browser.new_page().await.unwrap();
        let urls = engine(&dir, None).discover(page.as_mut()).await.unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(browser.visits(LISTING), 5);
    }

    #[tokio::test]
    async fn test_unreachable_listing_is_fatal_and_snapshotted() {
        let dir = TempDir::new().unwrap();
        let browser = ScriptedBrowser::new().failing(LISTING);

        let mut page = browser.new_page().await.unwrap();
        let result = engine(&dir, None).discover(page.as_mut()).await;

        assert!(matches!(result, Err(HarvestError::ListingUnreachable { .. })));
        assert!(dir.path().join("debug/listing-page-error.html").exists());
    }

    #[tokio::test]
    async fn test_broken_next_link_ends_traversal() {
        let dir = TempDir::new().unwrap();
        let browser = ScriptedBrowser::new().page(
            LISTING,
            r#"<a href="/doctor/a">A</a><a href="?page=404">Next</a>"#,
        );

        let mut page = browser.new_page().await.unwrap();
        let urls = engine(&dir, None).discover(page.as_mut()).await.unwrap();
        assert_eq!(urls, vec!["https://zenonco.io/doctor/a".to_string()]);
    }
}
