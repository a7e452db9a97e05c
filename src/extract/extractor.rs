//! Record extraction from a single detail page
//!
//! Navigation is the only step that can fail. Every field is resolved
//! independently and a miss leaves the field empty.

use crate::browser::PageSession;
use crate::extract::patterns;
use crate::extract::record::{Record, RAW_SNAPSHOT_MAX};
use crate::extract::strategies;
use crate::extract::text::{page_text, truncate_chars};
use crate::extract::waterfall::{collect_all, first_match};
use crate::NavigationError;
use scraper::Html;
use std::time::Duration;

const NAME_MIN_CHARS: usize = 3;
const ABOUT_MIN_CHARS: usize = 51;
const HOSPITAL_MIN_CHARS: usize = 4;
const LIST_MIN_CHARS: usize = 2;

/// Turns detail pages into candidate records
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    source_tag: String,
    listing_url: String,
    navigation_timeout: Duration,
    idle_timeout: Duration,
}

impl RecordExtractor {
    pub fn new(
        source_tag: impl Into<String>,
        listing_url: impl Into<String>,
        navigation_timeout: Duration,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            source_tag: source_tag.into(),
            listing_url: listing_url.into(),
            navigation_timeout,
            idle_timeout,
        }
    }

    /// Loads `url` into the page and extracts a record from it
    ///
    /// # Errors
    ///
    /// Returns a `NavigationError` only when the page cannot be loaded or
    /// read. An idle wait that times out is not an error; extraction
    /// proceeds with whatever has loaded.
    pub async fn extract(
        &self,
        page: &mut dyn PageSession,
        url: &str,
    ) -> Result<Record, NavigationError> {
        page.goto(url, self.navigation_timeout).await?;

        if !page.wait_for_idle(self.idle_timeout).await {
            tracing::warn!(url = %url, "Page did not become idle, extracting partial content");
        }

        let html = page.content().await?;
        Ok(self.extract_from_html(url, &html))
    }

    /// Extracts a record from an already loaded document
    pub fn extract_from_html(&self, profile_url: &str, html: &str) -> Record {
        let document = Html::parse_document(html);
        let text = page_text(&document);

        let mut record = Record::new(&self.source_tag, &self.listing_url, profile_url);

        if !text.is_empty() {
            record.raw_text_snapshot = Some(truncate_chars(&text, RAW_SNAPSHOT_MAX));
        }

        record.name = first_match(strategies::NAME, &document, |name| {
            name.chars().count() >= NAME_MIN_CHARS
        });
        record.designation = first_match(strategies::DESIGNATION, &document, |_| true);
        record.specialty = first_match(strategies::SPECIALTY, &document, |specialty| {
            record.designation.as_deref() != Some(specialty)
        });

        record.clinic_address = first_match(strategies::ADDRESS, &document, |_| true);
        if let Some(address) = &record.clinic_address {
            let (city, state) = patterns::city_and_state(address);
            record.city = city;
            record.state = state;
        }

        record.phone = first_match(strategies::PHONE, &document, patterns::looks_like_phone);
        record.rating = first_match(strategies::RATING, &document, patterns::contains_digit);
        record.reviews_count =
            first_match(strategies::REVIEWS_COUNT, &document, patterns::contains_digit);
        record.about = first_match(strategies::ABOUT, &document, |about| {
            about.chars().count() >= ABOUT_MIN_CHARS
        });
        record.availability = first_match(strategies::AVAILABILITY, &document, |_| true);

        record.years_experience = patterns::years_experience(&text);
        record.consultation_fee = patterns::consultation_fee(&text);
        record.qualifications = patterns::qualifications(&text);

        record.sub_specialties = collect_all(strategies::SUB_SPECIALTIES, &document, LIST_MIN_CHARS);
        record.hospital_affiliations =
            collect_all(strategies::HOSPITALS, &document, HOSPITAL_MIN_CHARS);
        record.languages = collect_all(strategies::LANGUAGES, &document, LIST_MIN_CHARS);
        record.education = collect_all(strategies::EDUCATION, &document, LIST_MIN_CHARS);
        record.awards_memberships = collect_all(strategies::AWARDS, &document, LIST_MIN_CHARS);
        record.conditions_treated = collect_all(strategies::CONDITIONS, &document, LIST_MIN_CHARS);
        record.procedures = collect_all(strategies::PROCEDURES, &document, LIST_MIN_CHARS);

        tracing::debug!(
            url = %profile_url,
            name = ?record.name,
            "Extracted profile fields"
        );

        record
    }
}
