//! URL handling module for Profile-Harvest
//!
//! This module turns raw anchor hrefs into candidate detail-page URLs:
//! resolution against the page they appeared on, host matching, detail-path
//! filtering, and slug generation for debug artifacts.

mod domain;
mod matcher;
mod resolve;
mod slug;

use crate::config::SiteConfig;
use crate::UrlError;
use ::url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use matcher::matches_wildcard;
pub use resolve::{parse_absolute, resolve_href};
pub use slug::generate_slug;

/// Decides whether an href is a detail-page candidate
///
/// A candidate must resolve to an absolute http(s) URL without a fragment,
/// live on a host matching the allowed pattern, and carry one of the
/// configured detail-path markers.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    host_pattern: String,
    markers: Vec<String>,
}

impl CandidateFilter {
    /// Creates a filter from an explicit host pattern and marker list
    pub fn new(host_pattern: impl Into<String>, markers: Vec<String>) -> Self {
        Self {
            host_pattern: host_pattern.into().to_lowercase(),
            markers,
        }
    }

    /// Builds the filter for a site, defaulting the host pattern to the
    /// listing page host
    pub fn for_site(site: &SiteConfig) -> Result<Self, UrlError> {
        let listing = parse_absolute(&site.listing_url)?;
        let host_pattern = match &site.allowed_domain {
            Some(pattern) => pattern.clone(),
            None => extract_domain(&listing).ok_or(UrlError::MissingDomain)?,
        };

        Ok(Self::new(host_pattern, site.detail_path_markers.clone()))
    }

    /// Returns the absolute candidate URL for an href, or None if rejected
    pub fn accept(&self, href: &str, base_url: &Url) -> Option<String> {
        // Markers are checked against the raw href first, the same way the
        // listing markup exposes them.
        if !self.has_marker(href) {
            return None;
        }

        let absolute = resolve_href(href, base_url)?;
        let host = extract_domain(&absolute)?;
        if !matches_wildcard(&self.host_pattern, &host) {
            return None;
        }

        if !self.has_marker(absolute.path()) {
            return None;
        }

        Some(absolute.to_string())
    }

    fn has_marker(&self, candidate: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| candidate.contains(marker.as_str()))
    }
}
