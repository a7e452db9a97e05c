use crate::UrlError;
use url::Url;

/// Schemes that never lead to a document
const PSEUDO_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves an anchor href against the page it was found on
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: and data: pseudo-URLs
/// - any href carrying a fragment (including same-page anchors)
/// - anything that does not resolve to an http(s) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use profile_harvest::url::resolve_href;
///
/// let base = Url::parse("https://example.com/doctors").unwrap();
/// let resolved = resolve_href("/doctor/a-sharma", &base).unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/doctor/a-sharma");
/// assert!(resolve_href("javascript:void(0)", &base).is_none());
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.contains('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if PSEUDO_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// Parses a string that must already be an absolute http(s) URL
pub fn parse_absolute(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
