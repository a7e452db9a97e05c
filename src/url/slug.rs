use url::Url;

const MAX_FALLBACK_LEN: usize = 50;

/// Derives a file-system safe slug for a URL
///
/// The last non-empty path segment wins. Otherwise the fallback label is
/// lowercased with runs of other characters collapsed to `-` and capped at
/// 50 characters, and `unknown` is used when nothing usable remains.
///
/// # Examples
///
/// ```
/// use profile_harvest::url::generate_slug;
///
/// assert_eq!(generate_slug("https://example.com/doctor/dr-a-sharma/", ""), "dr-a-sharma");
/// assert_eq!(generate_slug("https://example.com/", "Listing Page"), "listing-page");
/// assert_eq!(generate_slug("not a url", ""), "unknown");
/// ```
pub fn generate_slug(url: &str, fallback: &str) -> String {
    let segment = Url::parse(url).ok().and_then(|parsed| {
        parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(sanitize))
    });

    match segment {
        Some(segment) if !segment.is_empty() => segment,
        _ => {
            let label = slugify(fallback);
            if label.is_empty() {
                "unknown".to_string()
            } else {
                label
            }
        }
    }
}

fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

fn slugify(label: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = false;

    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.chars().take(MAX_FALLBACK_LEN).collect()
}
