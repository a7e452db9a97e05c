use scraper::{ElementRef, Html, Selector};

/// Elements whose text never reaches the reader
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template"];

/// Trims and collapses every internal whitespace run to a single space
///
/// Idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
///
/// # Examples
///
/// ```
/// use profile_harvest::normalize_text;
///
/// assert_eq!(normalize_text("  Dr.\n\tA.   Sharma "), "Dr. A. Sharma");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes and returns None for empty results
pub fn normalize_non_empty(text: &str) -> Option<String> {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Truncates to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}

/// Normalized visible text of the document body
///
/// Script, style and template contents are skipped. Falls back to the whole
/// document when there is no body element.
pub fn page_text(document: &Html) -> String {
    let mut raw = String::new();

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());

    match body {
        Some(body) => push_text(body, &mut raw),
        None => push_text(document.root_element(), &mut raw),
    }

    normalize_text(&raw)
}

fn push_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !NON_RENDERED.contains(&child_element.value().name()) {
                push_text(child_element, out);
            }
        }
    }
}
