use crate::extract::normalize_text;
use scraper::{ElementRef, Html, Selector};

/// A single match expression against a rendered document
///
/// A locator is a CSS selector plus an optional case-insensitive "has text"
/// filter. A selector that fails to parse matches nothing; evaluation never
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub css: &'static str,
    pub has_text: Option<&'static str>,
}

impl Locator {
    pub const fn css(css: &'static str) -> Self {
        Self {
            css,
            has_text: None,
        }
    }

    pub const fn with_text(css: &'static str, text: &'static str) -> Self {
        Self {
            css,
            has_text: Some(text),
        }
    }

    /// Returns every element matching this locator in document order
    pub fn select<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        let Ok(selector) = Selector::parse(self.css) else {
            tracing::debug!("Unparseable selector skipped: {}", self.css);
            return Vec::new();
        };

        document
            .select(&selector)
            .filter(|element| self.text_filter_matches(element))
            .collect()
    }

    /// Returns the first element that a user could click: visible and enabled
    pub fn first_actionable<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.select(document)
            .into_iter()
            .find(|element| is_visible(element) && is_enabled(element))
    }

    fn text_filter_matches(&self, element: &ElementRef) -> bool {
        match self.has_text {
            None => true,
            Some(needle) => element_text(element)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.has_text {
            Some(text) => write!(f, "{}:has-text(\"{}\")", self.css, text),
            None => f.write_str(self.css),
        }
    }
}

/// Normalized text content of an element
pub fn element_text(element: &ElementRef) -> String {
    normalize_text(&element.text().collect::<Vec<_>>().join(" "))
}

/// Whether an element is rendered, judged from its own attributes
pub fn is_visible(element: &ElementRef) -> bool {
    let value = element.value();
    if value.attr("hidden").is_some() || value.attr("aria-hidden") == Some("true") {
        return false;
    }

    match value.attr("style") {
        Some(style) => {
            let style: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase();
            !style.contains("display:none") && !style.contains("visibility:hidden")
        }
        None => true,
    }
}

/// Whether an element accepts interaction
pub fn is_enabled(element: &ElementRef) -> bool {
    let value = element.value();
    value.attr("disabled").is_none() && value.attr("aria-disabled") != Some("true")
}

/// Finds the navigation target behind the first actionable match that has one
///
/// Anchors contribute their `href`, other controls a `data-href`. Controls
/// whose behaviour lives in script have no target and are passed over.
pub fn click_target(html: &str, locator: &Locator) -> Option<String> {
    let document = Html::parse_document(html);

    locator
        .select(&document)
        .into_iter()
        .filter(|element| is_visible(element) && is_enabled(element))
        .find_map(|element| {
            let value = element.value();
            value
                .attr("href")
                .or_else(|| value.attr("data-href"))
                .map(str::to_string)
        })
}
