//! Ordered, fault-tolerant field resolution
//!
//! Target-site markup is not under our control, so every semantic field is
//! resolved through a ranked list of strategies. Strategies are evaluated
//! lazily in order; the first one producing an acceptable value wins and a
//! strategy that matches nothing simply hands over to the next.

use crate::browser::{element_text, Locator};
use crate::extract::text::normalize_non_empty;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A single strategy for recovering a field from a document
pub trait Matcher {
    /// First normalized, non-empty value this strategy produces
    fn try_match(&self, document: &Html) -> Option<String>;

    /// Every normalized, non-empty value this strategy produces
    fn try_match_all(&self, document: &Html) -> Vec<String>;
}

impl Matcher for Locator {
    fn try_match(&self, document: &Html) -> Option<String> {
        self.select(document)
            .first()
            .and_then(|element| normalize_non_empty(&element_text(element)))
    }

    fn try_match_all(&self, document: &Html) -> Vec<String> {
        self.select(document)
            .iter()
            .filter_map(|element| normalize_non_empty(&element_text(element)))
            .collect()
    }
}

/// Resolves a scalar field: first strategy whose value passes `accept`
pub fn first_match<M: Matcher>(
    strategies: &[M],
    document: &Html,
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    strategies
        .iter()
        .filter_map(|strategy| strategy.try_match(document))
        .find(|value| accept(value))
}

/// Resolves a list field
///
/// The first strategy that yields at least one value of `min_len` characters
/// or more wins. Its values are deduplicated preserving first-seen order.
pub fn collect_all<M: Matcher>(strategies: &[M], document: &Html, min_len: usize) -> Vec<String> {
    for strategy in strategies {
        let values: Vec<String> = strategy
            .try_match_all(document)
            .into_iter()
            .filter(|value| value.chars().count() >= min_len)
            .collect();

        if !values.is_empty() {
            return dedup_preserving_order(values);
        }
    }

    Vec::new()
}

/// Every raw href matched by any locator, in locator then document order
pub fn all_hrefs(locators: &[Locator], document: &Html) -> Vec<String> {
    locators
        .iter()
        .flat_map(|locator| {
            locator
                .select(document)
                .into_iter()
                .filter_map(|element| element.value().attr("href").map(str::to_string))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Removes later duplicates, keeping the first occurrence
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// A regex recovering a field from free page text
///
/// The first capture group is the value; a pattern without groups yields the
/// whole match.
pub struct PatternRule {
    pub regex: &'static LazyLock<Regex>,
}

impl PatternRule {
    pub fn try_match(&self, text: &str) -> Option<String> {
        let captures = self.regex.captures(text)?;
        let value = captures.get(1).or_else(|| captures.get(0))?;
        normalize_non_empty(value.as_str())
    }
}

/// First capture across an ordered list of patterns
pub fn first_pattern(rules: &[PatternRule], text: &str) -> Option<String> {
    rules.iter().find_map(|rule| rule.try_match(text))
}
