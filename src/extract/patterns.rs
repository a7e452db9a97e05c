//! Regex fallbacks run against full page text
//!
//! Some fields are easier to recover from prose than from structure. Each
//! field has an ordered list of patterns; the first capture wins.

use crate::extract::text::normalize_text;
use crate::extract::waterfall::{dedup_preserving_order, first_pattern, PatternRule};
use regex::Regex;
use std::sync::LazyLock;

static EXPERIENCE_YEARS_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\+?\s*years?\s*(?:of\s+)?experience").unwrap());
static EXPERIENCE_LABEL_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)experience[:\s]+(\d+)").unwrap());
static EXPERIENCE_BARE_YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\+?\s*years?\b").unwrap());

static FEE_RUPEE_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹\s*(\d[\d,]*)").unwrap());
static FEE_RS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bRs\.?\s*(\d[\d,]*)").unwrap());
static FEE_INR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bINR\s*(\d[\d,]*)").unwrap());
static FEE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)fee[:\s]+₹?\s*(\d[\d,]*)").unwrap());

static QUALIFICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:MBBS|MD|DM|MS|MCh|FRCS|MRCP)\b[^.]*").unwrap());

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

static EXPERIENCE: &[PatternRule] = &[
    PatternRule {
        regex: &EXPERIENCE_YEARS_FIRST,
    },
    PatternRule {
        regex: &EXPERIENCE_LABEL_FIRST,
    },
    PatternRule {
        regex: &EXPERIENCE_BARE_YEARS,
    },
];

static FEE: &[PatternRule] = &[
    PatternRule {
        regex: &FEE_RUPEE_SIGN,
    },
    PatternRule { regex: &FEE_RS },
    PatternRule { regex: &FEE_INR },
    PatternRule { regex: &FEE_LABEL },
];

/// Years of experience as a bare number
pub fn years_experience(text: &str) -> Option<String> {
    first_pattern(EXPERIENCE, text)
}

/// Consultation fee, canonicalized to `₹N`
pub fn consultation_fee(text: &str) -> Option<String> {
    first_pattern(FEE, text).map(|amount| format!("₹{}", amount))
}

/// Degree mentions, each running to the next period
pub fn qualifications(text: &str) -> Vec<String> {
    let found = QUALIFICATION
        .find_iter(text)
        .map(|m| normalize_text(m.as_str()))
        .filter(|q| !q.is_empty())
        .collect();

    dedup_preserving_order(found)
}

/// Splits an address into (city, state)
///
/// Comma-separated parts are stripped of digits; parts that start with an
/// uppercase letter are candidates. The last two candidates are city and
/// state; a single candidate is the city.
pub fn city_and_state(address: &str) -> (Option<String>, Option<String>) {
    let places: Vec<String> = address
        .split(',')
        .map(|part| normalize_text(&part.replace(|c: char| c.is_ascii_digit(), "")))
        .map(|part| part.trim_matches(|c: char| c == '-' || c == '.').trim().to_string())
        .filter(|part| part.chars().next().is_some_and(char::is_uppercase))
        .collect();

    match places.as_slice() {
        [] => (None, None),
        [city] => (Some(city.clone()), None),
        [.., city, state] => (Some(city.clone()), Some(state.clone())),
    }
}

pub fn contains_digit(text: &str) -> bool {
    DIGIT.is_match(text)
}

/// Whether the text carries a full phone number (10+ digits, any separators)
pub fn looks_like_phone(text: &str) -> bool {
    text.chars().filter(char::is_ascii_digit).count() >= 10
}
