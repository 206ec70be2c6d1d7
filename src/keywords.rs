//! Keyword extraction
//!
//! Keywords are the raw lowercase tokens of a description. The extractor itself
//! never filters; [`filter_stop_words`] is a separate, optional pass used when an
//! entry should store a tighter keyword field.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "shall", "should", "may", "might", "must", "can", "could",
];

/// Tokens at or below this length are dropped by the strict pass.
const MIN_STRICT_LEN: usize = 2;

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"\b[a-z0-9][a-z0-9\-]*\b").expect("Invalid keyword token regex")
    })
}

/// Lowercase alphanumeric/hyphen runs of `description`, deduplicated.
pub fn extract_keywords(description: &str) -> BTreeSet<String> {
    if description.trim().is_empty() {
        return BTreeSet::new();
    }

    let lowered = description.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Removes common English words and very short tokens.
pub fn filter_stop_words(keywords: &BTreeSet<String>) -> BTreeSet<String> {
    keywords
        .iter()
        .filter(|k| k.len() > MIN_STRICT_LEN && !STOP_WORDS.contains(&k.as_str()))
        .cloned()
        .collect()
}

/// Parses a comma-joined keyword field as written to snapshot artifacts.
pub fn parse_joined(field: &str) -> BTreeSet<String> {
    field
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

pub fn join(keywords: &BTreeSet<String>) -> String {
    keywords.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}
