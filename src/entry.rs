//! Harvested and classified records

use crate::classify::{classify, resolve_techstack, Category, Evidence, TechStack};
use crate::keywords::{extract_keywords, filter_stop_words};
use crate::signals::{Signal, SignalExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One record as delivered by a harvester, before classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default)]
    pub readme_text: String,
    /// Pre-extracted symbol string, e.g. the emoji legend of a curated listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<String>,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// A classified record; the unit stored in a [`crate::merge::Snapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub forks: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub readme_text: String,
    #[serde(default, deserialize_with = "crate::signals::deserialize_stored")]
    pub signals: BTreeSet<Signal>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default, deserialize_with = "crate::classify::category::deserialize_stored")]
    pub category: Category,
    #[serde(default, deserialize_with = "crate::classify::techstack::deserialize_stored")]
    pub techstack: BTreeSet<TechStack>,
}

/// Runs signal and keyword extraction, then both resolvers, over raw entries.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    extractor: SignalExtractor,
    strict_keywords: bool,
}

impl Enricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store only stop-word-filtered keywords. Classification still sees all of them.
    pub fn with_strict_keywords(mut self, strict: bool) -> Self {
        self.strict_keywords = strict;
        self
    }

    pub fn enrich(&self, raw: RawEntry) -> Entry {
        let signals = self.extractor.extract_entry(
            &raw.description,
            &raw.readme_text,
            raw.markers.as_deref(),
        );
        let keywords = extract_keywords(&raw.description);

        let evidence = Evidence::new(&signals, &keywords);
        let category = classify(&evidence);
        let techstack = resolve_techstack(&evidence);

        debug!(
            name = %raw.name,
            category = %category,
            signals = signals.len(),
            keywords = keywords.len(),
            "Classified entry"
        );

        let keywords = if self.strict_keywords {
            filter_stop_words(&keywords)
        } else {
            keywords
        };

        Entry {
            name: raw.name,
            description: raw.description,
            url: raw.url,
            stars: raw.stars,
            forks: raw.forks,
            readme_text: raw.readme_text,
            signals,
            keywords,
            category,
            techstack,
        }
    }

    pub fn enrich_all(&self, raw: Vec<RawEntry>) -> Vec<Entry> {
        raw.into_iter().map(|r| self.enrich(r)).collect()
    }
}
