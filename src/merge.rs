//! Snapshot merging
//!
//! A run never edits the previous snapshot in place. It folds the freshly
//! classified entries into a copy keyed by name and returns a new [`Snapshot`]:
//!
//! - names only in the prior snapshot are carried forward untouched
//! - names only in the harvest are inserted as-is
//! - names in both are reconciled field by field (see [`reconcile`])
//!
//! Duplicate names inside one harvest go through the same reconciliation, so the
//! batch order only matters for text fields (last non-empty wins) and for the
//! category when two different specific labels compete (first one wins).

use crate::entry::Entry;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The full dataset as of one run, keyed and ordered by entry name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, Entry>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries.into_values().collect()
    }
}

impl FromIterator<Entry> for Snapshot {
    /// Builds a snapshot by merging the entries into an empty one.
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        merge(Snapshot::new(), iter).snapshot
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Names that did not exist in the prior snapshot.
    pub inserted: usize,
    /// Prior names that received at least one incoming entry.
    pub updated: usize,
    /// Prior names absent from the harvest.
    pub carried_forward: usize,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub snapshot: Snapshot,
    pub stats: MergeStats,
}

/// Folds `incoming` into `prior`.
pub fn merge(prior: Snapshot, incoming: impl IntoIterator<Item = Entry>) -> MergeOutcome {
    let prior_len = prior.len();
    let mut entries = prior.entries;
    let mut touched_prior: BTreeSet<String> = BTreeSet::new();
    let mut new_names: BTreeSet<String> = BTreeSet::new();

    for entry in incoming {
        match entries.get_mut(&entry.name) {
            Some(existing) => {
                if !new_names.contains(&entry.name) {
                    touched_prior.insert(entry.name.clone());
                }
                reconcile(existing, entry);
            }
            None => {
                new_names.insert(entry.name.clone());
                entries.insert(entry.name.clone(), entry);
            }
        }
    }

    let stats = MergeStats {
        inserted: new_names.len(),
        updated: touched_prior.len(),
        carried_forward: prior_len - touched_prior.len(),
    };
    debug!(
        inserted = stats.inserted,
        updated = stats.updated,
        carried_forward = stats.carried_forward,
        "Merged snapshot"
    );

    MergeOutcome {
        snapshot: Snapshot { entries },
        stats,
    }
}

/// Reconciles `newer` into `existing`, which must share its name.
///
/// Sets are unioned, counters take the maximum, text fields take the newer value
/// when it is non-empty, and a default category yields to a specific one but never
/// the other way round.
pub fn reconcile(existing: &mut Entry, newer: Entry) {
    debug_assert_eq!(existing.name, newer.name);

    existing.keywords.extend(newer.keywords);
    existing.signals.extend(newer.signals);
    existing.techstack.extend(newer.techstack);

    existing.stars = existing.stars.max(newer.stars);
    existing.forks = existing.forks.max(newer.forks);

    if existing.category.is_default() && !newer.category.is_default() {
        existing.category = newer.category;
    }

    if !newer.description.is_empty() {
        existing.description = newer.description;
    }
    if !newer.url.is_empty() {
        existing.url = newer.url;
    }
    if !newer.readme_text.is_empty() {
        existing.readme_text = newer.readme_text;
    }
}
