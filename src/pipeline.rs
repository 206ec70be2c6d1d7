//! One harvest run: load prior, harvest, classify, merge, persist

use crate::entry::Enricher;
use crate::harvest::{HarvestFailure, Harvester};
use crate::merge::{merge, MergeStats, Snapshot};
use crate::store::{
    read_prior, read_snapshot, write_snapshot, ArtifactKind, ArtifactStore, SignalEncoding,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub strict_keywords: bool,
    /// Merge and report without writing an artifact.
    pub dry_run: bool,
    /// Date stamped into the artifact name.
    pub date: NaiveDate,
}

impl RunOptions {
    pub fn today() -> Self {
        Self {
            strict_keywords: false,
            dry_run: false,
            date: chrono::Local::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: ArtifactKind,
    pub harvester: String,
    pub prior_entries: usize,
    pub harvested: usize,
    pub failures: Vec<HarvestFailure>,
    pub stats: MergeStats,
    pub total: usize,
    /// Entry count per category label in the merged snapshot.
    pub categories: BTreeMap<String, usize>,
    pub artifact: Option<PathBuf>,
    pub dry_run: bool,
}

/// Entry count per category label.
pub fn category_counts(snapshot: &Snapshot) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in snapshot.entries() {
        *counts.entry(entry.category.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

pub async fn run(
    harvester: &dyn Harvester,
    store: &ArtifactStore,
    options: &RunOptions,
) -> Result<RunSummary> {
    let kind = harvester.kind();
    info!(harvester = harvester.name(), "Starting run");

    let prior = store.load_latest(kind);
    let prior_entries = prior.len();

    let report = harvester
        .harvest()
        .await
        .with_context(|| format!("Harvest from {} failed", harvester.name()))?;
    if report.is_partial() {
        warn!(
            failures = report.failures.len(),
            "Harvest completed with failures, merging what was collected"
        );
    }
    let harvested = report.entries.len();

    let enricher = Enricher::new().with_strict_keywords(options.strict_keywords);
    let entries = enricher.enrich_all(report.entries);
    let outcome = merge(prior, entries);

    let artifact = if options.dry_run {
        info!("Dry run, not writing artifact");
        None
    } else {
        let path = store
            .save(kind, options.date, &outcome.snapshot)
            .with_context(|| format!("Failed to save snapshot to {}", store.dir().display()))?;
        info!(path = %path.display(), "Snapshot written");
        Some(path)
    };

    let summary = RunSummary {
        source: kind,
        harvester: harvester.name().to_string(),
        prior_entries,
        harvested,
        failures: report.failures,
        stats: outcome.stats,
        total: outcome.snapshot.len(),
        categories: category_counts(&outcome.snapshot),
        artifact,
        dry_run: options.dry_run,
    };
    info!(
        harvested = summary.harvested,
        inserted = summary.stats.inserted,
        updated = summary.stats.updated,
        carried_forward = summary.stats.carried_forward,
        total = summary.total,
        "Run complete"
    );
    Ok(summary)
}

#[derive(Debug, Clone, Serialize)]
pub struct OfflineMergeSummary {
    pub prior: PathBuf,
    pub incoming: PathBuf,
    pub stats: MergeStats,
    pub total: usize,
    pub categories: BTreeMap<String, usize>,
    pub output: Option<PathBuf>,
}

/// Merges two existing artifacts; `incoming` is treated as the newer one.
///
/// A missing or malformed `prior` counts as empty. `incoming` must be readable.
pub fn merge_files(
    prior: &Path,
    incoming: &Path,
    output: Option<&Path>,
    encoding: SignalEncoding,
) -> Result<(Snapshot, OfflineMergeSummary)> {
    let prior_snapshot = read_prior(prior);
    let incoming_snapshot = read_snapshot(incoming)
        .with_context(|| format!("Failed to read incoming artifact {}", incoming.display()))?;

    let outcome = merge(prior_snapshot, incoming_snapshot.into_entries());

    if let Some(output) = output {
        write_snapshot(output, &outcome.snapshot, encoding)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(path = %output.display(), entries = outcome.snapshot.len(), "Merged artifact written");
    }

    let summary = OfflineMergeSummary {
        prior: prior.to_path_buf(),
        incoming: incoming.to_path_buf(),
        stats: outcome.stats,
        total: outcome.snapshot.len(),
        categories: category_counts(&outcome.snapshot),
        output: output.map(Path::to_path_buf),
    };
    Ok((outcome.snapshot, summary))
}
