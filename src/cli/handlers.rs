//! Command handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 after logging the
//! error chain.

use super::commands::{ClassifyArgs, ConfigArgs, ListingArgs, MergeArgs, SearchArgs, StoreArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::RadarConfig;
use crate::entry::{Enricher, RawEntry};
use crate::harvest::{AwesomeListing, GithubSearch, ListingSource};
use crate::pipeline::{self, RunOptions};
use crate::store::ArtifactStore;
use anyhow::{Context, Result};
use tracing::{debug, error};

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn load_config() -> Result<RadarConfig> {
    RadarConfig::from_env().context("Invalid environment configuration")
}

fn build_store(config: &RadarConfig, args: &StoreArgs) -> ArtifactStore {
    let dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir.clone());
    ArtifactStore::new(dir)
        .with_format(args.store_format)
        .with_signal_encoding(args.signal_encoding)
}

fn run_options(args: &StoreArgs) -> RunOptions {
    RunOptions {
        strict_keywords: args.strict_keywords,
        dry_run: args.dry_run,
        ..RunOptions::today()
    }
}

pub async fn handle_search(args: &SearchArgs) -> i32 {
    exit_code(search(args).await)
}

async fn search(args: &SearchArgs) -> Result<()> {
    let mut config = load_config()?;
    if !args.keywords.is_empty() {
        config.search_terms = args.keywords.clone();
    }
    if let Some(min_stars) = args.min_stars {
        config.min_stars = i64::try_from(min_stars).context("--min-stars is too large")?;
    }
    if let Some(min_forks) = args.min_forks {
        config.min_forks = i64::try_from(min_forks).context("--min-forks is too large")?;
    }
    if args.no_readme {
        config.fetch_readme = false;
    }
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);

    let harvester = GithubSearch::new(config.github_options())
        .context("Failed to initialize GitHub search client")?;
    let store = build_store(&config, &args.store);

    let summary = pipeline::run(&harvester, &store, &run_options(&args.store)).await?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.store.format));
    println!("{}", formatter.format_run(&summary)?);
    Ok(())
}

pub async fn handle_listing(args: &ListingArgs) -> i32 {
    exit_code(listing(args).await)
}

async fn listing(args: &ListingArgs) -> Result<()> {
    let config = load_config()?;
    config.validate().context("Invalid configuration")?;

    let location = args.source.as_deref().unwrap_or(&config.listing_url);
    let source = ListingSource::parse(location);
    let harvester = AwesomeListing::new(source, config.request_timeout())
        .context("Failed to initialize listing client")?;
    let store = build_store(&config, &args.store);

    let summary = pipeline::run(&harvester, &store, &run_options(&args.store)).await?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.store.format));
    println!("{}", formatter.format_run(&summary)?);
    Ok(())
}

pub async fn handle_classify(args: &ClassifyArgs) -> i32 {
    exit_code(classify(args).await)
}

async fn classify(args: &ClassifyArgs) -> Result<()> {
    let mut raw = RawEntry::new("", args.text.as_str(), "");
    if let Some(path) = &args.readme {
        raw.readme_text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read README {}", path.display()))?;
    }
    raw.markers = args.markers.clone();

    let entry = Enricher::new()
        .with_strict_keywords(args.strict_keywords)
        .enrich(raw);

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    println!("{}", formatter.format_entry(&entry)?);
    Ok(())
}

pub fn handle_merge(args: &MergeArgs) -> i32 {
    exit_code(merge(args))
}

fn merge(args: &MergeArgs) -> Result<()> {
    let (_, summary) = pipeline::merge_files(
        &args.prior,
        &args.incoming,
        args.output.as_deref(),
        args.signal_encoding,
    )?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    println!("{}", formatter.format_merge(&summary)?);
    Ok(())
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    exit_code(show_config(args))
}

fn show_config(args: &ConfigArgs) -> Result<()> {
    let config = load_config()?;
    config.validate().context("Invalid configuration")?;

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    println!("{}", formatter.format_config(&config)?);
    Ok(())
}
