//! Output formatting for multiple formats
//!
//! JSON and YAML render the serde form of each result; the human format is a
//! compact terminal summary.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::techstack;
use crate::config::RadarConfig;
use crate::entry::Entry;
use crate::keywords;
use crate::pipeline::{OfflineMergeSummary, RunSummary};
use crate::signals::Signal;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_run(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(summary, "run summary"),
            OutputFormat::Yaml => to_yaml(summary, "run summary"),
            OutputFormat::Human => Ok(self.format_run_human(summary)),
        }
    }

    pub fn format_entry(&self, entry: &Entry) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(entry, "entry"),
            OutputFormat::Yaml => to_yaml(entry, "entry"),
            OutputFormat::Human => Ok(self.format_entry_human(entry)),
        }
    }

    pub fn format_merge(&self, summary: &OfflineMergeSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(summary, "merge summary"),
            OutputFormat::Yaml => to_yaml(summary, "merge summary"),
            OutputFormat::Human => Ok(self.format_merge_human(summary)),
        }
    }

    pub fn format_config(&self, config: &RadarConfig) -> Result<String> {
        let map: BTreeMap<String, String> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => to_json(&map, "config"),
            OutputFormat::Yaml => to_yaml(&map, "config"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    // Human-readable formatting methods

    fn format_run_human(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        if summary.failures.is_empty() {
            output.push_str(&format!("\u{2713} {} run complete\n", summary.harvester));
        } else {
            output.push_str(&format!(
                "\u{26A0} {} run complete with {} failure(s)\n",
                summary.harvester,
                summary.failures.len()
            ));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Prior entries:    {}\n", summary.prior_entries));
        output.push_str(&format!("Harvested:        {}\n", summary.harvested));
        output.push_str(&format!("Inserted:         {}\n", summary.stats.inserted));
        output.push_str(&format!("Updated:          {}\n", summary.stats.updated));
        output.push_str(&format!("Carried forward:  {}\n", summary.stats.carried_forward));
        output.push_str(&format!("Total:            {}\n", summary.total));

        push_categories(&mut output, &summary.categories);

        if !summary.failures.is_empty() {
            output.push_str("\n\u{26A0} Failures:\n");
            for failure in &summary.failures {
                output.push_str(&format!("  - {}: {}\n", failure.term, failure.reason));
            }
        }

        match &summary.artifact {
            Some(path) => output.push_str(&format!("\nWritten to {}\n", path.display())),
            None if summary.dry_run => output.push_str("\nDry run: nothing written\n"),
            None => {}
        }

        output
    }

    fn format_entry_human(&self, entry: &Entry) -> String {
        let mut output = String::new();

        if entry.name.is_empty() {
            output.push_str("Classification\n");
        } else {
            output.push_str(&format!("{}\n", entry.name));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Category:   {}\n", entry.category));
        output.push_str(&format!("Tech stack: {}\n", or_none(techstack::join(&entry.techstack))));
        output.push_str(&format!(
            "Signals:    {}\n",
            or_none(Signal::encode_tokens(&entry.signals))
        ));
        output.push_str(&format!(
            "Symbols:    {}\n",
            or_none(Signal::encode_symbols(&entry.signals))
        ));
        output.push_str(&format!("Keywords:   {}\n", or_none(keywords::join(&entry.keywords))));

        output
    }

    fn format_merge_human(&self, summary: &OfflineMergeSummary) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Merge complete\n");
        output.push_str(RULE);
        output.push_str("\n\n");
        output.push_str(&format!("Prior:            {}\n", summary.prior.display()));
        output.push_str(&format!("Incoming:         {}\n", summary.incoming.display()));
        output.push_str(&format!("Inserted:         {}\n", summary.stats.inserted));
        output.push_str(&format!("Updated:          {}\n", summary.stats.updated));
        output.push_str(&format!("Carried forward:  {}\n", summary.stats.carried_forward));
        output.push_str(&format!("Total:            {}\n", summary.total));

        push_categories(&mut output, &summary.categories);

        if let Some(path) = &summary.output {
            output.push_str(&format!("\nWritten to {}\n", path.display()));
        }

        output
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_json::to_string_pretty(value).with_context(|| format!("Failed to serialize {} to JSON", what))
}

fn to_yaml<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<String> {
    serde_yaml::to_string(value).with_context(|| format!("Failed to serialize {} to YAML", what))
}

fn or_none(value: String) -> String {
    if value.is_empty() {
        "(none)".to_string()
    } else {
        value
    }
}

fn push_categories(output: &mut String, categories: &BTreeMap<String, usize>) {
    if categories.is_empty() {
        return;
    }
    output.push_str("\nCategories:\n");
    let mut sorted: Vec<(&String, &usize)> = categories.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (i, (label, count)) in sorted.iter().enumerate() {
        let connector = if i == sorted.len() - 1 { "\u{2514}" } else { "\u{251C}" };
        output.push_str(&format!("{}\u{2500} {:<20} {}\n", connector, label, count));
    }
}
