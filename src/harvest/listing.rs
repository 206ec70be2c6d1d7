//! Curated markdown listing harvester
//!
//! Reads an awesome-list style README where each server is a bullet
//! `- [name](url) <symbols> - description` under a `## ` section heading.
//! Symbols in the section and `### ` subsection headings apply to every entry below
//! them.

use super::{HarvestReport, Harvester, USER_AGENT};
use crate::entry::RawEntry;
use crate::error::HarvestError;
use crate::store::ArtifactKind;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// Sections that list clients, guides or tooling rather than servers.
const SKIPPED_SECTIONS: &[&str] = &[
    "What is MCP?",
    "Clients",
    "Tutorials",
    "Community",
    "Legend",
    "Frameworks",
    "Utilities",
    "Tips and Tricks",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingSource {
    Url(String),
    File(PathBuf),
}

impl ListingSource {
    /// `http(s)://` locations are fetched; anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ListingSource::Url(trimmed.to_string())
        } else {
            ListingSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for ListingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingSource::Url(url) => f.write_str(url),
            ListingSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct AwesomeListing {
    source: ListingSource,
    client: Client,
}

impl AwesomeListing {
    pub fn new(source: ListingSource, request_timeout: Duration) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| HarvestError::transport(source.to_string(), e))?;
        Ok(Self { source, client })
    }

    pub fn source(&self) -> &ListingSource {
        &self.source
    }

    async fn read_source(&self) -> Result<String, HarvestError> {
        match &self.source {
            ListingSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| HarvestError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            ListingSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| HarvestError::transport(url, e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(HarvestError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response
                    .text()
                    .await
                    .map_err(|e| HarvestError::transport(url, e))
            }
        }
    }
}

#[async_trait]
impl Harvester for AwesomeListing {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Listing
    }

    fn name(&self) -> &str {
        "awesome-listing"
    }

    async fn harvest(&self) -> Result<HarvestReport, HarvestError> {
        info!(source = %self.source, "Reading curated listing");
        let markdown = self.read_source().await?;
        let entries = parse_listing(&markdown);
        info!(entries = entries.len(), "Parsed curated listing");
        Ok(HarvestReport {
            entries,
            failures: Vec::new(),
        })
    }
}

fn entry_regex() -> &'static Regex {
    static ENTRY_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTRY_REGEX.get_or_init(|| {
        Regex::new(r"^\s*[-*]\s+\[([^\]]+)\]\(([^)\s]+)\)\s*(.*)$").expect("Invalid entry regex")
    })
}

fn anchor_regex() -> &'static Regex {
    static ANCHOR_REGEX: OnceLock<Regex> = OnceLock::new();
    ANCHOR_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid anchor regex"))
}

/// Plain heading title: tags removed, leading symbols and spaces trimmed.
fn section_title(heading: &str) -> String {
    let without_tags = anchor_regex().replace_all(heading, "");
    without_tags
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
        .to_string()
}

/// `owner/repo` for GitHub URLs, the link text otherwise.
fn entry_name(label: &str, url: &str) -> String {
    let path = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"));
    if let Some(path) = path {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        if let (Some(owner), Some(repo)) = (parts.next(), parts.next()) {
            let repo = repo.split(['#', '?']).next().unwrap_or(repo);
            return format!("{}/{}", owner, repo.trim_end_matches(".git"));
        }
    }
    label.trim().to_string()
}

/// Extracts server entries from a listing README.
pub fn parse_listing(markdown: &str) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    let mut in_section = false;
    let mut skipping = false;
    let mut sub_skipping = false;
    let mut heading_markers = String::new();
    let mut sub_markers = String::new();

    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            let title = section_title(heading);
            skipping = SKIPPED_SECTIONS.contains(&title.as_str());
            sub_skipping = false;
            in_section = true;
            heading_markers = anchor_regex().replace_all(heading, "").into_owned();
            sub_markers.clear();
            debug!(section = %title, skipped = skipping, "Listing section");
            continue;
        }
        if let Some(heading) = line.strip_prefix("### ") {
            sub_skipping = SKIPPED_SECTIONS.contains(&section_title(heading).as_str());
            sub_markers = anchor_regex().replace_all(heading, "").into_owned();
            continue;
        }
        if line.starts_with("# ") {
            in_section = false;
            continue;
        }
        if !in_section || skipping || sub_skipping {
            continue;
        }

        let Some(caps) = entry_regex().captures(line) else {
            continue;
        };
        let label = &caps[1];
        let url = &caps[2];
        let rest = caps[3].trim();

        let (symbols, description) = match rest.strip_prefix("- ") {
            Some(description) => ("", description),
            None => match rest.split_once(" - ") {
                Some((symbols, description)) => (symbols, description),
                None => ("", rest),
            },
        };

        let markers = [heading_markers.trim(), sub_markers.trim(), symbols.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let mut entry = RawEntry::new(entry_name(label, url), description.trim(), url);
        entry.markers = Some(markers).filter(|m| !m.is_empty());
        entries.push(entry);
    }

    entries
}
