//! Sources of raw entries
//!
//! A harvester turns one external source into [`RawEntry`] records. Partial
//! failures (one search term timing out, one README missing) are reported next to
//! the entries instead of aborting the run.

pub mod github;
pub mod listing;

pub use github::{GithubSearch, GithubSearchOptions};
pub use listing::{parse_listing, AwesomeListing, ListingSource};

use crate::entry::RawEntry;
use crate::error::HarvestError;
use crate::store::ArtifactKind;
use async_trait::async_trait;
use serde::Serialize;

pub const USER_AGENT: &str = concat!("mcp-radar/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestFailure {
    /// Search term or source that failed.
    pub term: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub entries: Vec<RawEntry>,
    pub failures: Vec<HarvestFailure>,
}

impl HarvestReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[async_trait]
pub trait Harvester: Send + Sync {
    /// Artifact family the harvested entries are merged into.
    fn kind(&self) -> ArtifactKind;

    fn name(&self) -> &str;

    /// Collects raw entries. `Err` means nothing usable was harvested at all.
    async fn harvest(&self) -> Result<HarvestReport, HarvestError>;
}
