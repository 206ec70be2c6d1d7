//! mcp-radar - harvester and classifier for Model Context Protocol servers
//!
//! Repositories are collected from GitHub search and from curated markdown
//! listings, tagged, and merged into a dated snapshot. The classification core is
//! pure and deterministic:
//!
//! - [`signals`]: typed tags detected in free text or decoded from marker symbols
//! - [`keywords`]: lowercase word tokens of a description
//! - [`classify`]: ordered category rules and additive tech-stack rules
//! - [`merge`]: folds a harvest into the previous snapshot without losing entries
//!
//! Around it sit the collaborators: [`harvest`] sources, the [`store`] for dated
//! artifacts, [`config`] from the environment and the [`pipeline`] that runs them.
//!
//! # Example Usage
//!
//! ```
//! use mcp_radar::{Category, Enricher, RawEntry, TechStack};
//!
//! let entry = Enricher::new().enrich(RawEntry::new(
//!     "acme/db-gateway",
//!     "A Python MCP database gateway",
//!     "https://github.com/acme/db-gateway",
//! ));
//!
//! assert_eq!(entry.category, Category::Database);
//! assert!(entry.techstack.contains(&TechStack::Python));
//! ```

mod id_enum_macro;

pub mod classify;
pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod harvest;
pub mod keywords;
pub mod merge;
pub mod pipeline;
pub mod signals;
pub mod store;
pub mod util;

pub use classify::{classify, resolve_techstack, Category, Evidence, TechStack};
pub use config::{ConfigError, RadarConfig};
pub use entry::{Enricher, Entry, RawEntry};
pub use error::{HarvestError, StoreError};
pub use harvest::{
    AwesomeListing, GithubSearch, GithubSearchOptions, HarvestFailure, HarvestReport, Harvester,
    ListingSource,
};
pub use keywords::extract_keywords;
pub use merge::{merge, MergeOutcome, MergeStats, Snapshot};
pub use pipeline::{RunOptions, RunSummary};
pub use signals::{Signal, SignalExtractor};
pub use store::{ArtifactKind, ArtifactStore, SignalEncoding, StoreFormat};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
