//! Dated snapshot artifacts on disk
//!
//! Each run writes `<prefix><YYYYMMDD>.<ext>` into the data directory. The most
//! recent artifact for a prefix is the prior snapshot of the next run.

mod codec;

pub use codec::{read_snapshot, write_snapshot};

use crate::error::{error_chain, StoreError};
use crate::merge::Snapshot;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y%m%d";

/// Reads a prior artifact; a missing or malformed file is an empty snapshot.
pub fn read_prior(path: &Path) -> Snapshot {
    match read_snapshot(path) {
        Ok(snapshot) => {
            info!(
                path = %path.display(),
                entries = snapshot.len(),
                "Loaded prior snapshot"
            );
            snapshot
        }
        Err(e) => {
            info!(error = %error_chain(&e), "Prior snapshot unreadable, starting empty");
            Snapshot::new()
        }
    }
}

/// Which harvester produced an artifact; selects the file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Search,
    Listing,
}

impl ArtifactKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Search => "search_",
            ArtifactKind::Listing => "listing_",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Csv,
    Json,
}

impl StoreFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Csv => "csv",
            StoreFormat::Json => "json",
        }
    }

    pub fn from_path(path: &Path) -> Option<StoreFormat> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(StoreFormat::Csv),
            "json" => Some(StoreFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How the `signals` CSV column is written. Reading accepts both.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignalEncoding {
    #[default]
    Symbols,
    Tokens,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    format: StoreFormat,
    encoding: SignalEncoding,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: StoreFormat::default(),
            encoding: SignalEncoding::default(),
        }
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_signal_encoding(mut self, encoding: SignalEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    pub fn path_for(&self, kind: ArtifactKind, date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            kind.prefix(),
            date.format(DATE_FORMAT),
            self.format.extension()
        ))
    }

    /// The artifact with the greatest date for `kind`, in either format.
    ///
    /// On a date tie the configured format wins. A missing directory is not an error.
    pub fn latest(&self, kind: ArtifactKind) -> Result<Option<PathBuf>, StoreError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut best: Option<(NaiveDate, bool, PathBuf)> = None;
        for dir_entry in read_dir {
            let path = dir_entry
                .map_err(|source| StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })?
                .path();
            let Some((date, format)) = parse_artifact_name(&path, kind) else {
                continue;
            };
            let preferred = format == self.format;
            let better = match &best {
                None => true,
                Some((best_date, best_preferred, _)) => {
                    (date, preferred) > (*best_date, *best_preferred)
                }
            };
            if better {
                best = Some((date, preferred, path));
            }
        }

        Ok(best.map(|(_, _, path)| path))
    }

    /// The prior snapshot for a run.
    ///
    /// Never fails: a missing or unreadable artifact yields an empty snapshot.
    pub fn load_latest(&self, kind: ArtifactKind) -> Snapshot {
        let path = match self.latest(kind) {
            Ok(Some(path)) => path,
            Ok(None) => {
                info!(
                    dir = %self.dir.display(),
                    prefix = kind.prefix(),
                    "No prior snapshot found, starting empty"
                );
                return Snapshot::new();
            }
            Err(e) => {
                info!(
                    error = %error_chain(&e),
                    "Could not list data directory, starting empty"
                );
                return Snapshot::new();
            }
        };

        read_prior(&path)
    }

    /// Writes `snapshot` as the artifact for `date`, replacing any existing one.
    pub fn save(
        &self,
        kind: ArtifactKind,
        date: NaiveDate,
        snapshot: &Snapshot,
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(kind, date);
        write_snapshot(&path, snapshot, self.encoding)?;
        debug!(path = %path.display(), entries = snapshot.len(), "Saved snapshot");
        Ok(path)
    }
}

fn parse_artifact_name(path: &Path, kind: ArtifactKind) -> Option<(NaiveDate, StoreFormat)> {
    let format = StoreFormat::from_path(path)?;
    let stem = path.file_stem()?.to_str()?;
    let date = stem.strip_prefix(kind.prefix())?;
    if date.len() != 8 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    Some((date, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::entry::Entry;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot_of(names: &[&str]) -> Snapshot {
        names
            .iter()
            .map(|name| Entry {
                name: name.to_string(),
                category: Category::Database,
                stars: 12,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_path_for_uses_prefix_date_and_extension() {
        let store = ArtifactStore::new("data");
        assert_eq!(
            store.path_for(ArtifactKind::Search, date(2025, 3, 7)),
            PathBuf::from("data/search_20250307.csv")
        );
        let store = store.with_format(StoreFormat::Json);
        assert_eq!(
            store.path_for(ArtifactKind::Listing, date(2025, 12, 31)),
            PathBuf::from("data/listing_20251231.json")
        );
    }

    #[test]
    fn test_latest_missing_directory() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("nope"));
        assert!(store.latest(ArtifactKind::Search).unwrap().is_none());
        assert!(store.load_latest(ArtifactKind::Search).is_empty());
    }

    #[test]
    fn test_read_prior_tolerates_missing_and_malformed_files() {
        let temp = TempDir::new().unwrap();
        assert!(read_prior(&temp.path().join("absent.csv")).is_empty());

        let broken = temp.path().join("search_20250101.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(read_prior(&broken).is_empty());
    }

    #[test]
    fn test_latest_picks_greatest_date_for_prefix() {
        let temp = TempDir::new().unwrap();
        for name in [
            "search_20250101.csv",
            "search_20250315.csv",
            "listing_20251201.csv",
            "search_2025031.csv",
            "search_notadate.csv",
            "search_20250401.txt",
        ] {
            fs::write(temp.path().join(name), "").unwrap();
        }

        let store = ArtifactStore::new(temp.path());
        assert_eq!(
            store.latest(ArtifactKind::Search).unwrap(),
            Some(temp.path().join("search_20250315.csv"))
        );
        assert_eq!(
            store.latest(ArtifactKind::Listing).unwrap(),
            Some(temp.path().join("listing_20251201.csv"))
        );
    }

    #[test]
    fn test_latest_prefers_configured_format_on_tie() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("search_20250315.csv"), "").unwrap();
        fs::write(temp.path().join("search_20250315.json"), "").unwrap();

        let store = ArtifactStore::new(temp.path()).with_format(StoreFormat::Json);
        assert_eq!(
            store.latest(ArtifactKind::Search).unwrap(),
            Some(temp.path().join("search_20250315.json"))
        );
    }

    #[test]
    fn test_save_then_load_latest() {
        let temp = TempDir::new().unwrap();
        let store = ArtifactStore::new(temp.path().join("data"));
        let snapshot = snapshot_of(&["a/one", "b/two"]);

        let path = store
            .save(ArtifactKind::Search, date(2025, 6, 1), &snapshot)
            .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("csv.tmp").exists());

        let loaded = store.load_latest(ArtifactKind::Search);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("a/one").unwrap().stars, 12);
        assert!(store.load_latest(ArtifactKind::Listing).is_empty());
    }

    #[test]
    fn test_malformed_latest_yields_empty_snapshot() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("search_20250101.json"), "{ not json").unwrap();
        let store = ArtifactStore::new(temp.path());
        assert!(store.load_latest(ArtifactKind::Search).is_empty());
    }
}
