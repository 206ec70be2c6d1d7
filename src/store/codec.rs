use super::{SignalEncoding, StoreFormat};
use crate::classify::{techstack, Category};
use crate::entry::Entry;
use crate::error::StoreError;
use crate::keywords;
use crate::merge::Snapshot;
use crate::signals::Signal;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One CSV line. Column order is the field order.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    stars: Option<u64>,
    #[serde(default)]
    forks: Option<u64>,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    techstack: String,
    #[serde(default)]
    signals: String,
}

impl CsvRow {
    fn from_entry(entry: &Entry, encoding: SignalEncoding) -> Self {
        let signals = match encoding {
            SignalEncoding::Symbols => Signal::encode_symbols(&entry.signals),
            SignalEncoding::Tokens => Signal::encode_tokens(&entry.signals),
        };
        Self {
            name: entry.name.clone(),
            description: entry.description.clone(),
            url: entry.url.clone(),
            stars: Some(entry.stars),
            forks: Some(entry.forks),
            keywords: keywords::join(&entry.keywords),
            category: entry.category.as_str().to_string(),
            techstack: techstack::join(&entry.techstack),
            signals,
        }
    }

    fn into_entry(self) -> Entry {
        Entry {
            name: self.name,
            description: self.description,
            url: self.url,
            stars: self.stars.unwrap_or(0),
            forks: self.forks.unwrap_or(0),
            readme_text: String::new(),
            signals: Signal::decode_any(&self.signals),
            keywords: keywords::parse_joined(&self.keywords),
            category: Category::from_stored(&self.category),
            techstack: techstack::parse_joined(&self.techstack),
        }
    }
}

/// Reads an artifact, choosing the codec by file extension.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
    let format = StoreFormat::from_path(path)
        .ok_or_else(|| StoreError::UnknownFormat(path.to_path_buf()))?;
    let file = File::open(path).map_err(|source| io_error(path, source))?;

    let entries: Vec<Entry> = match format {
        StoreFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .flexible(true)
                .from_reader(BufReader::new(file));
            let mut entries = Vec::new();
            for row in reader.deserialize::<CsvRow>() {
                let row = row.map_err(|source| StoreError::Csv {
                    path: path.to_path_buf(),
                    source,
                })?;
                if row.name.trim().is_empty() {
                    continue;
                }
                entries.push(row.into_entry());
            }
            entries
        }
        StoreFormat::Json => serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            StoreError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?,
    };

    Ok(entries.into_iter().collect())
}

/// Writes an artifact through a sibling temporary file renamed into place.
pub fn write_snapshot(
    path: &Path,
    snapshot: &Snapshot,
    encoding: SignalEncoding,
) -> Result<(), StoreError> {
    let format = StoreFormat::from_path(path)
        .ok_or_else(|| StoreError::UnknownFormat(path.to_path_buf()))?;
    let tmp = temp_path(path, format);

    let result = write_to(&tmp, format, snapshot, encoding)
        .and_then(|_| fs::rename(&tmp, path).map_err(|source| io_error(path, source)));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_to(
    tmp: &Path,
    format: StoreFormat,
    snapshot: &Snapshot,
    encoding: SignalEncoding,
) -> Result<(), StoreError> {
    let file = File::create(tmp).map_err(|source| io_error(tmp, source))?;

    match format {
        StoreFormat::Csv => {
            let mut writer = csv::Writer::from_writer(BufWriter::new(file));
            for entry in snapshot.entries() {
                writer
                    .serialize(CsvRow::from_entry(entry, encoding))
                    .map_err(|source| StoreError::Csv {
                        path: tmp.to_path_buf(),
                        source,
                    })?;
            }
            writer.flush().map_err(|source| io_error(tmp, source))?;
        }
        StoreFormat::Json => {
            let entries: Vec<&Entry> = snapshot.entries().collect();
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &entries).map_err(|source| {
                StoreError::Json {
                    path: tmp.to_path_buf(),
                    source,
                }
            })?;
            writer.flush().map_err(|source| io_error(tmp, source))?;
        }
    }
    Ok(())
}

fn temp_path(path: &Path, format: StoreFormat) -> PathBuf {
    path.with_extension(format!("{}.tmp", format.extension()))
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TechStack;
    use crate::signals::{Domain, Language};
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        let entry = Entry {
            name: "acme/db-gateway".to_string(),
            description: "A Python MCP database gateway, with commas".to_string(),
            url: "https://github.com/acme/db-gateway".to_string(),
            stars: 42,
            forks: 7,
            readme_text: "# db-gateway".to_string(),
            signals: [
                Signal::Language(Language::Python),
                Signal::Domain(Domain::Database),
            ]
            .into(),
            keywords: ["database", "gateway", "python"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            category: Category::Database,
            techstack: [TechStack::Python].into(),
        };
        vec![entry].into_iter().collect()
    }

    #[test]
    fn test_csv_header_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.csv");
        write_snapshot(&path, &sample(), SignalEncoding::Symbols).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "name,description,url,stars,forks,keywords,category,techstack,signals"
        );
    }

    #[test]
    fn test_csv_preserves_fields_except_readme() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.csv");
        write_snapshot(&path, &sample(), SignalEncoding::Symbols).unwrap();

        let loaded = read_snapshot(&path).unwrap();
        let entry = loaded.get("acme/db-gateway").unwrap();
        let original = sample();
        let original = original.get("acme/db-gateway").unwrap();

        assert_eq!(entry.description, original.description);
        assert_eq!(entry.signals, original.signals);
        assert_eq!(entry.keywords, original.keywords);
        assert_eq!(entry.techstack, original.techstack);
        assert_eq!(entry.category, Category::Database);
        assert_eq!(entry.stars, 42);
        assert!(entry.readme_text.is_empty());
    }

    #[test]
    fn test_csv_token_encoding() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.csv");
        write_snapshot(&path, &sample(), SignalEncoding::Tokens).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"python,database\"") || text.contains("\"database,python\""));
        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded.get("acme/db-gateway").unwrap().signals.len(), 2);
    }

    #[test]
    fn test_csv_tolerates_legacy_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("listing_20250101.csv");
        fs::write(
            &path,
            "name,description,url,stars,forks,keywords,category,techstack,signals\n\
             foo,Old row,https://x,,,\"a,b\",other,python,🐍\n\
             ,skipped,,,,,,,\n",
        )
        .unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let foo = loaded.get("foo").unwrap();
        assert_eq!(foo.stars, 0);
        assert_eq!(foo.category, Category::General);
        assert!(foo.signals.contains(&Signal::Language(Language::Python)));
    }

    #[test]
    fn test_json_keeps_readme() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.json");
        write_snapshot(&path, &sample(), SignalEncoding::Symbols).unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_json_drops_unknown_labels_instead_of_failing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.json");
        fs::write(
            &path,
            r#"[
                {"name": "a/keep", "signals": ["python"], "techstack": ["python"]},
                {"name": "b/newer", "signals": ["python", "quantum"],
                 "techstack": ["rust", "zig"], "category": "teleportation"}
            ]"#,
        )
        .unwrap();

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let newer = loaded.get("b/newer").unwrap();
        assert_eq!(
            newer.signals,
            BTreeSet::from([Signal::Language(Language::Python)])
        );
        assert_eq!(newer.techstack, BTreeSet::from([TechStack::Rust]));
        assert_eq!(newer.category, Category::General);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("search_20250101.xml");
        assert!(matches!(
            write_snapshot(&path, &sample(), SignalEncoding::Symbols),
            Err(StoreError::UnknownFormat(_))
        ));
    }
}
