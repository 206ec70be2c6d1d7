use super::catalogue;
use super::Signal;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::trace;

/// Applies the signal catalogue to free text and, optionally, to a marker string.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor;

impl SignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scans `text` with every catalogue pattern.
    pub fn extract(&self, text: &str) -> BTreeSet<Signal> {
        if text.trim().is_empty() {
            return BTreeSet::new();
        }

        let text = strip_urls(text);
        let signals: BTreeSet<Signal> = catalogue::compiled()
            .iter()
            .filter(|(_, re)| re.is_match(&text))
            .map(|(signal, _)| *signal)
            .collect();

        trace!(count = signals.len(), "Extracted text signals");
        signals
    }

    /// Text signals joined with the signals decoded from an upstream marker string.
    pub fn extract_with_markers(&self, text: &str, markers: Option<&str>) -> BTreeSet<Signal> {
        let mut signals = self.extract(text);
        if let Some(markers) = markers {
            signals.extend(Signal::decode_symbols(markers));
        }
        signals
    }

    /// Description and README body combined the way the extractor expects.
    pub fn extract_entry(
        &self,
        description: &str,
        readme: &str,
        markers: Option<&str>,
    ) -> BTreeSet<Signal> {
        let text = if readme.is_empty() {
            description.to_string()
        } else {
            format!("{}\n{}", description, readme)
        };
        self.extract_with_markers(&text, markers)
    }
}

/// Removes URLs and markdown link targets so that link text is the only evidence.
pub fn strip_urls(text: &str) -> String {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = URL_REGEX.get_or_init(|| {
        Regex::new(r"\]\([^)]*\)|https?://\S+|www\.\S+").expect("Invalid URL regex")
    });
    re.replace_all(text, "] ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Deployment, Domain, Language, Os, Protocol};

    #[test]
    fn test_empty_text_yields_no_signals() {
        let extractor = SignalExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n").is_empty());
    }

    #[test]
    fn test_python_mcp_database_gateway() {
        let signals = SignalExtractor::new().extract("A Python MCP database gateway");
        assert!(signals.contains(&Signal::Language(Language::Python)));
        assert!(signals.contains(&Signal::Protocol(Protocol::Mcp)));
        assert!(signals.contains(&Signal::Domain(Domain::Database)));
        assert!(signals.contains(&Signal::Domain(Domain::Utility)));
        assert!(!signals.contains(&Signal::Protocol(Protocol::Http)));
    }

    #[test]
    fn test_rules_are_non_exclusive() {
        let signals = SignalExtractor::new()
            .extract("Rust and TypeScript SDK for cloud search, runs on Linux and Windows");
        for expected in [
            Signal::Language(Language::Rust),
            Signal::Language(Language::TypeScript),
            Signal::Deployment(Deployment::Cloud),
            Signal::Domain(Domain::Search),
            Signal::Domain(Domain::Framework),
            Signal::Os(Os::Linux),
            Signal::Os(Os::Windows),
        ] {
            assert!(signals.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let signals = SignalExtractor::new().extract("POSTGRESQL over WebSockets");
        assert!(signals.contains(&Signal::Domain(Domain::Database)));
        assert!(signals.contains(&Signal::Protocol(Protocol::WebSocket)));
    }

    #[test]
    fn test_urls_are_not_evidence() {
        let signals = SignalExtractor::new()
            .extract("See [docs](https://example.com/rust/api) and https://github.com/acme/slack");
        assert!(!signals.contains(&Signal::Language(Language::Rust)));
        assert!(!signals.contains(&Signal::Domain(Domain::Messaging)));
        assert!(!signals.contains(&Signal::Protocol(Protocol::Http)));
    }

    #[test]
    fn test_markers_and_text_agree_on_vocabulary() {
        let extractor = SignalExtractor::new();
        let from_text = extractor.extract("python server");
        let from_markers = extractor.extract_with_markers("", Some("🐍"));
        assert_eq!(from_text, from_markers);
    }

    #[test]
    fn test_extract_entry_includes_readme() {
        let signals = SignalExtractor::new().extract_entry(
            "Weather tool",
            "## Install\nRequires Java 17",
            Some("☁️"),
        );
        assert!(signals.contains(&Signal::Language(Language::Java)));
        assert!(signals.contains(&Signal::Deployment(Deployment::Cloud)));
    }
}
