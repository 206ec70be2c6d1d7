//! Signal vocabulary
//!
//! A signal is a normalized marker derived either from free text (description and
//! README) or from a pre-extracted symbol string such as the emoji legend used by
//! curated MCP server listings. Both paths resolve to the same closed set of
//! [`Signal`] values, grouped by family:
//!
//! - [`Language`]: implementation language of the server
//! - [`Deployment`]: where the server runs
//! - [`Os`]: supported operating systems
//! - [`Protocol`]: wire protocols and transports
//! - [`Domain`]: what the server is about
//!
//! Symbols only exist at the storage boundary; in memory an entry always holds a
//! `BTreeSet<Signal>`.

mod catalogue;
mod extractor;

pub use catalogue::pattern_for;
pub use extractor::{strip_urls, SignalExtractor};

use crate::define_id_enum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Emoji presentation selector; upstream listings use it inconsistently.
const VARIATION_SELECTOR: char = '\u{FE0F}';

define_id_enum! {
    Language {
        Python => "python",
        TypeScript => "typescript",
        Go => "go",
        Rust => "rust",
        Java => "java",
        CSharp => "csharp",
    }
}

define_id_enum! {
    Deployment {
        Cloud => "cloud",
        Local => "local",
        Embedded => "embedded",
    }
}

define_id_enum! {
    Os {
        MacOs => "macos",
        Windows => "windows",
        Linux => "linux",
    }
}

define_id_enum! {
    Protocol {
        Mcp => "mcp",
        Sse => "sse",
        WebSocket => "websocket",
        Http => "http",
    }
}

define_id_enum! {
    Domain {
        Aggregator => "aggregator",
        ArtCulture => "art-culture",
        Browser => "browser",
        Filesystem => "filesystem",
        CodeExecution => "code-execution",
        CodingAgent => "coding-agent",
        CommandLine => "command-line",
        Communication => "communication",
        CustomerData => "customer-data",
        Database => "database",
        Analytics => "analytics",
        Delivery => "delivery",
        DeveloperTool => "developer-tool",
        DataScience => "data-science",
        Finance => "finance",
        Gaming => "gaming",
        Knowledge => "knowledge",
        Location => "location",
        Marketing => "marketing",
        Search => "search",
        Security => "security",
        Sports => "sports",
        Support => "support",
        Translation => "translation",
        Travel => "travel",
        VersionControl => "version-control",
        Official => "official",
        Framework => "framework",
        Utility => "utility",
        Client => "client",
        Tutorial => "tutorial",
        Community => "community",
        Api => "api",
        Storage => "storage",
        Ai => "ai",
        Messaging => "messaging",
    }
}

/// One normalized marker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Language(Language),
    Deployment(Deployment),
    Os(Os),
    Protocol(Protocol),
    Domain(Domain),
}

impl Signal {
    /// Every signal in family order.
    pub fn all() -> &'static [Signal] {
        static ALL: OnceLock<Vec<Signal>> = OnceLock::new();
        ALL.get_or_init(|| {
            let mut all = Vec::new();
            all.extend(Language::all_variants().iter().map(|v| Signal::Language(*v)));
            all.extend(
                Deployment::all_variants()
                    .iter()
                    .map(|v| Signal::Deployment(*v)),
            );
            all.extend(Os::all_variants().iter().map(|v| Signal::Os(*v)));
            all.extend(Protocol::all_variants().iter().map(|v| Signal::Protocol(*v)));
            all.extend(Domain::all_variants().iter().map(|v| Signal::Domain(*v)));
            all
        })
    }

    pub fn token(&self) -> &'static str {
        match self {
            Signal::Language(v) => v.as_str(),
            Signal::Deployment(v) => v.as_str(),
            Signal::Os(v) => v.as_str(),
            Signal::Protocol(v) => v.as_str(),
            Signal::Domain(v) => v.as_str(),
        }
    }

    pub fn from_token(token: &str) -> Option<Signal> {
        let token = token.trim().to_ascii_lowercase();
        Signal::all().iter().copied().find(|s| s.token() == token)
    }

    /// Symbol used for this signal in compact marker strings.
    pub fn symbol(&self) -> &'static str {
        match self {
            Signal::Language(lang) => match lang {
                Language::Python => "🐍",
                Language::TypeScript => "📇",
                Language::Go => "🏎️",
                Language::Rust => "🦀",
                Language::Java => "☕",
                Language::CSharp => "#\u{FE0F}\u{20E3}",
            },
            Signal::Deployment(deployment) => match deployment {
                Deployment::Cloud => "☁️",
                Deployment::Local => "🏠",
                Deployment::Embedded => "📟",
            },
            Signal::Os(os) => match os {
                Os::MacOs => "🍎",
                Os::Windows => "🪟",
                Os::Linux => "🐧",
            },
            Signal::Protocol(protocol) => match protocol {
                Protocol::Mcp => "🔌",
                Protocol::Sse => "📡",
                Protocol::WebSocket => "↔️",
                Protocol::Http => "🕸️",
            },
            Signal::Domain(domain) => match domain {
                Domain::Aggregator => "🔗",
                Domain::ArtCulture => "🎨",
                Domain::Browser => "🌐",
                Domain::Filesystem => "📂",
                Domain::CodeExecution => "\u{1F468}\u{200D}\u{1F4BB}",
                Domain::CodingAgent => "🤖",
                Domain::CommandLine => "🖥️",
                Domain::Communication => "💬",
                Domain::CustomerData => "👤",
                Domain::Database => "🗄️",
                Domain::Analytics => "📊",
                Domain::Delivery => "🚚",
                Domain::DeveloperTool => "🛠️",
                Domain::DataScience => "🧮",
                Domain::Finance => "💰",
                Domain::Gaming => "🎮",
                Domain::Knowledge => "🧠",
                Domain::Location => "🗺️",
                Domain::Marketing => "🎯",
                Domain::Search => "🔎",
                Domain::Security => "🔒",
                Domain::Sports => "🏃",
                Domain::Support => "🎧",
                Domain::Translation => "🌎",
                Domain::Travel => "🚆",
                Domain::VersionControl => "🔄",
                Domain::Official => "🎖️",
                Domain::Framework => "🏗️",
                Domain::Utility => "🔧",
                Domain::Client => "📱",
                Domain::Tutorial => "📚",
                Domain::Community => "👥",
                Domain::Api => "🧷",
                Domain::Storage => "💾",
                Domain::Ai => "✨",
                Domain::Messaging => "✉️",
            },
        }
    }

    /// Decodes a compact marker string by symbol membership.
    ///
    /// Characters that are not part of any known symbol are ignored, so section
    /// headings and stray punctuation can be passed in as-is.
    pub fn decode_symbols(markers: &str) -> BTreeSet<Signal> {
        let markers = normalize_symbols(markers);
        if markers.is_empty() {
            return BTreeSet::new();
        }

        Signal::all()
            .iter()
            .copied()
            .filter(|signal| markers.contains(&normalize_symbols(signal.symbol())))
            .collect()
    }

    /// Concatenates the symbols of `signals` in set order.
    pub fn encode_symbols<'a>(signals: impl IntoIterator<Item = &'a Signal>) -> String {
        signals.into_iter().map(|s| s.symbol()).collect()
    }

    /// Comma-joined token form, the alternative storage encoding.
    pub fn encode_tokens<'a>(signals: impl IntoIterator<Item = &'a Signal>) -> String {
        signals
            .into_iter()
            .map(|s| s.token())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Decodes either storage encoding.
    ///
    /// Token lists are recognised by the presence of ASCII letters; anything else is
    /// treated as a symbol string. Unknown tokens are dropped.
    pub fn decode_any(encoded: &str) -> BTreeSet<Signal> {
        if encoded.chars().any(|c| c.is_ascii_alphabetic()) {
            encoded
                .split(',')
                .filter_map(Signal::from_token)
                .collect()
        } else {
            Signal::decode_symbols(encoded)
        }
    }
}

fn normalize_symbols(s: &str) -> String {
    s.chars().filter(|c| *c != VARIATION_SELECTOR).collect()
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signal::from_token(s).ok_or_else(|| format!("unknown signal '{}'", s))
    }
}

impl Serialize for Signal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `deserialize_with` adapter for stored signal sets; unknown tokens are dropped.
pub fn deserialize_stored<'de, D>(deserializer: D) -> Result<BTreeSet<Signal>, D::Error>
where
    D: Deserializer<'de>,
{
    let tokens = Vec::<String>::deserialize(deserializer)?;
    Ok(tokens.iter().filter_map(|t| Signal::from_token(t)).collect())
}

impl From<Language> for Signal {
    fn from(v: Language) -> Self {
        Signal::Language(v)
    }
}

impl From<Deployment> for Signal {
    fn from(v: Deployment) -> Self {
        Signal::Deployment(v)
    }
}

impl From<Os> for Signal {
    fn from(v: Os) -> Self {
        Signal::Os(v)
    }
}

impl From<Protocol> for Signal {
    fn from(v: Protocol) -> Self {
        Signal::Protocol(v)
    }
}

impl From<Domain> for Signal {
    fn from(v: Domain) -> Self {
        Signal::Domain(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<_> = Signal::all().iter().map(|s| s.token()).collect();
        assert_eq!(tokens.len(), Signal::all().len());
    }

    #[test]
    fn test_symbols_are_unique_and_not_nested() {
        let symbols: Vec<String> = Signal::all()
            .iter()
            .map(|s| normalize_symbols(s.symbol()))
            .collect();
        for (i, a) in symbols.iter().enumerate() {
            for (j, b) in symbols.iter().enumerate() {
                if i != j {
                    assert!(!a.contains(b.as_str()), "{} contains {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_from_token_is_case_insensitive() {
        assert_eq!(
            Signal::from_token("Python"),
            Some(Signal::Language(Language::Python))
        );
        assert_eq!(
            Signal::from_token(" version-control "),
            Some(Signal::Domain(Domain::VersionControl))
        );
        assert_eq!(Signal::from_token("cobol"), None);
    }

    #[test]
    fn test_decode_symbols_ignores_variation_selectors() {
        let with_selector = Signal::decode_symbols("🏎️ ☁️");
        let without_selector = Signal::decode_symbols("🏎 ☁");
        assert_eq!(with_selector, without_selector);
        assert!(with_selector.contains(&Signal::Language(Language::Go)));
        assert!(with_selector.contains(&Signal::Deployment(Deployment::Cloud)));
    }

    #[test]
    fn test_decode_symbols_keycap_and_zwj_sequences() {
        let signals = Signal::decode_symbols("#\u{FE0F}\u{20E3} \u{1F468}\u{200D}\u{1F4BB}");
        assert!(signals.contains(&Signal::Language(Language::CSharp)));
        assert!(signals.contains(&Signal::Domain(Domain::CodeExecution)));
        assert_eq!(signals.len(), 2);
    }

    #[test]
    fn test_decode_symbols_empty() {
        assert!(Signal::decode_symbols("").is_empty());
        assert!(Signal::decode_symbols(" - ").is_empty());
    }

    #[test]
    fn test_symbol_encoding_round_trips_every_signal() {
        let all: BTreeSet<Signal> = Signal::all().iter().copied().collect();
        let encoded = Signal::encode_symbols(&all);
        assert_eq!(Signal::decode_symbols(&encoded), all);
    }

    #[test]
    fn test_decode_any_accepts_tokens() {
        let signals = Signal::decode_any("python,database,unknown");
        assert_eq!(signals.len(), 2);
        assert!(signals.contains(&Signal::Domain(Domain::Database)));
    }

    #[test]
    fn test_deserialize_stored_drops_unknown_tokens() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_stored")]
            signals: BTreeSet<Signal>,
        }

        let row: Row =
            serde_json::from_str(r#"{"signals": ["python", "quantum", "Linux"]}"#).unwrap();
        let expected: BTreeSet<Signal> =
            [Signal::Language(Language::Python), Signal::Os(Os::Linux)].into();
        assert_eq!(row.signals, expected);
    }

    #[test]
    fn test_serde_uses_tokens() {
        let json = serde_json::to_string(&Signal::Os(Os::MacOs)).unwrap();
        assert_eq!(json, "\"macos\"");
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Signal::Os(Os::MacOs));
    }
}
