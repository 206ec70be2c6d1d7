//! Category resolution
//!
//! [`CATEGORY_RULES`] is the complete priority order. Rules are grouped in three
//! tiers: specific domains, protocol-level roles, then broad integration kinds that
//! reuse some domain labels with different trigger words. The first matching rule
//! wins; nothing matching means [`Category::General`].

use super::{sig, Condition, Evidence, Rule};
use crate::define_id_enum;
use tracing::trace;

use Condition::{All, Word};

define_id_enum! {
    Category {
        Aggregator => "aggregator",
        ArtCulture => "art_culture",
        BrowserAutomation => "browser_automation",
        CloudPlatform => "cloud_platform",
        CodeExecution => "code_execution",
        CodingAgent => "coding_agent",
        CommandLine => "command_line",
        Communication => "communication",
        CustomerData => "customer_data",
        Database => "database",
        DataPlatform => "data_platform",
        Delivery => "delivery",
        DeveloperTool => "developer_tool",
        DataScience => "data_science",
        EmbeddedSystem => "embedded_system",
        FileSystem => "file_system",
        Finance => "finance",
        Gaming => "gaming",
        Knowledge => "knowledge",
        Location => "location",
        Marketing => "marketing",
        Monitoring => "monitoring",
        Search => "search",
        Security => "security",
        Sports => "sports",
        Support => "support",
        Translation => "translation",
        Travel => "travel",
        VersionControl => "version_control",
        Mcp => "mcp",
        Framework => "framework",
        Utility => "utility",
        Client => "client",
        Tutorial => "tutorial",
        Community => "community",
        Api => "api",
        Storage => "storage",
        Ai => "ai",
        Messaging => "messaging",
        /// Placeholder for entries no rule recognises. `other` is the same placeholder.
        General => "general" | "other",
    }
}

impl Category {
    pub const DEFAULT: Category = Category::General;

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Lenient parse for stored artifacts: unknown or empty labels become the default.
    pub fn from_stored(label: &str) -> Category {
        Category::from_name(label.trim().to_ascii_lowercase().as_str()).unwrap_or_default()
    }
}

/// `deserialize_with` adapter applying [`Category::from_stored`].
pub fn deserialize_stored<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let label = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(Category::from_stored(&label))
}

impl Default for Category {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[rustfmt::skip]
pub static CATEGORY_RULES: &[Rule<Category>] = &[
    // Specific domains
    Rule { label: Category::Aggregator, any_of: &[sig!(Domain::Aggregator)] },
    Rule { label: Category::ArtCulture, any_of: &[sig!(Domain::ArtCulture)] },
    Rule {
        label: Category::BrowserAutomation,
        any_of: &[sig!(Domain::Browser), All(&[sig!(Domain::Filesystem), Word("browser")])],
    },
    Rule {
        label: Category::CloudPlatform,
        any_of: &[All(&[sig!(Deployment::Cloud), Word("cloud")])],
    },
    Rule { label: Category::CodeExecution, any_of: &[sig!(Domain::CodeExecution), Word("code")] },
    Rule { label: Category::CodingAgent, any_of: &[sig!(Domain::CodingAgent), Word("agent")] },
    Rule { label: Category::CommandLine, any_of: &[sig!(Domain::CommandLine), Word("cli")] },
    Rule {
        label: Category::Communication,
        any_of: &[sig!(Domain::Communication), Word("communication")],
    },
    Rule { label: Category::CustomerData, any_of: &[sig!(Domain::CustomerData), Word("customer")] },
    Rule { label: Category::Database, any_of: &[sig!(Domain::Database), Word("database")] },
    Rule {
        label: Category::DataPlatform,
        any_of: &[All(&[sig!(Domain::Analytics), Word("data")])],
    },
    Rule { label: Category::Delivery, any_of: &[sig!(Domain::Delivery), Word("delivery")] },
    Rule {
        label: Category::DeveloperTool,
        any_of: &[sig!(Domain::DeveloperTool), Word("developer")],
    },
    Rule { label: Category::DataScience, any_of: &[sig!(Domain::DataScience)] },
    Rule {
        label: Category::EmbeddedSystem,
        any_of: &[sig!(Deployment::Embedded), Word("embedded")],
    },
    Rule {
        label: Category::FileSystem,
        any_of: &[
            All(&[sig!(Domain::Filesystem), Word("file")]),
            All(&[sig!(Domain::Filesystem), Word("files")]),
            All(&[sig!(Domain::Filesystem), Word("filesystem")]),
        ],
    },
    Rule { label: Category::Finance, any_of: &[sig!(Domain::Finance), Word("finance")] },
    Rule { label: Category::Gaming, any_of: &[sig!(Domain::Gaming), Word("gaming")] },
    Rule { label: Category::Knowledge, any_of: &[sig!(Domain::Knowledge), Word("knowledge")] },
    Rule { label: Category::Location, any_of: &[sig!(Domain::Location), Word("location")] },
    Rule { label: Category::Marketing, any_of: &[sig!(Domain::Marketing), Word("marketing")] },
    Rule {
        label: Category::Monitoring,
        any_of: &[All(&[sig!(Domain::Analytics), Word("monitoring")])],
    },
    Rule { label: Category::Search, any_of: &[sig!(Domain::Search), Word("search")] },
    Rule { label: Category::Security, any_of: &[sig!(Domain::Security), Word("security")] },
    Rule { label: Category::Sports, any_of: &[sig!(Domain::Sports), Word("sports")] },
    Rule { label: Category::Support, any_of: &[sig!(Domain::Support), Word("support")] },
    Rule {
        label: Category::Translation,
        any_of: &[sig!(Domain::Translation), Word("translation")],
    },
    Rule { label: Category::Travel, any_of: &[sig!(Domain::Travel), Word("travel")] },
    Rule {
        label: Category::VersionControl,
        any_of: &[sig!(Domain::VersionControl), Word("version")],
    },
    // Protocol-level roles
    Rule { label: Category::Mcp, any_of: &[sig!(Protocol::Mcp), Word("mcp")] },
    Rule {
        label: Category::Framework,
        any_of: &[
            sig!(Domain::Framework),
            Word("framework"),
            Word("sdk"),
            Word("kit"),
            Word("template"),
        ],
    },
    Rule {
        label: Category::Utility,
        any_of: &[
            sig!(Domain::Utility),
            Word("utility"),
            Word("tool"),
            Word("helper"),
            Word("gateway"),
            Word("proxy"),
            Word("bridge"),
        ],
    },
    Rule {
        label: Category::Client,
        any_of: &[sig!(Domain::Client), Word("client"), Word("chat"), Word("interface")],
    },
    Rule {
        label: Category::Tutorial,
        any_of: &[
            sig!(Domain::Tutorial),
            Word("tutorial"),
            Word("guide"),
            Word("example"),
            Word("demo"),
        ],
    },
    Rule {
        label: Category::Community,
        any_of: &[sig!(Domain::Community), Word("community"), Word("discord"), Word("reddit")],
    },
    // Integration kinds
    Rule {
        label: Category::Database,
        any_of: &[
            Word("sql"),
            Word("nosql"),
            Word("postgres"),
            Word("postgresql"),
            Word("mysql"),
            Word("mongodb"),
            Word("sqlite"),
            Word("redis"),
        ],
    },
    Rule {
        label: Category::Api,
        any_of: &[sig!(Domain::Api), Word("api"), Word("rest"), Word("graphql"), Word("http")],
    },
    Rule {
        label: Category::Storage,
        any_of: &[sig!(Domain::Storage), Word("file"), Word("storage"), Word("s3"), Word("cloud")],
    },
    Rule {
        label: Category::Ai,
        any_of: &[
            sig!(Domain::Ai),
            Word("ai"),
            Word("llm"),
            Word("gpt"),
            Word("claude"),
            Word("model"),
        ],
    },
    Rule {
        label: Category::Messaging,
        any_of: &[sig!(Domain::Messaging), Word("messaging"), Word("slack"), Word("telegram")],
    },
    Rule {
        label: Category::Search,
        any_of: &[Word("elastic"), Word("elasticsearch"), Word("lucene")],
    },
];

/// Index and rule of the first match, if any.
pub fn first_match(evidence: &Evidence<'_>) -> Option<(usize, &'static Rule<Category>)> {
    if evidence.is_empty() {
        return None;
    }
    CATEGORY_RULES
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(evidence))
}

/// Resolves an entry's evidence to exactly one category.
pub fn classify(evidence: &Evidence<'_>) -> Category {
    match first_match(evidence) {
        Some((index, rule)) => {
            trace!(rule = index, category = %rule.label, "Category rule matched");
            rule.label
        }
        None => Category::DEFAULT,
    }
}
