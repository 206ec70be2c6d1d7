use crate::store::{SignalEncoding, StoreFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Harvester and classifier for Model Context Protocol server repositories
#[derive(Parser, Debug)]
#[command(
    name = "mcp-radar",
    about = "Harvester and classifier for Model Context Protocol server repositories",
    version,
    author,
    long_about = "mcp-radar collects MCP server repositories from GitHub search and from \
                  curated listings, tags each one with signals, keywords, a category and a \
                  tech stack, and merges the result into a dated snapshot that never loses \
                  previously seen entries."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Harvest GitHub search results and merge them into the search snapshot",
        long_about = "Runs every configured search term against the GitHub search API, \
                      classifies the results and merges them into the latest search_ snapshot.\n\n\
                      Examples:\n  \
                      mcp-radar search\n  \
                      mcp-radar search --keyword \"mcp server\" --min-stars 50\n  \
                      mcp-radar search --no-readme --dry-run --format json"
    )]
    Search(SearchArgs),

    #[command(
        about = "Harvest a curated markdown listing and merge it into the listing snapshot",
        long_about = "Parses an awesome-list style README (URL or local file) and merges its \
                      entries into the latest listing_ snapshot.\n\n\
                      Examples:\n  \
                      mcp-radar listing\n  \
                      mcp-radar listing ./README.md --store-format json"
    )]
    Listing(ListingArgs),

    #[command(
        about = "Classify a single description",
        long_about = "Runs signal and keyword extraction and both resolvers on one ad-hoc \
                      entry and prints the result.\n\n\
                      Examples:\n  \
                      mcp-radar classify \"A Python MCP database gateway\"\n  \
                      mcp-radar classify \"Weather\" --markers \"🐍 ☁️\" --format json"
    )]
    Classify(ClassifyArgs),

    #[command(
        about = "Merge two existing artifacts offline",
        long_about = "Reconciles an incoming artifact into a prior one with the same rules a \
                      harvest run uses.\n\n\
                      Examples:\n  \
                      mcp-radar merge --prior data/search_20250101.csv --incoming new.csv -o merged.csv"
    )]
    Merge(MergeArgs),

    #[command(
        about = "Show the effective configuration",
        long_about = "Resolves configuration from the environment (and .env), validates it and \
                      prints it. The GitHub token is only reported as set or unset.\n\n\
                      Examples:\n  \
                      mcp-radar config\n  \
                      MIN_STARS=50 mcp-radar config --format json"
    )]
    Config(ConfigArgs),
}

/// Flags shared by the harvesting commands.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Snapshot directory (defaults to MCP_RADAR_DATA_DIR or ./data)"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "csv", help = "Artifact format to write")]
    pub store_format: StoreFormat,

    #[arg(
        long,
        value_enum,
        default_value = "symbols",
        help = "How the signals column is written in CSV artifacts"
    )]
    pub signal_encoding: SignalEncoding,

    #[arg(long, help = "Store only stop-word-filtered keywords")]
    pub strict_keywords: bool,

    #[arg(long, help = "Harvest and merge without writing an artifact")]
    pub dry_run: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    #[arg(
        short = 'k',
        long = "keyword",
        value_name = "TERM",
        help = "Search term (repeatable; defaults to MCP_RADAR_KEYWORDS or the built-in list)"
    )]
    pub keywords: Vec<String>,

    #[arg(long, value_name = "N", help = "Minimum stargazers")]
    pub min_stars: Option<u64>,

    #[arg(long, value_name = "N", help = "Minimum forks")]
    pub min_forks: Option<u64>,

    #[arg(long, help = "Do not fetch README bodies")]
    pub no_readme: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ListingArgs {
    #[arg(
        value_name = "SOURCE",
        help = "Listing URL or file (defaults to MCP_RADAR_LISTING_URL)"
    )]
    pub source: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(value_name = "TEXT", help = "Description to classify")]
    pub text: String,

    #[arg(long, value_name = "FILE", help = "README file to scan for signals")]
    pub readme: Option<PathBuf>,

    #[arg(long, value_name = "SYMBOLS", help = "Marker symbols, e.g. \"🐍 ☁️\"")]
    pub markers: Option<String>,

    #[arg(long, help = "Apply the stop-word keyword filter")]
    pub strict_keywords: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct MergeArgs {
    #[arg(long, value_name = "FILE", help = "Prior artifact")]
    pub prior: PathBuf,

    #[arg(long, value_name = "FILE", help = "Incoming artifact")]
    pub incoming: PathBuf,

    #[arg(short = 'o', long, value_name = "FILE", help = "Write the merged artifact here")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "symbols",
        help = "How the signals column is written in CSV output"
    )]
    pub signal_encoding: SignalEncoding,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
