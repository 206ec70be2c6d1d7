//! Structured logging setup for mcp-radar
//!
//! Initializes a `tracing` subscriber once per process. `RUST_LOG` takes
//! precedence; otherwise the crate logs at the configured level and the HTTP
//! stack is held at `warn`. Output goes to stderr so that command results on
//! stdout stay machine-readable.
//!
//! # Example
//!
//! ```no_run
//! use mcp_radar::util::logging::{self, LoggingConfig};
//!
//! logging::init_logging(LoggingConfig::with_level(logging::parse_level("debug")));
//!
//! use tracing::{info, warn};
//! info!("Harvest started");
//! warn!(term = "mcp server", "Search term failed");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

const CRATE_TARGET: &str = "mcp_radar";

/// Dependencies that are too chatty below `warn`.
const QUIET_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for this crate
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., mcp_radar::harvest) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string
///
/// # Example
///
/// ```
/// use mcp_radar::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Level chosen from CLI flags, falling back to the configured level.
///
/// An explicit `--log-level` wins over `-v`/`-q`.
pub fn level_from_flags(
    log_level: Option<&str>,
    verbose: bool,
    quiet: bool,
    configured: &str,
) -> Level {
    if let Some(level_str) = log_level {
        parse_level(level_str)
    } else if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        parse_level(configured)
    }
}

fn add_directive(filter: EnvFilter, directive: &str) -> EnvFilter {
    match directive.parse() {
        Ok(parsed) => filter.add_directive(parsed),
        Err(_) => filter,
    }
}

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(level: Level) -> EnvFilter {
    let mut filter = add_directive(
        EnvFilter::default(),
        &format!("{}={}", CRATE_TARGET, level.as_str().to_lowercase()),
    );
    for target in QUIET_TARGETS {
        filter = add_directive(filter, &format!("{}=warn", target));
    }
    filter
}

/// Initializes the logging system with the provided configuration
///
/// Subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = if env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            default_filter(config.level)
        };

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}

/// Whether `MCP_RADAR_LOG_JSON` asks for JSON output.
pub fn json_from_env() -> bool {
    env::var("MCP_RADAR_LOG_JSON")
        .ok()
        .and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(false)
}
