//! Configuration management for mcp-radar
//!
//! Settings come from environment variables (after `.env` is loaded by the binary)
//! with defaults matching the daily harvest job.
//!
//! # Environment Variables
//!
//! - `MCP_RADAR_KEYWORDS`: comma-separated search terms (legacy `KEYWORDS_ENV`) - default: 17 MCP phrases
//! - `GITHUB_TOKEN`: GitHub token for higher rate limits - optional
//! - `MCP_RADAR_MIN_STARS`: minimum stars (legacy `MIN_STARS`) - default: "10"
//! - `MCP_RADAR_MIN_FORKS`: minimum forks (legacy `MIN_FORKS`) - default: "10"
//! - `MCP_RADAR_API_URL`: GitHub API base - default: "https://api.github.com"
//! - `MCP_RADAR_LISTING_URL`: curated listing README - default: awesome-mcp-servers on GitHub
//! - `MCP_RADAR_DATA_DIR`: artifact directory - default: "data"
//! - `MCP_RADAR_REQUEST_TIMEOUT`: timeout in seconds - default: "30"
//! - `MCP_RADAR_FAILURE_PAUSE`: pause after a failed search term, in seconds - default: "60"
//! - `MCP_RADAR_MAX_PAGES`: pagination cap per term - default: "10"
//! - `MCP_RADAR_FETCH_README`: fetch README bodies (true|false) - default: "true"
//! - `MCP_RADAR_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use mcp_radar::RadarConfig;
//!
//! let config = RadarConfig::from_env().expect("Invalid environment");
//! config.validate().expect("Invalid configuration");
//! ```

use crate::harvest::GithubSearchOptions;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MIN_STARS: i64 = 10;
const DEFAULT_MIN_FORKS: i64 = 10;
const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_LISTING_URL: &str =
    "https://raw.githubusercontent.com/punkpeye/awesome-mcp-servers/refs/heads/main/README.md";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FAILURE_PAUSE_SECS: u64 = 60;
const DEFAULT_MAX_PAGES: u32 = 10;
const DEFAULT_FETCH_README: bool = true;
const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_SEARCH_TERMS: &[&str] = &[
    "model context protocol server",
    "mcp server",
    "mcp framework",
    "mcp sdk",
    "mcp template",
    "mcp utility",
    "mcp gateway",
    "mcp proxy",
    "mcp client",
    "mcp tutorial",
    "mcp example",
    "mcp database",
    "mcp api",
    "mcp storage",
    "mcp ai",
    "mcp chat",
    "mcp search",
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarConfig {
    pub search_terms: Vec<String>,

    pub github_token: Option<String>,

    /// Signed so that a negative value in the environment reaches `validate`.
    pub min_stars: i64,
    pub min_forks: i64,

    pub api_url: String,
    pub listing_url: String,
    pub data_dir: PathBuf,

    pub request_timeout_secs: u64,
    pub failure_pause_secs: u64,
    pub max_pages: u32,
    pub fetch_readme: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for RadarConfig {
    /// Built-in defaults, ignoring the environment.
    fn default() -> Self {
        Self {
            search_terms: DEFAULT_SEARCH_TERMS.iter().map(|s| s.to_string()).collect(),
            github_token: None,
            min_stars: DEFAULT_MIN_STARS,
            min_forks: DEFAULT_MIN_FORKS,
            api_url: DEFAULT_API_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            failure_pause_secs: DEFAULT_FAILURE_PAUSE_SECS,
            max_pages: DEFAULT_MAX_PAGES,
            fetch_readme: DEFAULT_FETCH_README,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// First non-empty value among `keys`, with the key it came from.
fn lookup(keys: &[&'static str]) -> Option<(&'static str, String)> {
    keys.iter().find_map(|key| {
        env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| (*key, v))
    })
}

fn parse_var<T>(keys: &[&'static str], default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(keys) {
        Some((key, value)) => value.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            field: key.to_string(),
            error: format!("'{}': {}", value, e),
        }),
        None => Ok(default),
    }
}

impl RadarConfig {
    /// Loads from environment variables, falling back to defaults for unset ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when a set variable cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let search_terms = match lookup(&["MCP_RADAR_KEYWORDS", "KEYWORDS_ENV"]) {
            Some((_, value)) => split_terms(&value),
            None => defaults.search_terms,
        };

        let github_token = lookup(&["GITHUB_TOKEN"]).map(|(_, v)| v.trim().to_string());

        Ok(Self {
            search_terms,
            github_token,
            min_stars: parse_var(&["MCP_RADAR_MIN_STARS", "MIN_STARS"], DEFAULT_MIN_STARS)?,
            min_forks: parse_var(&["MCP_RADAR_MIN_FORKS", "MIN_FORKS"], DEFAULT_MIN_FORKS)?,
            api_url: lookup(&["MCP_RADAR_API_URL"])
                .map(|(_, v)| v)
                .unwrap_or(defaults.api_url),
            listing_url: lookup(&["MCP_RADAR_LISTING_URL"])
                .map(|(_, v)| v)
                .unwrap_or(defaults.listing_url),
            data_dir: lookup(&["MCP_RADAR_DATA_DIR"])
                .map(|(_, v)| PathBuf::from(v))
                .unwrap_or(defaults.data_dir),
            request_timeout_secs: parse_var(
                &["MCP_RADAR_REQUEST_TIMEOUT"],
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            failure_pause_secs: parse_var(&["MCP_RADAR_FAILURE_PAUSE"], DEFAULT_FAILURE_PAUSE_SECS)?,
            max_pages: parse_var(&["MCP_RADAR_MAX_PAGES"], DEFAULT_MAX_PAGES)?,
            fetch_readme: parse_var(&["MCP_RADAR_FETCH_README"], DEFAULT_FETCH_README)?,
            log_level: lookup(&["MCP_RADAR_LOG_LEVEL"])
                .map(|(_, v)| v)
                .unwrap_or(defaults.log_level)
                .to_lowercase(),
        })
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stars < 0 {
            return Err(ConfigError::ValidationFailed(
                "min_stars must be a non-negative integer".to_string(),
            ));
        }
        if self.min_forks < 0 {
            return Err(ConfigError::ValidationFailed(
                "min_forks must be a non-negative integer".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.max_pages == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max pages must be at least 1".to_string(),
            ));
        }

        if self.search_terms.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one search term is required".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Options for the GitHub search harvester. Call after `validate`.
    pub fn github_options(&self) -> GithubSearchOptions {
        GithubSearchOptions {
            api_url: self.api_url.clone(),
            token: self.github_token.clone(),
            terms: self.search_terms.clone(),
            min_stars: self.min_stars.max(0) as u64,
            min_forks: self.min_forks.max(0) as u64,
            fetch_readme: self.fetch_readme,
            max_pages: self.max_pages,
            request_timeout: self.request_timeout(),
            failure_pause: Duration::from_secs(self.failure_pause_secs),
        }
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("search_terms".to_string(), self.search_terms.join(","));
        map.insert(
            "github_token".to_string(),
            if self.github_token.is_some() { "set" } else { "unset" }.to_string(),
        );
        map.insert("min_stars".to_string(), self.min_stars.to_string());
        map.insert("min_forks".to_string(), self.min_forks.to_string());
        map.insert("api_url".to_string(), self.api_url.clone());
        map.insert("listing_url".to_string(), self.listing_url.clone());
        map.insert("data_dir".to_string(), self.data_dir.display().to_string());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "failure_pause_secs".to_string(),
            self.failure_pause_secs.to_string(),
        );
        map.insert("max_pages".to_string(), self.max_pages.to_string());
        map.insert("fetch_readme".to_string(), self.fetch_readme.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

/// Splits a comma-separated term list, dropping blanks.
pub fn split_terms(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for RadarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mcp-radar Configuration:")?;
        writeln!(f, "  Search Terms: {}", self.search_terms.len())?;
        writeln!(
            f,
            "  GitHub Token: {}",
            if self.github_token.is_some() { "set" } else { "unset" }
        )?;
        writeln!(f, "  Min Stars: {}", self.min_stars)?;
        writeln!(f, "  Min Forks: {}", self.min_forks)?;
        writeln!(f, "  API URL: {}", self.api_url)?;
        writeln!(f, "  Listing URL: {}", self.listing_url)?;
        writeln!(f, "  Data Dir: {}", self.data_dir.display())?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Failure Pause: {}s", self.failure_pause_secs)?;
        writeln!(f, "  Max Pages: {}", self.max_pages)?;
        writeln!(f, "  Fetch README: {}", self.fetch_readme)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const ALL_KEYS: &[&str] = &[
        "MCP_RADAR_KEYWORDS",
        "KEYWORDS_ENV",
        "GITHUB_TOKEN",
        "MCP_RADAR_MIN_STARS",
        "MIN_STARS",
        "MCP_RADAR_MIN_FORKS",
        "MIN_FORKS",
        "MCP_RADAR_API_URL",
        "MCP_RADAR_LISTING_URL",
        "MCP_RADAR_DATA_DIR",
        "MCP_RADAR_REQUEST_TIMEOUT",
        "MCP_RADAR_FAILURE_PAUSE",
        "MCP_RADAR_MAX_PAGES",
        "MCP_RADAR_FETCH_README",
        "MCP_RADAR_LOG_LEVEL",
    ];

    fn clear_env() -> Vec<EnvGuard> {
        ALL_KEYS.iter().map(|k| EnvGuard::unset(k)).collect()
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _clear = clear_env();

        let config = RadarConfig::from_env().unwrap();

        assert_eq!(config, RadarConfig::default());
        assert_eq!(config.search_terms.len(), 17);
        assert_eq!(config.min_stars, DEFAULT_MIN_STARS);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _clear = clear_env();
        let _guards = vec![
            EnvGuard::set("MCP_RADAR_KEYWORDS", "mcp rust, ,mcp go"),
            EnvGuard::set("GITHUB_TOKEN", "ghp_test"),
            EnvGuard::set("MCP_RADAR_MIN_STARS", "5"),
            EnvGuard::set("MCP_RADAR_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("MCP_RADAR_FETCH_README", "false"),
            EnvGuard::set("MCP_RADAR_LOG_LEVEL", "DEBUG"),
        ];

        let config = RadarConfig::from_env().unwrap();

        assert_eq!(config.search_terms, vec!["mcp rust", "mcp go"]);
        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(config.min_stars, 5);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(!config.fetch_readme);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_legacy_variables_are_honoured() {
        let _clear = clear_env();
        let _guards = vec![
            EnvGuard::set("KEYWORDS_ENV", "mcp server"),
            EnvGuard::set("MIN_STARS", "3"),
            EnvGuard::set("MIN_FORKS", "1"),
        ];

        let config = RadarConfig::from_env().unwrap();
        assert_eq!(config.search_terms, vec!["mcp server"]);
        assert_eq!(config.min_stars, 3);
        assert_eq!(config.min_forks, 1);
    }

    #[test]
    #[serial]
    fn test_prefixed_variable_wins_over_legacy() {
        let _clear = clear_env();
        let _guards = vec![
            EnvGuard::set("MIN_STARS", "3"),
            EnvGuard::set("MCP_RADAR_MIN_STARS", "7"),
        ];
        assert_eq!(RadarConfig::from_env().unwrap().min_stars, 7);
    }

    #[test]
    #[serial]
    fn test_unparsable_value_is_reported() {
        let _clear = clear_env();
        let _guard = EnvGuard::set("MIN_FORKS", "lots");

        match RadarConfig::from_env() {
            Err(ConfigError::ParseError { field, .. }) => assert_eq!(field, "MIN_FORKS"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_negative_thresholds() {
        let config = RadarConfig {
            min_stars: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RadarConfig {
            min_forks: -5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_timeout() {
        let mut config = RadarConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_other_limits() {
        let mut config = RadarConfig::default();
        config.max_pages = 0;
        assert!(config.validate().is_err());

        let mut config = RadarConfig::default();
        config.search_terms.clear();
        assert!(config.validate().is_err());

        let mut config = RadarConfig::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_github_options() {
        let config = RadarConfig {
            min_stars: 2,
            failure_pause_secs: 0,
            ..Default::default()
        };
        let options = config.github_options();
        assert_eq!(options.min_stars, 2);
        assert_eq!(options.min_forks, 10);
        assert!(options.failure_pause.is_zero());
        assert_eq!(options.terms.len(), 17);
    }

    #[test]
    fn test_display_hides_token() {
        let config = RadarConfig {
            github_token: Some("ghp_secret".to_string()),
            ..Default::default()
        };
        let display = format!("{}", config);
        assert!(display.contains("mcp-radar Configuration:"));
        assert!(!display.contains("ghp_secret"));
        assert_eq!(config.to_display_map()["github_token"], "set");
    }
}
