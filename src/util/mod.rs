//! Utility modules for mcp-radar

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
