pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    ClassifyArgs, CliArgs, Commands, ConfigArgs, ListingArgs, MergeArgs, SearchArgs,
};
pub use output::{OutputFormat, OutputFormatter};
