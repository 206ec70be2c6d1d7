use mcp_radar::cli::commands::{CliArgs, Commands};
use mcp_radar::cli::handlers::{
    handle_classify, handle_config, handle_listing, handle_merge, handle_search,
};
use mcp_radar::config::RadarConfig;
use mcp_radar::util::logging::{self, LoggingConfig};
use mcp_radar::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    // A missing .env is the normal case.
    let _ = dotenv::dotenv();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("mcp-radar v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Search(search_args) => handle_search(search_args).await,
        Commands::Listing(listing_args) => handle_listing(listing_args).await,
        Commands::Classify(classify_args) => handle_classify(classify_args).await,
        Commands::Merge(merge_args) => handle_merge(merge_args),
        Commands::Config(config_args) => handle_config(config_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    // An unparsable environment is reported by the command itself.
    let configured = RadarConfig::from_env()
        .map(|config| config.log_level)
        .unwrap_or_else(|_| RadarConfig::default().log_level);
    let level = logging::level_from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
        &configured,
    );
    logging::init_logging(LoggingConfig {
        level,
        use_json: logging::json_from_env(),
        ..Default::default()
    });
}
