//! Imagebot CLI - relay image searches to waifu.im and e621/e926.
//!
//! Imagebot validates tags against the waifu.im catalog, paces requests per
//! backend and prints normalized results. NSFW content is only requested
//! when explicitly asked for.
//!
//! # Usage
//!
//! ```bash
//! # Random SFW image
//! imagebot waifu
//!
//! # Three images tagged "maid"
//! imagebot waifu maid --count 3
//!
//! # e926 search, JSON output
//! imagebot furry wolf solo --json
//!
//! # Browse the tag catalog
//! imagebot tags list --search mai
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Imagebot - rate-limited image search relay.
#[derive(Parser, Debug)]
#[command(name = "imagebot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch images from waifu.im
    Waifu(cli::search::WaifuArgs),

    /// Fetch NSFW images from waifu.im
    Nsfw(cli::search::NsfwArgs),

    /// Fetch images from e926 (or e621 with --nsfw)
    Furry(cli::search::FurryArgs),

    /// Browse, complete and reload the waifu.im tag catalog
    Tags(cli::tags::TagsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match imagebot_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `imagebot config path`."
            );
            imagebot_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Imagebot v{}", imagebot_core::VERSION);

    match cli.command {
        Commands::Waifu(args) => cli::search::execute_waifu(&config, args).await,
        Commands::Nsfw(args) => cli::search::execute_nsfw(&config, args).await,
        Commands::Furry(args) => cli::search::execute_furry(&config, args).await,
        Commands::Tags(args) => cli::tags::execute(&config, args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
