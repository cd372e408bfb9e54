use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use m3u_merge::{
    config::{
        Config,
        defaults::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_LEVEL},
    },
    logging,
    merger::Merger,
    store::UrlMatchMode,
};

#[derive(Parser)]
#[command(name = "m3u-merge")]
#[command(version)]
#[command(about = "Merge IPTV playlists from local files and remote sources into one grouped M3U")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output playlist path (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Keep every distinct URL per channel instead of only the first
    #[arg(long, value_name = "BOOL")]
    keep_multiple_urls: Option<bool>,

    /// Ignore timestamp and token query parameters when comparing URLs
    #[arg(long)]
    fuzzy_urls: bool,

    /// Also write debug.m3u next to the output file
    #[arg(long)]
    debug_file: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter_handle = logging::init(cli.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL));

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    if let Some(output) = cli.output {
        config.output_file = output;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(keep) = cli.keep_multiple_urls {
        config.keep_multiple_urls = keep;
    }
    if cli.fuzzy_urls {
        config.url_dedup = UrlMatchMode::Fuzzy;
    }
    if cli.debug_file {
        config.generate_debug_file = true;
    }
    config.validate()?;

    if let Some(handle) = &filter_handle {
        if let Err(e) = logging::apply_level(handle, &config.log_level) {
            warn!("Failed to apply log level '{}': {}", config.log_level, e);
        }
    }

    info!("Starting m3u-merge v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Output: {}, keep_multiple_urls: {}, url_dedup: {:?}",
        config.output_file.display(),
        config.keep_multiple_urls,
        config.url_dedup
    );

    let summary = Merger::new(config).run().await?;

    info!(
        "Done: {} channels from {} source(s) written to {}",
        summary.total_channels,
        summary.succeeded_sources(),
        summary.output_path.display()
    );
    Ok(())
}
