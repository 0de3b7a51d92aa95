use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokenscrape::{config::Config, extractor::parse_tokens, fetcher::load_source, output};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Scrape token names, USD prices and detail links from an HTML listing
/// into a JSON file.
#[derive(Debug, Parser)]
#[command(name = "tokenscrape", version)]
struct Cli {
    /// URL or path to a local .html file [default: https://etherscan.io/tokens]
    #[arg(short, long)]
    source: Option<String>,

    /// How many records to keep; zero or negative keeps all [default: 1000]
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// JSON file to write [default: tokens.json]
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tokenscrape=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.source, cli.limit, cli.out)?;
    debug!(?config, "effective configuration");

    let loaded = load_source(config.source())
        .await
        .with_context(|| format!("could not load {}", config.source()))?;
    info!(origin = %loaded.origin, charset = ?loaded.charset, "loaded source");

    let records = output::truncate(parse_tokens(&loaded.html, config.source()), config.limit());

    output::write_json(config.out(), &records)?;
    for line in output::report(&records, config.out()) {
        println!("{line}");
    }

    Ok(())
}
