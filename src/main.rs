use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use trending_news::config::Config;
use trending_news::feed::HttpFetcher;
use trending_news::sentiment::SentimentClassifier;
use trending_news::server::{run_server, AppState};
use trending_news::HeadlinePipeline;

#[derive(Parser, Debug)]
#[command(
    name = "trending-news",
    about = "Serve sentiment-tagged headlines from news RSS feeds"
)]
struct Args {
    /// Configuration file (optional; defaults apply when missing)
    #[arg(long, value_name = "FILE", default_value = "trending-news.toml")]
    config: PathBuf,

    /// Bind address, overriding the config file
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let catalog = config.catalog().context("Failed to build feed catalog")?;
    tracing::info!(sources = ?catalog.sources(), "Feed catalog ready");

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let fetcher = HttpFetcher::new(client, config.max_feed_bytes);

    let pipeline = HeadlinePipeline::new(catalog, fetcher, SentimentClassifier::default());
    let state = AppState::new(pipeline, config.rate_limit.build());

    let addr = args.bind.unwrap_or(config.bind);
    run_server(addr, state)
        .await
        .with_context(|| format!("Server on {} failed", addr))?;

    Ok(())
}
