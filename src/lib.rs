pub mod aggregate;
pub mod analyzer;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod ingest;
pub mod models;
pub mod provider;
pub mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde_json::{Map, Value};

use analyzer::{HistoryAnalyzer, RequestKind};
use config::AnalyticsConfig;
use provider::{ChromeHistoryDb, HistoryProvider, MemoryProvider};

/// Browsing history analytics over a Chrome profile or a JSON export
#[derive(Parser)]
#[command(name = "histlens", author, version, about, long_about = None)]
struct Cli {
    /// Chrome `History` SQLite file (copy it first if the browser is running)
    #[arg(long, value_name = "FILE", conflicts_with = "json", required_unless_present = "json")]
    history: Option<PathBuf>,

    /// JSON history export
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Settings file; missing keys use defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Requests to answer; all of them when omitted
    #[arg(value_enum)]
    requests: Vec<RequestKind>,
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(analyze(cli))
}

async fn analyze(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    let provider: Arc<dyn HistoryProvider> = match (&cli.history, &cli.json) {
        (Some(path), _) => Arc::new(ChromeHistoryDb::open(path.clone())?),
        (None, Some(path)) => Arc::new(MemoryProvider::from_json_file(path)?),
        (None, None) => anyhow::bail!("one of --history or --json is required"),
    };

    let now_ms = Utc::now().timestamp_millis();
    let analyzer = HistoryAnalyzer::new(provider, config)?;
    let stats = analyzer.initialize(now_ms).await?;
    log::info!(
        "loaded {} visits from {} history items",
        stats.accepted,
        stats.history_items
    );

    let requests = if cli.requests.is_empty() {
        RequestKind::ALL.to_vec()
    } else {
        cli.requests.clone()
    };

    let mut output = Map::new();
    for kind in requests {
        let response = analyzer.handle(kind, now_ms).await;
        output.insert(kind.as_str().to_string(), serde_json::to_value(response)?);
    }

    let output = Value::Object(output);
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}
