//! Homework watcher CLI
//!
//! Command-line interface for the review status polling service.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use homework_watcher::{load_config, Config, WatcherBuilder};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "homework-watcher")]
#[command(about = "Polls the homework review API and reports status changes to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    retry_period_seconds: Option<u64>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn init_logging(level: Level, log_file: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let file_layer = match log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_line_number(true)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(args.log_level, args.log_file.as_ref())?;

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_period_seconds={:?}, log_level={:?}",
        args.config,
        args.retry_period_seconds,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets();

    if let Some(retry_period_seconds) = args.retry_period_seconds {
        config.polling.retry_period_seconds = retry_period_seconds;
    }

    tracing::info!("Starting homework watcher");
    tracing::debug!(
        "Endpoint: {}, notifier: {}, retry period: {}s",
        config.api.endpoint,
        config.notifier.type_name(),
        config.polling.retry_period_seconds
    );

    WatcherBuilder::new(config).build()?.start().await?;

    Ok(())
}
