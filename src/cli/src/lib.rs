use aiwatch_client::config_manager::{ConfigLoader, ConfigOverrides};
use aiwatch_client::exporters::{JsonlWriter, LogWriterEnum};
use aiwatch_client::{monitor, WatchdogClient};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "aiwatch",
    version,
    about = "AI usage watchdog: flags processes matching known AI/LLM client signatures"
)]
pub struct Cli {
    /// Scan interval in seconds
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Path to the JSONL event log
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Run a single scan and exit (no loop)
    #[arg(long)]
    pub once: bool,

    /// Log matches and cycle summaries as they happen
    #[arg(long)]
    pub debug: bool,

    /// Extra signature catalog appended after the embedded rules
    #[arg(long, value_name = "PATH")]
    pub signatures: Option<PathBuf>,

    /// Re-report a still-running match after this many seconds
    #[arg(long, value_name = "SECS")]
    pub realert_window: Option<u64>,
}

#[tokio::main]
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.debug)?;

    let config = ConfigLoader::load_config(&ConfigOverrides {
        scan_interval_secs: cli.interval,
        log_file: cli.logfile.clone(),
        signatures_file: cli.signatures.clone(),
        realert_window_secs: cli.realert_window,
    })?;

    // the one fatal error: a log sink we cannot append to
    let writer = LogWriterEnum::Jsonl(
        JsonlWriter::try_new(config.log_file.clone()).context("log sink is not writable")?,
    );

    let mut client = WatchdogClient::new(config.clone(), writer);

    info!(
        "AI usage watchdog starting on host '{}'; log file: {}; interval: {}s; mode: {}",
        client.hostname(),
        config.log_file.display(),
        config.scan_interval_secs,
        if cli.once { "single-scan" } else { "continuous" }
    );

    if cli.once {
        match client.run_scan_tick().await {
            Ok(events) => info!("Scan complete. Events logged: {}", events),
            Err(e) => warn!("Scan failed: {e:#}"),
        }
        return Ok(());
    }

    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stop requested (Ctrl+C)");
            signal_token.cancel();
        }
    });

    monitor::monitor(client, cancellation_token).await;
    info!("Watchdog stopped");
    Ok(())
}
