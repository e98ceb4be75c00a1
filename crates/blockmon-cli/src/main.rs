//! blockmon binary
//!
//! Reads a swingset slog stream and prints one row of block timing
//! metrics per finished block.
//!
//! ```bash
//! tail -n 10000 -F chain.slog | blockmon
//! blockmon --input chain.slog --follow --format b
//! ```

mod cli;
mod config;
mod input;

use anyhow::{Context, Result};
use blockmon_core::Monitor;
use cli::Cli;
use config::MonitorConfig;
use input::{spawn_reader, LineSource};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing; stdout is reserved for the report
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = MonitorConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let source = match &cli.input {
        Some(path) => {
            let follow = cli.follow.then(|| config.poll_interval());
            LineSource::open(path, follow)
                .await
                .with_context(|| format!("cannot open input {:?}", path))?
        }
        None => LineSource::stdin(),
    };

    let (mut events, reader) = spawn_reader(source, config.strict_types);
    let mut monitor = Monitor::new(config.engine_config());
    tracing::info!("blockmon starting with format {}", monitor.format());

    let mut blocks = 0u64;
    while let Some(item) = events.recv().await {
        let event = item?;
        if monitor
            .ingest_to(&event, &mut std::io::stdout().lock())
            .context("cannot write report")?
        {
            blocks += 1;
        }
    }

    reader.await.context("input reader task failed")?;
    tracing::info!("blockmon stopped after {} blocks", blocks);

    Ok(())
}
