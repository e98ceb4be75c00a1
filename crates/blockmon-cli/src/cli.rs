//! CLI argument parsing for blockmon

use blockmon_core::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Per-block timing monitor for swingset slog streams
#[derive(Parser, Debug, Clone)]
#[command(name = "blockmon")]
#[command(about = "Per-block timing monitor for swingset slog streams")]
#[command(version)]
pub struct Cli {
    /// Slog file to read (defaults to stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Keep reading as the file grows, like `tail -F`
    #[arg(long, short, requires = "input")]
    pub follow: bool,

    /// Report layout: a (lag, proc%) or b (block time, swingset%)
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// Config file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reject record types the monitor does not consume
    #[arg(long)]
    pub strict: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
