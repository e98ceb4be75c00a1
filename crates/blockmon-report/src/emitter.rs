//! Report rows and header cadence

use crate::format::{cranks, fixed, percent};
use blockmon_metrics::SlidingWindow;
use blockmon_types::FinalizedMetric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Header for [`ReportFormat::A`]
pub const HEADER_A: &str =
    "- block  blockTime   lag  -> cranks(avg)  swingset(avg)   +  cosmos = proc% (avg)";

/// Header for [`ReportFormat::B`]
pub const HEADER_B: &str =
    "- block  cranks(avg)  swingset(avg)  ss%    cosmos   blockTime(avg)  chainTime(avg)";

/// Report errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Unrecognized report format name
    #[error("unknown report format: {0} (expected a or b)")]
    UnknownFormat(String),
}

/// Column layout of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Chain block time, lag, cranks, swingset, cosmos and proc%
    #[default]
    A,
    /// Cranks, swingset, swingset%, cosmos, block time and chain block time
    B,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(ReportFormat::A),
            "b" => Ok(ReportFormat::B),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::A => f.write_str("a"),
            ReportFormat::B => f.write_str("b"),
        }
    }
}

impl ReportFormat {
    /// Column header line
    pub fn header(&self) -> &'static str {
        match self {
            ReportFormat::A => HEADER_A,
            ReportFormat::B => HEADER_B,
        }
    }

    /// Render the row for `metric`. `window` must already contain it.
    pub fn row(&self, metric: &FinalizedMetric, window: &SlidingWindow) -> String {
        let chain = metric.chain_block_time.map(|c| format!("{:2}", c));
        let avg_chain = window.mean(|m| m.chain_block_time.map(|c| c as f64));
        let avg_cranks = window.mean_or_zero(|m| m.cranks.map(|c| c as f64));
        let avg_swingset = window.mean(|m| m.swingset_time);

        match self {
            ReportFormat::A => {
                let avg_proc = window.mean(|m| m.proc_frac).map(|f| f * 100.0);
                format!(
                    "  {:5}   {:>2}({})  {:>6} -> {:>4}({:>5})  {:>6}({:>6})  +  {:>6} = {:>4} ({:>4})",
                    metric.height,
                    chain.unwrap_or_default(),
                    fixed(avg_chain, 1),
                    fixed(metric.lag, 3),
                    cranks(metric.cranks),
                    avg_cranks.map(|a| format!("{:3.1}", a)).unwrap_or_default(),
                    fixed(metric.swingset_time, 3),
                    fixed(avg_swingset, 3),
                    fixed(metric.cosmos_time, 3),
                    percent(metric.proc_frac),
                    fixed(avg_proc, 1),
                )
            }
            ReportFormat::B => {
                let avg_ss = window.mean(|m| m.swingset_percentage);
                let avg_block = window.mean(|m| m.block_time);
                format!(
                    "  {:5}  {:>4}({:>5})  {:>6}({:>6})  {:>4}  {:>6}  {:>6}({:>6})  {:>2}({})",
                    metric.height,
                    cranks(metric.cranks),
                    avg_cranks.map(|a| format!("{:3.1}", a)).unwrap_or_default(),
                    fixed(metric.swingset_time, 3),
                    fixed(avg_swingset, 3),
                    percent(avg_ss),
                    fixed(metric.cosmos_time, 3),
                    fixed(metric.block_time, 3),
                    fixed(avg_block, 3),
                    chain.unwrap_or_default(),
                    fixed(avg_chain, 1),
                )
            }
        }
    }
}

/// Emits report lines, reprinting the header every `header_interval` rows
#[derive(Debug, Clone)]
pub struct Reporter {
    format: ReportFormat,
    header_interval: usize,
    countdown: usize,
}

impl Reporter {
    /// Create a reporter. The first emitted line is always a header.
    pub fn new(format: ReportFormat, header_interval: usize) -> Self {
        Self {
            format,
            header_interval: header_interval.max(1),
            countdown: 0,
        }
    }

    /// Lines for one finalized metric: the row, preceded by the header when due
    pub fn emit(&mut self, metric: &FinalizedMetric, window: &SlidingWindow) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if self.countdown == 0 {
            lines.push(self.format.header().to_string());
            self.countdown = self.header_interval;
        }
        self.countdown -= 1;
        lines.push(self.format.row(metric, window));
        lines
    }

    /// Selected layout
    pub fn format(&self) -> ReportFormat {
        self.format
    }
}
