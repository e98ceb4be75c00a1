//! Monitor engine

use blockmon_metrics::{BlockTracker, SlidingWindow, TrackerConfig};
use blockmon_report::{ReportFormat, Reporter, DEFAULT_HEADER_INTERVAL};
use blockmon_types::{Event, FinalizedMetric};
use std::io::{self, Write};

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Tracker policies and window capacity
    pub tracker: TrackerConfig,
    /// Report layout
    pub format: ReportFormat,
    /// Rows between header reprints
    pub header_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            format: ReportFormat::default(),
            header_interval: DEFAULT_HEADER_INTERVAL,
        }
    }
}

/// Output produced when a block is finalized
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// The finalized metric
    pub metric: FinalizedMetric,
    /// Report lines, header first when one is due
    pub lines: Vec<String>,
}

/// Streaming block metrics engine
pub struct Monitor {
    tracker: BlockTracker,
    window: SlidingWindow,
    reporter: Reporter,
}

impl Monitor {
    /// Create a monitor
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tracker: BlockTracker::new(config.tracker),
            window: SlidingWindow::with_capacity(config.tracker.window_capacity),
            reporter: Reporter::new(config.format, config.header_interval),
        }
    }

    /// Create a monitor with default config
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Feed one event
    pub fn ingest(&mut self, event: &Event) -> Option<Emission> {
        let metric = self.tracker.ingest(event)?;
        tracing::debug!(
            "Finalized height {} (tracking {} heights)",
            metric.height,
            self.tracker.tracked_heights()
        );

        self.window.push(metric);
        let lines = self.reporter.emit(&metric, &self.window);
        Some(Emission { metric, lines })
    }

    /// Feed one event and write any resulting lines to `out`
    pub fn ingest_to<W: Write>(&mut self, event: &Event, out: &mut W) -> io::Result<bool> {
        let Some(emission) = self.ingest(event) else {
            return Ok(false);
        };
        for line in &emission.lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(true)
    }

    /// Trailing window of finalized metrics
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Block state tracker
    pub fn tracker(&self) -> &BlockTracker {
        &self.tracker
    }

    /// Report layout in use
    pub fn format(&self) -> ReportFormat {
        self.reporter.format()
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
