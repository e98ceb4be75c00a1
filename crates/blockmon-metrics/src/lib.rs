//! # blockmon-metrics
//!
//! Streaming aggregation for slog block metrics.
//!
//! Features:
//! - Crank tracker for the last delivered crank number
//! - Per-height block state tracker with bounded memory
//! - Derived timing/throughput calculator
//! - Fixed-capacity sliding window for smoothed averages

#![warn(missing_docs)]
#![warn(clippy::all)]

mod calc;
mod crank;
mod error;
mod policy;
mod tracker;
mod window;

pub use calc::{checked_ratio, compute};
pub use crank::CrankTracker;
pub use error::{MetricError, MetricResult};
pub use policy::{PredecessorPolicy, TrackerConfig, WarmUpPolicy, ZeroCrankPolicy};
pub use tracker::{BlockAccumulator, BlockTracker};
pub use window::SlidingWindow;

/// Trailing window size: about two minutes of blocks at a 6 second interval
pub const DEFAULT_WINDOW_CAPACITY: usize = 20;
