//! # blockmon-core
//!
//! The monitor engine. One [`Monitor`] owns every piece of mutable state:
//! - Block state tracker (with its crank tracker)
//! - Trailing metric window
//! - Report header countdown
//!
//! Events are fed one at a time; a finished block yields its report lines
//! synchronously.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod monitor;

pub use monitor::{EngineConfig, Emission, Monitor};

pub use blockmon_metrics::{PredecessorPolicy, TrackerConfig, WarmUpPolicy, ZeroCrankPolicy};
pub use blockmon_report::ReportFormat;
pub use blockmon_types::{decode_line, Event, FinalizedMetric, RecordError};
