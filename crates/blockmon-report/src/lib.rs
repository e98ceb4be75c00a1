//! # blockmon-report
//!
//! Renders finalized block metrics as fixed-width text rows, reprinting
//! the column header every `header_interval` rows.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod emitter;
mod format;

pub use emitter::{ReportError, ReportFormat, Reporter, HEADER_A, HEADER_B};
pub use format::{cranks, fixed, percent};

/// Rows printed between header lines
pub const DEFAULT_HEADER_INTERVAL: usize = 20;
