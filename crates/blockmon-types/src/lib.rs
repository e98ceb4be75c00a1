//! # blockmon-types
//!
//! Shared types for the blockmon slog monitor:
//! - Typed slog events (`Event`, `BlockMarker`)
//! - Line decoding with schema validation
//! - The finalized per-block metric record

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod metric;

pub use error::{RecordError, RecordResult};
pub use event::{decode_line, BlockMarker, BlockPhase, Event, RawRecord};
pub use metric::FinalizedMetric;
