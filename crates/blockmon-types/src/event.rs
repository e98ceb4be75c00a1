//! Slog event schema and line decoding

use crate::error::{RecordError, RecordResult};
use serde::Deserialize;

const DELIVER: &str = "deliver";
const BEGIN_BLOCK: &str = "cosmic-swingset-begin-block";
const END_BLOCK_START: &str = "cosmic-swingset-end-block-start";
const END_BLOCK_FINISH: &str = "cosmic-swingset-end-block-finish";

/// Phase boundary marked by a block lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockPhase {
    /// `cosmic-swingset-begin-block`
    Begin,
    /// `cosmic-swingset-end-block-start`
    EndStart,
    /// `cosmic-swingset-end-block-finish`
    EndFinish,
}

/// Payload shared by all block lifecycle events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMarker {
    /// Block height
    pub height: u64,
    /// Consensus block timestamp (seconds)
    pub chain_time: i64,
    /// Wall-clock time the slog line was written (seconds)
    pub at: f64,
}

/// A decoded slog event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Block processing began
    BeginBlock(BlockMarker),
    /// Cosmos modules done, kernel processing starts
    EndBlockStart(BlockMarker),
    /// Kernel processing finished
    EndBlockFinish(BlockMarker),
    /// A crank was delivered
    Deliver {
        /// Crank sequence number, when the record carries one
        crank_num: Option<i64>,
    },
}

impl Event {
    /// Lifecycle phase and marker, or `None` for deliveries
    pub fn block(&self) -> Option<(BlockPhase, &BlockMarker)> {
        match self {
            Event::BeginBlock(m) => Some((BlockPhase::Begin, m)),
            Event::EndBlockStart(m) => Some((BlockPhase::EndStart, m)),
            Event::EndBlockFinish(m) => Some((BlockPhase::EndFinish, m)),
            Event::Deliver { .. } => None,
        }
    }

    /// Block height for lifecycle events
    pub fn height(&self) -> Option<u64> {
        self.block().map(|(_, m)| m.height)
    }
}

/// Untyped slog record as it appears on the wire. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Record type tag
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Crank number (`deliver`)
    pub crank_num: Option<i64>,
    /// Block height (lifecycle records)
    pub block_height: Option<u64>,
    /// Consensus block time (lifecycle records)
    pub block_time: Option<i64>,
    /// Wall-clock write time (lifecycle records)
    pub time: Option<f64>,
}

impl RawRecord {
    /// Validate the record against the schema of its declared type.
    ///
    /// Returns `Ok(None)` for record types the monitor does not consume,
    /// unless `strict` is set, in which case they are rejected.
    pub fn into_event(self, line: u64, strict: bool) -> RecordResult<Option<Event>> {
        let kind = self.kind.ok_or(RecordError::MissingType { line })?;

        let wrap: fn(BlockMarker) -> Event = match kind.as_str() {
            DELIVER => {
                return Ok(Some(Event::Deliver {
                    crank_num: self.crank_num,
                }))
            }
            BEGIN_BLOCK => Event::BeginBlock,
            END_BLOCK_START => Event::EndBlockStart,
            END_BLOCK_FINISH => Event::EndBlockFinish,
            _ if strict => {
                return Err(RecordError::UnknownType {
                    line,
                    kind: kind.clone(),
                })
            }
            _ => return Ok(None),
        };

        let missing = |field: &'static str| RecordError::MissingField {
            line,
            kind: kind.clone(),
            field,
        };
        let marker = BlockMarker {
            height: self.block_height.ok_or_else(|| missing("blockHeight"))?,
            chain_time: self.block_time.ok_or_else(|| missing("blockTime"))?,
            at: self.time.ok_or_else(|| missing("time"))?,
        };
        Ok(Some(wrap(marker)))
    }
}

/// Decode one slog line into a typed event.
///
/// `line` is the 1-based line number used for error context.
pub fn decode_line(line: u64, text: &str, strict: bool) -> RecordResult<Option<Event>> {
    let raw: RawRecord =
        serde_json::from_str(text).map_err(|source| RecordError::Decode { line, source })?;
    raw.into_event(line, strict)
}
