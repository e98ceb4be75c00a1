//! Record decoding error types

use thiserror::Error;

/// Errors raised while turning a slog line into an [`crate::Event`]
#[derive(Debug, Error)]
pub enum RecordError {
    /// Line is not valid JSON
    #[error("line {line}: malformed record: {source}")]
    Decode {
        /// 1-based input line number
        line: u64,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Record has no `type` field
    #[error("line {line}: record has no type field")]
    MissingType {
        /// 1-based input line number
        line: u64,
    },

    /// Required field missing for the declared type
    #[error("line {line}: {kind} record is missing field {field}")]
    MissingField {
        /// 1-based input line number
        line: u64,
        /// Declared record type
        kind: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// Unrecognized record type (strict mode only)
    #[error("line {line}: unrecognized record type {kind:?}")]
    UnknownType {
        /// 1-based input line number
        line: u64,
        /// Declared record type
        kind: String,
    },
}

impl RecordError {
    /// Whether the line failed to decode at all, as opposed to failing schema checks
    pub fn is_decode(&self) -> bool {
        matches!(self, RecordError::Decode { .. })
    }

    /// Line number the error refers to
    pub fn line(&self) -> u64 {
        match self {
            RecordError::Decode { line, .. }
            | RecordError::MissingType { line }
            | RecordError::MissingField { line, .. }
            | RecordError::UnknownType { line, .. } => *line,
        }
    }
}

/// Result type for record decoding
pub type RecordResult<T> = Result<T, RecordError>;
