//! Metric computation error types

use thiserror::Error;

/// Errors raised while deriving a metric field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// Divisor computed to zero
    #[error("division by zero computing {field}")]
    DivisionByZero {
        /// Derived field name
        field: &'static str,
    },

    /// Result is NaN or infinite
    #[error("non-finite result computing {field}")]
    NonFinite {
        /// Derived field name
        field: &'static str,
    },
}

/// Result type for metric computations
pub type MetricResult<T> = Result<T, MetricError>;
