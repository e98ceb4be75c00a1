//! Tracker configuration and behaviour policies

use crate::DEFAULT_WINDOW_CAPACITY;
use serde::{Deserialize, Serialize};

/// How a crank snapshot of `0` is treated at block finish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroCrankPolicy {
    /// Crank `0` counts as "no crank observed" and is not recorded
    #[default]
    #[serde(alias = "absent")]
    TreatAsAbsent,
    /// Crank `0` is a real first delivery and is recorded
    Record,
}

/// Which accumulator for `height - 1` may serve as predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredecessorPolicy {
    /// Any accumulator that exists, finalized or not
    #[default]
    AnyAccumulator,
    /// Only an accumulator whose finish already produced a metric
    FinalizedOnly,
}

/// When the tracker starts producing metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarmUpPolicy {
    /// A finish event produces a metric unless it is the very first event ingested
    #[default]
    AnyPriorEvent,
    /// A finish event produces a metric only once two distinct heights are known
    TwoHeights,
}

/// Block tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Trailing window size; also sets how many heights of accumulators are kept
    pub window_capacity: usize,
    /// Zero crank handling
    pub zero_crank: ZeroCrankPolicy,
    /// Predecessor lookup rule
    pub predecessor: PredecessorPolicy,
    /// Warm-up rule
    pub warm_up: WarmUpPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            zero_crank: ZeroCrankPolicy::default(),
            predecessor: PredecessorPolicy::default(),
            warm_up: WarmUpPolicy::default(),
        }
    }
}
