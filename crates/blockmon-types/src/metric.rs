//! Finalized per-block metric record

/// Derived timing and throughput figures for one finalized block.
///
/// Predecessor-dependent fields are `None` when no usable accumulator
/// exists for `height - 1`. Any field is `None` when one of its input
/// timestamps was never observed, or when it would divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinalizedMetric {
    /// Block height
    pub height: u64,
    /// Cranks delivered during this block
    pub cranks: Option<i64>,
    /// Finish-to-finish wall time from the previous block
    pub block_time: Option<f64>,
    /// Previous finish to this begin
    pub idle_time: Option<f64>,
    /// Begin to end-block-start (cosmos-sdk modules)
    pub cosmos_time: Option<f64>,
    /// Consensus timestamp delta from the previous block
    pub chain_block_time: Option<i64>,
    /// End-block-start to end-block-finish (kernel)
    pub swingset_time: Option<f64>,
    /// `swingset_time / block_time`
    pub swingset_percentage: Option<f64>,
    /// Begin-to-finish processing time over `block_time`
    pub proc_frac: Option<f64>,
    /// Begin-block wall time minus consensus block time
    pub lag: Option<f64>,
}

impl FinalizedMetric {
    /// Whether the predecessor-dependent fields were computed
    pub fn has_predecessor(&self) -> bool {
        self.chain_block_time.is_some()
    }
}
