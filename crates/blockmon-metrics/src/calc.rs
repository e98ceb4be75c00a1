//! Derived metric computation

use crate::error::{MetricError, MetricResult};
use crate::tracker::BlockAccumulator;
use blockmon_types::FinalizedMetric;

/// Divide, rejecting a zero divisor or a non-finite quotient
pub fn checked_ratio(num: f64, den: f64, field: &'static str) -> MetricResult<f64> {
    if den == 0.0 {
        return Err(MetricError::DivisionByZero { field });
    }
    let q = num / den;
    if !q.is_finite() {
        return Err(MetricError::NonFinite { field });
    }
    Ok(q)
}

fn ratio(num: Option<f64>, den: Option<f64>, field: &'static str) -> Option<f64> {
    let (num, den) = (num?, den?);
    match checked_ratio(num, den, field) {
        Ok(q) => Some(q),
        Err(e) => {
            tracing::debug!("{}; reporting as unavailable", e);
            None
        }
    }
}

fn elapsed(to: Option<f64>, from: Option<f64>) -> Option<f64> {
    Some(to? - from?)
}

/// Derive the metric for `curr` given the accumulator of the block before it.
///
/// Fields whose inputs were never observed are `None`. With no predecessor
/// only the intra-block durations and lag are filled in.
pub fn compute(curr: &BlockAccumulator, prev: Option<&BlockAccumulator>) -> FinalizedMetric {
    let cosmos_time = elapsed(curr.start_at, curr.begin_at);
    let swingset_time = elapsed(curr.finish_at, curr.start_at);
    let lag = curr.begin_at.map(|begin| begin - curr.chain_time as f64);

    let mut metric = FinalizedMetric {
        height: curr.height,
        cosmos_time,
        swingset_time,
        lag,
        ..FinalizedMetric::default()
    };

    let Some(prev) = prev else {
        return metric;
    };

    let block_time = elapsed(curr.finish_at, prev.finish_at);
    let proc_time = elapsed(curr.finish_at, curr.begin_at);

    metric.idle_time = elapsed(curr.begin_at, prev.finish_at);
    metric.block_time = block_time;
    metric.proc_frac = ratio(proc_time, block_time, "procFrac");
    metric.swingset_percentage = ratio(swingset_time, block_time, "swingsetPercentage");
    metric.chain_block_time = Some(curr.chain_time - prev.chain_time);
    metric.cranks = prev
        .last_crank
        .and_then(|p| curr.last_crank.map(|c| c - p));
    metric
}
