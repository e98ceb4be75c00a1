//! Per-height block state tracking

use crate::calc::compute;
use crate::crank::CrankTracker;
use crate::policy::{PredecessorPolicy, TrackerConfig, WarmUpPolicy, ZeroCrankPolicy};
use blockmon_types::{BlockMarker, BlockPhase, Event, FinalizedMetric};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How many finalized heights are remembered for duplicate rejection
const FINALIZED_HISTORY: usize = 1024;

/// Partial lifecycle state gathered for one block height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockAccumulator {
    /// Block height
    pub height: u64,
    /// Begin-block wall time
    pub begin_at: Option<f64>,
    /// End-block-start wall time
    pub start_at: Option<f64>,
    /// End-block-finish wall time
    pub finish_at: Option<f64>,
    /// Last consensus block time seen for this height
    pub chain_time: i64,
    /// Crank snapshot taken at finish
    pub last_crank: Option<i64>,
    /// Whether this height already produced a metric
    pub finalized: bool,
}

impl BlockAccumulator {
    fn new(marker: &BlockMarker) -> Self {
        Self {
            height: marker.height,
            begin_at: None,
            start_at: None,
            finish_at: None,
            chain_time: marker.chain_time,
            last_crank: None,
            finalized: false,
        }
    }

    fn record(&mut self, phase: BlockPhase, marker: &BlockMarker) {
        let slot = match phase {
            BlockPhase::Begin => &mut self.begin_at,
            BlockPhase::EndStart => &mut self.start_at,
            BlockPhase::EndFinish => &mut self.finish_at,
        };
        *slot = Some(marker.at);
        self.chain_time = marker.chain_time;
    }
}

/// Correlates lifecycle events per height and finalizes one metric per block.
///
/// After every finalization only accumulators within `window_capacity + 1`
/// heights of the finalized one are kept. The last [`FINALIZED_HISTORY`]
/// finalized heights are remembered and later events for them are dropped.
pub struct BlockTracker {
    config: TrackerConfig,
    cranks: CrankTracker,
    blocks: BTreeMap<u64, BlockAccumulator>,
    finalized: BTreeSet<u64>,
    finalized_order: VecDeque<u64>,
    last_finalized: Option<u64>,
    block_events: u64,
    distinct_heights: u64,
}

impl BlockTracker {
    /// Create a tracker
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            cranks: CrankTracker::new(),
            blocks: BTreeMap::new(),
            finalized: BTreeSet::new(),
            finalized_order: VecDeque::with_capacity(FINALIZED_HISTORY),
            last_finalized: None,
            block_events: 0,
            distinct_heights: 0,
        }
    }

    /// Create a tracker with default config
    pub fn with_defaults() -> Self {
        Self::new(TrackerConfig::default())
    }

    /// Feed one event. Returns the finalized metric when `event` completes a block.
    pub fn ingest(&mut self, event: &Event) -> Option<FinalizedMetric> {
        self.cranks.observe(event);

        let (phase, marker) = event.block()?;
        let first_event = self.block_events == 0;
        self.block_events += 1;

        let height = marker.height;
        if self.finalized.contains(&height) {
            tracing::warn!("Dropping {:?} for already finalized height {}", phase, height);
            return None;
        }

        if !self.blocks.contains_key(&height) {
            self.distinct_heights += 1;
        }
        let acc = self
            .blocks
            .entry(height)
            .or_insert_with(|| BlockAccumulator::new(marker));
        acc.record(phase, marker);

        if phase != BlockPhase::EndFinish {
            return None;
        }

        let warming_up = match self.config.warm_up {
            WarmUpPolicy::AnyPriorEvent => first_event,
            WarmUpPolicy::TwoHeights => self.distinct_heights < 2,
        };
        if warming_up {
            tracing::debug!("Warm-up: not reporting height {}", height);
            return None;
        }

        match self.cranks.snapshot() {
            Some(0) if self.config.zero_crank == ZeroCrankPolicy::TreatAsAbsent => {
                tracing::debug!("Crank 0 treated as absent at height {}", height);
            }
            Some(crank) => acc.last_crank = Some(crank),
            None => {}
        }

        if acc.begin_at.is_none() || acc.start_at.is_none() {
            tracing::warn!(
                "Height {} finished without begin-block or end-block-start",
                height
            );
        }

        acc.finalized = true;
        let curr = *acc;

        let prev = height
            .checked_sub(1)
            .and_then(|h| self.blocks.get(&h))
            .filter(|p| match self.config.predecessor {
                PredecessorPolicy::AnyAccumulator => true,
                PredecessorPolicy::FinalizedOnly => p.finalized,
            });
        let metric = compute(&curr, prev);

        self.remember_finalized(height);
        self.prune(height);
        Some(metric)
    }

    fn remember_finalized(&mut self, height: u64) {
        if let Some(last) = self.last_finalized {
            if height <= last {
                tracing::warn!("Height {} finalized after height {}", height, last);
            }
        }
        self.last_finalized = Some(height);

        self.finalized.insert(height);
        self.finalized_order.push_back(height);
        if self.finalized_order.len() > FINALIZED_HISTORY {
            if let Some(oldest) = self.finalized_order.pop_front() {
                self.finalized.remove(&oldest);
            }
        }
    }

    fn prune(&mut self, height: u64) {
        let keep = self.config.window_capacity as u64 + 1;
        let span = height.saturating_sub(keep)..=height.saturating_add(keep);
        self.blocks.retain(|h, _| span.contains(h));
    }

    /// Accumulator for a height, if still held
    pub fn accumulator(&self, height: u64) -> Option<&BlockAccumulator> {
        self.blocks.get(&height)
    }

    /// Number of accumulators currently held
    pub fn tracked_heights(&self) -> usize {
        self.blocks.len()
    }

    /// Whether `height` already produced a metric and is still remembered
    pub fn is_finalized(&self, height: u64) -> bool {
        self.finalized.contains(&height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(height: u64, chain_time: i64, at: f64) -> BlockMarker {
        BlockMarker {
            height,
            chain_time,
            at,
        }
    }

    fn block(tracker: &mut BlockTracker, height: u64, at: f64) -> Option<FinalizedMetric> {
        let chain = 1000 + 6 * height as i64;
        assert!(tracker.ingest(&Event::BeginBlock(marker(height, chain, at))).is_none());
        assert!(tracker
            .ingest(&Event::EndBlockStart(marker(height, chain, at + 0.1)))
            .is_none());
        tracker.ingest(&Event::EndBlockFinish(marker(height, chain, at + 0.5)))
    }

    #[test]
    fn test_first_height_has_no_predecessor_fields() {
        let mut tracker = BlockTracker::with_defaults();
        let m = block(&mut tracker, 1, 0.0).unwrap();
        assert_eq!(m.height, 1);
        assert!(m.cosmos_time.is_some());
        assert!(!m.has_predecessor());
    }

    #[test]
    fn test_finish_as_first_event_is_warm_up() {
        let mut tracker = BlockTracker::with_defaults();
        assert!(tracker
            .ingest(&Event::EndBlockFinish(marker(1, 1000, 0.5)))
            .is_none());
        let m = block(&mut tracker, 2, 6.0).unwrap();
        assert_eq!(m.block_time, Some(6.0));
        assert_eq!(m.lag, Some(6.0 - 1012.0));
    }

    #[test]
    fn test_deliver_does_not_end_warm_up() {
        let mut tracker = BlockTracker::with_defaults();
        assert!(tracker.ingest(&Event::Deliver { crank_num: Some(7) }).is_none());
        assert!(tracker
            .ingest(&Event::EndBlockFinish(marker(1, 1000, 0.5)))
            .is_none());

        let m = block(&mut tracker, 2, 6.0).unwrap();
        assert_eq!(m.height, 2);
        assert_eq!(m.cranks, None);
    }

    #[test]
    fn test_two_heights_warm_up() {
        let config = TrackerConfig {
            warm_up: WarmUpPolicy::TwoHeights,
            ..TrackerConfig::default()
        };
        let mut tracker = BlockTracker::new(config);
        assert!(block(&mut tracker, 1, 0.0).is_none());
        let m = block(&mut tracker, 2, 6.0).unwrap();
        assert!(m.has_predecessor());
    }

    #[test]
    fn test_duplicate_finish_is_ignored() {
        let mut tracker = BlockTracker::with_defaults();
        block(&mut tracker, 1, 0.0).unwrap();
        assert!(tracker
            .ingest(&Event::EndBlockFinish(marker(1, 1006, 0.9)))
            .is_none());
        assert_eq!(tracker.accumulator(1).unwrap().finish_at, Some(0.5));
    }

    #[test]
    fn test_zero_crank_policy() {
        let mut tracker = BlockTracker::with_defaults();
        tracker.ingest(&Event::Deliver { crank_num: Some(0) });
        block(&mut tracker, 1, 0.0).unwrap();
        assert_eq!(tracker.accumulator(1).unwrap().last_crank, None);

        let config = TrackerConfig {
            zero_crank: ZeroCrankPolicy::Record,
            ..TrackerConfig::default()
        };
        let mut tracker = BlockTracker::new(config);
        tracker.ingest(&Event::Deliver { crank_num: Some(0) });
        block(&mut tracker, 1, 0.0).unwrap();
        assert_eq!(tracker.accumulator(1).unwrap().last_crank, Some(0));
    }

    #[test]
    fn test_predecessor_policy() {
        // Height 1 never finishes.
        let feed = |tracker: &mut BlockTracker| {
            tracker.ingest(&Event::BeginBlock(marker(1, 1000, 0.0)));
            block(tracker, 2, 6.0).unwrap()
        };

        let mut tracker = BlockTracker::with_defaults();
        let m = feed(&mut tracker);
        assert_eq!(m.chain_block_time, Some(12));
        assert_eq!(m.block_time, None);

        let config = TrackerConfig {
            predecessor: PredecessorPolicy::FinalizedOnly,
            ..TrackerConfig::default()
        };
        let mut tracker = BlockTracker::new(config);
        assert!(!feed(&mut tracker).has_predecessor());
    }

    #[test]
    fn test_out_of_order_finish_is_tolerated() {
        let mut tracker = BlockTracker::with_defaults();
        block(&mut tracker, 1, 0.0).unwrap();
        let m = tracker
            .ingest(&Event::EndBlockFinish(marker(2, 1012, 6.5)))
            .unwrap();
        assert_eq!(m.cosmos_time, None);
        assert_eq!(m.swingset_time, None);
        assert_eq!(m.idle_time, None);
        assert_eq!(m.block_time, Some(6.0));
    }

    #[test]
    fn test_interleaved_events_before_finish() {
        let mut tracker = BlockTracker::with_defaults();
        block(&mut tracker, 1, 0.0).unwrap();
        tracker.ingest(&Event::EndBlockStart(marker(2, 1012, 6.1)));
        tracker.ingest(&Event::BeginBlock(marker(2, 1012, 6.0)));
        let m = tracker
            .ingest(&Event::EndBlockFinish(marker(2, 1012, 6.5)))
            .unwrap();
        assert!(m.cosmos_time.unwrap() > 0.0);
        assert_eq!(m.block_time, Some(6.0));
    }

    #[test]
    fn test_accumulators_are_pruned() {
        let config = TrackerConfig {
            window_capacity: 3,
            ..TrackerConfig::default()
        };
        let mut tracker = BlockTracker::new(config);
        for h in 1..=50 {
            block(&mut tracker, h, h as f64 * 6.0).unwrap();
        }
        assert_eq!(tracker.tracked_heights(), 5);
        assert!(tracker.is_finalized(10));
        assert!(tracker.accumulator(45).is_none());
        assert!(tracker.accumulator(46).is_some());

        // Stale heights are dropped instead of re-finalized.
        assert!(tracker
            .ingest(&Event::EndBlockFinish(marker(10, 1060, 1.0)))
            .is_none());
        assert_eq!(tracker.tracked_heights(), 5);
    }

    #[test]
    fn test_height_jump_does_not_block_later_heights() {
        let mut tracker = BlockTracker::with_defaults();
        let mut emitted = Vec::new();
        for h in 1..=5 {
            emitted.push(block(&mut tracker, h, h as f64 * 6.0).unwrap().height);
        }
        emitted.push(block(&mut tracker, 1_000_000, 36.0).unwrap().height);
        for h in 6..=40 {
            let m = block(&mut tracker, h, 36.0 + h as f64 * 6.0).unwrap();
            emitted.push(m.height);
        }

        let mut expected: Vec<u64> = (1..=5).collect();
        expected.push(1_000_000);
        expected.extend(6..=40);
        assert_eq!(emitted, expected);
        assert!(tracker.tracked_heights() <= 22);
        assert!(tracker.accumulator(1_000_000).is_none());
        assert!(tracker.is_finalized(1_000_000));
    }

    #[test]
    fn test_finalized_history_is_bounded() {
        let mut tracker = BlockTracker::with_defaults();
        let last = FINALIZED_HISTORY as u64 + 10;
        for h in 1..=last {
            block(&mut tracker, h, h as f64).unwrap();
        }
        assert!(!tracker.is_finalized(10));
        assert!(tracker.is_finalized(11));
        assert!(tracker.is_finalized(last));
    }
}
