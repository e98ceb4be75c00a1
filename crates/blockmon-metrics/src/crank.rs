//! Last-delivered crank tracking

use blockmon_types::Event;

/// Tracks the most recent crank number seen on a `deliver` record.
///
/// Values are taken as-is; a decreasing crank number shows up downstream
/// as a negative per-block crank count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrankTracker {
    last: Option<i64>,
}

impl CrankTracker {
    /// Create a tracker that has seen no deliveries
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from an event. Anything other than a numbered delivery is ignored.
    pub fn observe(&mut self, event: &Event) {
        if let Event::Deliver {
            crank_num: Some(n),
        } = event
        {
            self.last = Some(*n);
        }
    }

    /// Last observed crank number
    pub fn snapshot(&self) -> Option<i64> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockmon_types::BlockMarker;

    #[test]
    fn test_starts_absent() {
        assert_eq!(CrankTracker::new().snapshot(), None);
    }

    #[test]
    fn test_tracks_last_delivery() {
        let mut cranks = CrankTracker::new();
        cranks.observe(&Event::Deliver { crank_num: Some(5) });
        cranks.observe(&Event::Deliver { crank_num: Some(9) });
        assert_eq!(cranks.snapshot(), Some(9));
    }

    #[test]
    fn test_ignores_unnumbered_and_block_events() {
        let mut cranks = CrankTracker::new();
        cranks.observe(&Event::Deliver { crank_num: Some(3) });
        cranks.observe(&Event::Deliver { crank_num: None });
        cranks.observe(&Event::BeginBlock(BlockMarker {
            height: 1,
            chain_time: 0,
            at: 0.0,
        }));
        assert_eq!(cranks.snapshot(), Some(3));
    }

    #[test]
    fn test_does_not_enforce_monotonicity() {
        let mut cranks = CrankTracker::new();
        cranks.observe(&Event::Deliver { crank_num: Some(10) });
        cranks.observe(&Event::Deliver { crank_num: Some(4) });
        assert_eq!(cranks.snapshot(), Some(4));
    }
}
