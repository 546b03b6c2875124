//! Rotation edge timing filter
//!
//! Every edge goes through two checks before its interval is trusted:
//!
//! 1. Debounce: intervals shorter than the minimum are contact bounce.
//! 2. Plausibility: an interval cannot differ from the previous accepted
//!    interval by more than its own length.
//!
//! Rejected edges leave the filter exactly as it was.

use super::history::IntervalHistory;

/// An edge that passed the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcceptedEdge {
    /// Edge timestamp (µs)
    pub timestamp: u64,
    /// Interval since the previous accepted edge (µs)
    pub interval: u32,
}

/// Debouncing, outlier-rejecting interval filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingFilter<const N: usize> {
    /// Timestamp of the last accepted edge
    previous_timestamp: u64,
    /// Last accepted interval
    previous_interval: u32,
    /// Accepted intervals, most recent first
    history: IntervalHistory<N>,
}

impl<const N: usize> Default for TimingFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TimingFilter<N> {
    /// Create a filter with an empty history
    pub const fn new() -> Self {
        Self {
            previous_timestamp: 0,
            previous_interval: 0,
            history: IntervalHistory::new(),
        }
    }

    /// Feed a raw edge timestamp
    ///
    /// Returns the accepted edge, or `None` if the edge was dropped as
    /// bounce or noise.
    pub fn ingest(&mut self, timestamp: u64, debounce_min_us: u32) -> Option<AcceptedEdge> {
        let elapsed = timestamp.saturating_sub(self.previous_timestamp);
        let interval = u32::try_from(elapsed).unwrap_or(u32::MAX);

        if interval < debounce_min_us {
            return None;
        }

        if interval.abs_diff(self.previous_interval) > interval {
            return None;
        }

        self.history.push(interval);
        self.previous_interval = interval;
        self.previous_timestamp = timestamp;

        Some(AcceptedEdge {
            timestamp,
            interval,
        })
    }

    /// Clean interval history
    pub fn history(&self) -> &IntervalHistory<N> {
        &self.history
    }
}
