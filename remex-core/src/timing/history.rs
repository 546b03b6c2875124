//! Clean interval history
//!
//! Fixed-capacity, most-recent-first buffer of accepted inter-rotation
//! intervals. Index 0 is the newest interval, index `N - 1` the oldest.
//! Slots that have not been filled yet hold 0.

/// Rolling history of the last `N` accepted intervals (microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalHistory<const N: usize> {
    intervals: [u32; N],
}

impl<const N: usize> Default for IntervalHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> IntervalHistory<N> {
    /// Create an empty history
    pub const fn new() -> Self {
        Self { intervals: [0; N] }
    }

    /// Push a new interval to the front, dropping the oldest
    pub fn push(&mut self, interval: u32) {
        if N == 0 {
            return;
        }
        self.intervals.copy_within(0..N - 1, 1);
        self.intervals[0] = interval;
    }

    /// Most recent interval (0 until the first push)
    pub fn newest(&self) -> u32 {
        self.intervals.first().copied().unwrap_or(0)
    }

    /// Oldest interval still held (0 until the history is full)
    pub fn oldest(&self) -> u32 {
        self.intervals.last().copied().unwrap_or(0)
    }

    /// True once every slot holds a real interval
    pub fn is_warm(&self) -> bool {
        N > 0 && self.intervals.iter().all(|&interval| interval != 0)
    }

    /// Intervals, most recent first
    pub fn as_slice(&self) -> &[u32] {
        &self.intervals
    }

    /// Count adjacent pairs, oldest pair first, where `pred(older, newer)` holds
    fn count_pairs(&self, pred: impl Fn(u32, u32) -> bool) -> usize {
        self.intervals
            .windows(2)
            .rev()
            .filter(|pair| pred(pair[1], pair[0]))
            .count()
    }

    /// True when enough pairs show flat or growing intervals
    ///
    /// The angular distance per edge is fixed, so a longer interval means
    /// the flywheel is coasting down and nothing is driving it.
    pub fn flywheel_unpowered(&self, threshold: u8) -> bool {
        self.count_pairs(|older, newer| newer >= older) >= threshold as usize
    }

    /// True when enough pairs show shrinking intervals (acceleration)
    pub fn flywheel_powered(&self, threshold: u8) -> bool {
        self.count_pairs(|older, newer| newer < older) >= threshold as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn history_from_oldest(intervals: &[u32]) -> IntervalHistory<4> {
        let mut history = IntervalHistory::new();
        for &interval in intervals {
            history.push(interval);
        }
        history
    }

    #[test]
    fn test_push_shifts_and_drops_oldest() {
        let history = history_from_oldest(&[10, 20, 30, 40, 50]);
        assert_eq!(history.as_slice(), &[50, 40, 30, 20]);
        assert_eq!(history.newest(), 50);
        assert_eq!(history.oldest(), 20);
    }

    #[test]
    fn test_warm_up() {
        let mut history = IntervalHistory::<4>::new();
        assert!(!history.is_warm());
        for interval in [100, 90, 80] {
            history.push(interval);
            assert!(!history.is_warm());
        }
        history.push(70);
        assert!(history.is_warm());
    }

    #[test]
    fn test_accelerating_is_powered() {
        // Oldest to newest: shrinking intervals
        let history = history_from_oldest(&[100, 90, 80, 70]);
        assert!(history.flywheel_powered(2));
        assert!(!history.flywheel_unpowered(2));
    }

    #[test]
    fn test_decelerating_is_unpowered() {
        let history = history_from_oldest(&[70, 80, 90, 100]);
        assert!(history.flywheel_unpowered(2));
        assert!(!history.flywheel_powered(2));
    }

    #[test]
    fn test_flat_counts_as_unpowered() {
        let history = history_from_oldest(&[80, 80, 80, 80]);
        assert!(history.flywheel_unpowered(3));
        assert!(!history.flywheel_powered(1));
    }

    #[test]
    fn test_predicates_are_independent() {
        // Pairs: 100->90 (shrink), 90->95 (grow), 95->85 (shrink)
        let history = history_from_oldest(&[100, 90, 95, 85]);
        assert!(history.flywheel_powered(1));
        assert!(history.flywheel_unpowered(1));
        assert!(history.flywheel_powered(2));
        assert!(!history.flywheel_unpowered(2));
        assert!(!history.flywheel_powered(3));
        assert!(!history.flywheel_unpowered(3));
    }

    proptest! {
        #[test]
        fn prop_strictly_shrinking_is_powered(start in 1_000u32..1_000_000, steps in prop::array::uniform4(1u32..200)) {
            let mut history = IntervalHistory::<5>::new();
            let mut interval = start + 1_000;
            history.push(interval);
            for step in steps {
                interval -= step;
                history.push(interval);
            }
            for threshold in 1..=4u8 {
                prop_assert!(history.flywheel_powered(threshold));
                prop_assert!(!history.flywheel_unpowered(threshold));
            }
        }

        #[test]
        fn prop_non_shrinking_is_unpowered(start in 1u32..1_000_000, steps in prop::array::uniform4(0u32..200)) {
            let mut history = IntervalHistory::<5>::new();
            let mut interval = start;
            history.push(interval);
            for step in steps {
                interval += step;
                history.push(interval);
            }
            for threshold in 1..=4u8 {
                prop_assert!(history.flywheel_unpowered(threshold));
                prop_assert!(!history.flywheel_powered(threshold));
            }
        }
    }
}
