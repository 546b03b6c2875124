//! Stroke engine
//!
//! Owns the timing filter, the current phase and the derived counters.
//! Each raw edge either disappears in the filter or advances the state
//! machine exactly once, in arrival order.

use crate::config::StrokeSettings;
use crate::state::{CyclePhase, Effects, Phase};
use crate::timing::TimingFilter;

use super::snapshot::Snapshot;

/// Rotation signal interpretation engine with an `N`-interval history
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeEngine<const N: usize> {
    settings: StrokeSettings,
    filter: TimingFilter<N>,
    phase: Phase,
    rev_count: u32,
    last_rev_time: u64,
    stroke_count: u32,
    last_stroke_time: u64,
    drag_factor: f32,
}

impl<const N: usize> StrokeEngine<N> {
    /// Create an engine in the `Stopped` phase with zeroed counters
    pub const fn new(settings: StrokeSettings) -> Self {
        Self {
            settings,
            filter: TimingFilter::new(),
            phase: Phase::Stopped,
            rev_count: 0,
            last_rev_time: 0,
            stroke_count: 0,
            last_stroke_time: 0,
            drag_factor: 0.0,
        }
    }

    /// Process a rotation edge timestamp (µs)
    ///
    /// Returns `false` if the filter dropped the edge, in which case
    /// nothing changed.
    pub fn ingest(&mut self, timestamp: u64) -> bool {
        let Some(edge) = self
            .filter
            .ingest(timestamp, self.settings.rotation_debounce_min_us)
        else {
            return false;
        };

        let transition = self
            .phase
            .transition(edge, self.filter.history(), &self.settings);

        self.phase = transition.next;
        self.apply(edge.timestamp, transition.effects);
        true
    }

    fn apply(&mut self, now: u64, effects: Effects) {
        if effects.revolution {
            self.rev_count = self.rev_count.saturating_add(1);
            self.last_rev_time = now;
        }
        if effects.stroke {
            self.stroke_count = self.stroke_count.saturating_add(1);
            self.last_stroke_time = now;
        }
        if let Some(drag_factor) = effects.drag_factor {
            self.drag_factor = drag_factor;
        }
    }

    /// Copy of the derived state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            last_rev_time: self.last_rev_time,
            rev_count: self.rev_count,
            last_stroke_time: self.last_stroke_time,
            stroke_count: self.stroke_count,
            interval: self.filter.history().newest(),
            drag_factor: self.drag_factor,
        }
    }

    /// Current cycle phase
    pub fn cycle_phase(&self) -> CyclePhase {
        self.phase.cycle_phase()
    }

    /// Active calibration
    pub fn settings(&self) -> &StrokeSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Engine = StrokeEngine<4>;

    /// Feed edges spaced by the given intervals (ms)
    fn row(engine: &mut Engine, clock: &mut u64, intervals_ms: &[u64]) {
        for &ms in intervals_ms {
            *clock += ms * 1000;
            assert!(engine.ingest(*clock), "edge at {} rejected", clock);
        }
    }

    /// Engine in Drive after six accelerating edges, plus its clock
    fn accelerating() -> (Engine, u64) {
        let mut engine = Engine::new(StrokeSettings::new());
        let mut clock = 0;
        row(&mut engine, &mut clock, &[200, 190, 180, 170, 160, 150]);
        (engine, clock)
    }

    /// Engine that just entered Recovery after one full drive
    fn coasting() -> (Engine, u64) {
        let (mut engine, mut clock) = accelerating();
        row(&mut engine, &mut clock, &[160, 170]);
        (engine, clock)
    }

    #[test]
    fn test_initial_state() {
        let engine = Engine::new(StrokeSettings::new());
        assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);
        assert_eq!(engine.snapshot(), Snapshot::default());
    }

    #[test]
    fn test_warm_up_then_drive() {
        let mut engine = Engine::new(StrokeSettings::new());
        let mut clock = 0;

        // Three edges fill three of four slots
        row(&mut engine, &mut clock, &[200, 190, 180]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);
        assert_eq!(engine.snapshot().rev_count, 0);

        // Fourth edge warms the history and it shows acceleration
        row(&mut engine, &mut clock, &[170]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);
        assert_eq!(engine.snapshot().rev_count, 1);
        assert_eq!(engine.snapshot().last_rev_time, 740_000);
    }

    #[test]
    fn test_accelerating_counts_every_revolution() {
        let (engine, clock) = accelerating();
        let snapshot = engine.snapshot();

        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);
        // Every edge from the one that warmed the history onwards
        assert_eq!(snapshot.rev_count, 3);
        assert_eq!(snapshot.last_rev_time, clock);
        assert_eq!(snapshot.interval, 150_000);
        assert_eq!(snapshot.stroke_count, 0);
    }

    #[test]
    fn test_drive_to_recovery_counts_one_stroke() {
        let (mut engine, mut clock) = accelerating();

        // One slower edge is not a trend yet
        row(&mut engine, &mut clock, &[160]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);
        assert_eq!(engine.snapshot().stroke_count, 0);

        row(&mut engine, &mut clock, &[170]);
        let snapshot = engine.snapshot();
        assert_eq!(engine.cycle_phase(), CyclePhase::Recovery);
        assert_eq!(snapshot.stroke_count, 1);
        assert_eq!(snapshot.last_stroke_time, clock);
        assert_eq!(snapshot.rev_count, 5);

        // Coasting further adds revolutions but no strokes
        row(&mut engine, &mut clock, &[180, 190]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Recovery);
        assert_eq!(engine.snapshot().stroke_count, 1);
        assert_eq!(engine.snapshot().rev_count, 7);
    }

    #[test]
    fn test_recovery_without_slowdown_keeps_drag() {
        let (mut engine, mut clock) = coasting();

        // Recovery started at 170ms/rev and the oldest interval when power
        // returns is also 170ms: no measurable slowdown
        row(&mut engine, &mut clock, &[180, 170, 160]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);
        assert_eq!(engine.snapshot().drag_factor, 0.0);
    }

    #[test]
    fn test_full_cycle_measures_drag() {
        let (mut engine, mut clock) = coasting();
        row(&mut engine, &mut clock, &[180, 170, 160]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);

        // Second stroke: accelerate, then coast from 150ms/rev
        row(&mut engine, &mut clock, &[150, 140, 130, 140, 150]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Recovery);
        assert_eq!(engine.snapshot().stroke_count, 2);

        row(&mut engine, &mut clock, &[160, 170, 160]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Recovery);

        // Power comes back; oldest interval is 160ms, recovery lasted 640ms
        row(&mut engine, &mut clock, &[150]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);

        let expected = 0.0802 * 10_000.0 / (core::f32::consts::TAU * 640_000.0);
        let drag = engine.snapshot().drag_factor;
        assert!(drag > expected * 0.999 && drag < expected * 1.001);
    }

    #[test]
    fn test_long_interval_in_recovery_stops() {
        let (mut engine, mut clock) = coasting();
        let before = engine.snapshot();

        row(&mut engine, &mut clock, &[400]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);
        assert_eq!(engine.phase, Phase::Stopped);

        // Stopping does not count a revolution and keeps the counters
        let after = engine.snapshot();
        assert_eq!(after.rev_count, before.rev_count);
        assert_eq!(after.stroke_count, before.stroke_count);
        assert_eq!(after.last_rev_time, before.last_rev_time);
        assert_eq!(after.interval, 400_000);
    }

    #[test]
    fn test_restart_after_stop_needs_power() {
        let (mut engine, mut clock) = coasting();
        row(&mut engine, &mut clock, &[400]);
        let stopped_revs = engine.snapshot().rev_count;

        // Still slowing down: stays stopped
        row(&mut engine, &mut clock, &[420]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);

        // One faster edge is not enough
        row(&mut engine, &mut clock, &[300]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);

        row(&mut engine, &mut clock, &[250]);
        assert_eq!(engine.cycle_phase(), CyclePhase::Drive);
        assert_eq!(engine.snapshot().rev_count, stopped_revs + 1);
    }

    #[test]
    fn test_dropped_edges_are_reported() {
        let (mut engine, clock) = accelerating();
        let before = engine.clone();

        // Bounce
        assert!(!engine.ingest(clock + 2_000));
        // Outlier: 40ms after a 150ms interval
        assert!(!engine.ingest(clock + 40_000));
        assert_eq!(engine, before);
    }

    proptest! {
        #[test]
        fn prop_counters_never_decrease(gaps in prop::collection::vec(0u64..500_000, 1..200)) {
            let mut engine = Engine::new(StrokeSettings::new());
            let mut clock = 0u64;
            let mut previous = engine.snapshot();

            for gap in gaps {
                clock += gap;
                engine.ingest(clock);
                let snapshot = engine.snapshot();
                prop_assert!(snapshot.rev_count >= previous.rev_count);
                prop_assert!(snapshot.stroke_count >= previous.stroke_count);
                prop_assert!(snapshot.last_rev_time >= previous.last_rev_time);
                prop_assert!(snapshot.drag_factor.is_finite());
                previous = snapshot;
            }
        }

        #[test]
        fn prop_cold_history_stays_stopped(gaps in prop::collection::vec(15_000u64..300_000, 1..4)) {
            // Fewer accepted edges than history slots can never leave Stopped
            let mut engine = Engine::new(StrokeSettings::new());
            let mut clock = 0u64;
            for gap in gaps {
                clock += gap;
                engine.ingest(clock);
                prop_assert_eq!(engine.cycle_phase(), CyclePhase::Stopped);
                prop_assert_eq!(engine.snapshot().rev_count, 0);
            }
        }

        #[test]
        fn prop_bounce_changes_nothing(
            prefix in prop::collection::vec(15_000u64..300_000, 0..30),
            bounce in 0u64..15_000,
        ) {
            let mut engine = Engine::new(StrokeSettings::new());
            let mut clock = 0u64;
            let mut last_accepted = true;
            for gap in prefix {
                clock += gap;
                last_accepted = engine.ingest(clock);
            }
            prop_assume!(last_accepted);
            let before = engine.clone();

            prop_assert!(!engine.ingest(clock + bounce));
            prop_assert_eq!(engine, before);
        }
    }
}
