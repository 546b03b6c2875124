//! Cycle phase definition and transition logic
//!
//! The flywheel is only ever driven during the drive; during the recovery it
//! coasts and slows down under air or magnetic resistance. Phase changes
//! are detected from the trend of the clean interval history, never from a
//! single sample.

use core::f32::consts::TAU;

use super::effects::{Effects, Transition};
use crate::config::StrokeSettings;
use crate::timing::{AcceptedEdge, IntervalHistory};

/// Rowing cycle phase, without its timing payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CyclePhase {
    /// Flywheel idle or no consistent rowing detected
    Stopped,
    /// Rower is pulling, flywheel accelerating
    Drive,
    /// Rower is returning, flywheel coasting
    Recovery,
}

/// Cycle phase with its phase-specific timing state
///
/// Timing state lives inside the variant it belongs to, so leaving a phase
/// discards it and the recovery entry velocity cannot be read before it
/// has been measured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for a warm history showing power
    #[default]
    Stopped,
    /// Drive in progress
    Drive {
        /// Estimated drive start (µs)
        start: u64,
        /// Drive duration as of the last edge (µs)
        duration: u64,
    },
    /// Recovery in progress
    Recovery {
        /// Estimated recovery start (µs)
        start: u64,
        /// Recovery duration as of the last edge (µs)
        duration: u64,
        /// Flywheel angular velocity when the recovery began (rad/µs)
        start_velocity: f32,
    },
}

/// Angular velocity for one revolution in `interval` µs (rad/µs)
///
/// Callers must only pass intervals from a warm history, which are
/// never zero.
fn angular_velocity(interval: u32) -> f32 {
    debug_assert!(interval != 0);
    TAU / interval as f32
}

impl Phase {
    /// Phase without timing state
    pub fn cycle_phase(&self) -> CyclePhase {
        match self {
            Phase::Stopped => CyclePhase::Stopped,
            Phase::Drive { .. } => CyclePhase::Drive,
            Phase::Recovery { .. } => CyclePhase::Recovery,
        }
    }

    /// Process an accepted edge and return the next phase
    ///
    /// `history` must already contain the edge's interval as its newest
    /// entry. This is the core state transition logic.
    pub fn transition<const N: usize>(
        self,
        edge: AcceptedEdge,
        history: &IntervalHistory<N>,
        settings: &StrokeSettings,
    ) -> Transition {
        let now = edge.timestamp;
        let threshold = settings.power_change_threshold;

        match self {
            // A long gap while coasting means the rower let go
            Phase::Recovery { .. } if edge.interval > settings.rotation_debounce_max_us => {
                Transition::quiet(Phase::Stopped)
            }

            Phase::Stopped => {
                if !history.is_warm() || history.flywheel_unpowered(threshold) {
                    return Transition::quiet(Phase::Stopped);
                }

                Transition::revolution(Phase::Drive {
                    start: now.saturating_sub(history.newest() as u64),
                    duration: 0,
                })
            }

            Phase::Drive { start, duration } => {
                if history.flywheel_unpowered(threshold) {
                    let newest = history.newest();
                    return Transition {
                        next: Phase::Recovery {
                            start: now.saturating_sub(newest as u64),
                            duration: 0,
                            start_velocity: angular_velocity(newest),
                        },
                        effects: Effects {
                            revolution: true,
                            // Too short to be a real stroke (bump, false trigger)
                            stroke: duration > settings.stroke_debounce_us as u64,
                            drag_factor: None,
                        },
                    };
                }

                Transition::revolution(Phase::Drive {
                    start,
                    duration: now.saturating_sub(start),
                })
            }

            Phase::Recovery {
                start,
                duration,
                start_velocity,
            } => {
                if history.flywheel_powered(threshold) {
                    let end_velocity = angular_velocity(history.oldest());
                    let plausible = start_velocity > end_velocity
                        && duration > 0
                        && duration < settings.max_drag_recovery_us as u64;

                    let drag_factor = plausible.then(|| {
                        -settings.flywheel_inertia
                            * (1.0 / start_velocity - 1.0 / end_velocity)
                            / duration as f32
                    });

                    return Transition {
                        next: Phase::Drive {
                            start: now.saturating_sub(history.newest() as u64),
                            duration: 0,
                        },
                        effects: Effects {
                            revolution: true,
                            stroke: false,
                            drag_factor,
                        },
                    };
                }

                Transition::revolution(Phase::Recovery {
                    start,
                    duration: now.saturating_sub(start),
                    start_velocity,
                })
            }
        }
    }
}
