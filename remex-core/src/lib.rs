//! Board-agnostic rotation signal interpretation for the rowing sensor
//!
//! This crate contains everything that turns flywheel rotation timestamps
//! into rowing data, without depending on specific hardware:
//!
//! - Calibration settings (debounce windows, detection threshold, inertia)
//! - Timing filter (debounce, outlier rejection, clean interval history)
//! - Cycle phase state machine (Stopped / Drive / Recovery)
//! - Stroke engine with counters, drag factor and snapshots
//! - Shared wrapper for use across the edge and polling contexts

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod monitor;
pub mod state;
pub mod timing;

pub use config::{SettingsError, StrokeSettings};
pub use monitor::{SharedStrokeEngine, Snapshot, StrokeEngine};
pub use state::{CyclePhase, Phase};
pub use timing::{AcceptedEdge, IntervalHistory, TimingFilter};
