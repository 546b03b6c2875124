//! Calibration settings
//!
//! Sensor-specific constants that drive the timing filter and the phase
//! detection. They are loaded by the firmware at boot.

pub mod settings;

pub use settings::*;
