//! Point-in-time view of the derived rowing data

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Consistent copy of everything the stroke engine exposes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Timestamp of the last counted revolution (µs)
    pub last_rev_time: u64,
    /// Flywheel revolutions counted since power-on
    pub rev_count: u32,
    /// Timestamp of the last counted stroke (µs)
    pub last_stroke_time: u64,
    /// Strokes counted since power-on
    pub stroke_count: u32,
    /// Most recent clean interval (µs, 0 before the first edge)
    pub interval: u32,
    /// Last accepted drag factor measurement (0 until measured)
    pub drag_factor: f32,
}
