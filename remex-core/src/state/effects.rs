//! Side effects produced by a phase transition

use super::machine::Phase;

/// Counter and drag factor updates requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Effects {
    /// Count one flywheel revolution at the edge timestamp
    pub revolution: bool,
    /// Count one stroke at the edge timestamp
    pub stroke: bool,
    /// Replace the drag factor with this value
    pub drag_factor: Option<f32>,
}

impl Effects {
    /// No side effects
    pub const NONE: Self = Self {
        revolution: false,
        stroke: false,
        drag_factor: None,
    };

    /// Only a revolution is counted
    pub const REVOLUTION: Self = Self {
        revolution: true,
        stroke: false,
        drag_factor: None,
    };
}

/// Result of feeding one accepted edge to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// Phase after this edge
    pub next: Phase,
    /// Updates to apply
    pub effects: Effects,
}

impl Transition {
    /// Move to `next` without touching any counter
    pub const fn quiet(next: Phase) -> Self {
        Self {
            next,
            effects: Effects::NONE,
        }
    }

    /// Move to `next` and count a revolution
    pub const fn revolution(next: Phase) -> Self {
        Self {
            next,
            effects: Effects::REVOLUTION,
        }
    }
}
