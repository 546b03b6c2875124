//! Rowing cycle phase state machine
//!
//! The phase is a function of the previous phase, the accepted edge and the
//! clean interval history. Transitions are pure: side effects on counters
//! and the drag factor are returned to the caller instead of applied.

pub mod effects;
pub mod machine;

pub use effects::{Effects, Transition};
pub use machine::{CyclePhase, Phase};
