//! Rotation timing
//!
//! Turns raw rotation edge timestamps into a history of clean,
//! physically plausible inter-rotation intervals.

pub mod filter;
pub mod history;

pub use filter::{AcceptedEdge, TimingFilter};
pub use history::IntervalHistory;
