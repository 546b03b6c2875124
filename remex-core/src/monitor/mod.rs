//! Stroke monitoring
//!
//! Ties the timing filter and the phase state machine together, keeps the
//! derived counters and hands out consistent snapshots of them.

pub mod engine;
pub mod shared;
pub mod snapshot;

pub use engine::StrokeEngine;
pub use shared::SharedStrokeEngine;
pub use snapshot::Snapshot;
