//! Stroke engine shared between the edge context and the polling context
//!
//! The rotation edge handler runs at a higher priority than the code that
//! reads snapshots and can preempt it at any instruction. Both sides go
//! through a blocking mutex; with `CriticalSectionRawMutex` taking the lock
//! masks interrupts, which holds off edge delivery for the few instructions
//! needed to copy the counters, so a snapshot never mixes values from two
//! different edges. Neither side ever waits for the other.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::StrokeSettings;
use crate::state::CyclePhase;

use super::engine::StrokeEngine;
use super::snapshot::Snapshot;

/// Stroke engine behind a blocking mutex
///
/// Only [`ingest`](Self::ingest) mutates the engine; everything else is a
/// read under the same lock.
pub struct SharedStrokeEngine<M: RawMutex, const N: usize> {
    engine: Mutex<M, RefCell<StrokeEngine<N>>>,
}

impl<M: RawMutex, const N: usize> SharedStrokeEngine<M, N> {
    /// Wrap a fresh engine
    pub const fn new(settings: StrokeSettings) -> Self {
        Self {
            engine: Mutex::new(RefCell::new(StrokeEngine::new(settings))),
        }
    }

    /// Process a rotation edge timestamp (µs)
    ///
    /// Called from the edge context only. Bounded: one filter pass and one
    /// state transition.
    pub fn ingest(&self, timestamp: u64) -> bool {
        self.engine
            .lock(|engine| engine.borrow_mut().ingest(timestamp))
    }

    /// Consistent copy of the derived state
    pub fn snapshot(&self) -> Snapshot {
        self.engine.lock(|engine| engine.borrow().snapshot())
    }

    /// Current cycle phase
    pub fn cycle_phase(&self) -> CyclePhase {
        self.engine.lock(|engine| engine.borrow().cycle_phase())
    }
}
