//! Inter-task communication
//!
//! Defines the static signals and flags shared between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// Signal that a heartbeat (PING) was received from the radio
pub static HEARTBEAT_RECEIVED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Signal that the radio was (re)connected and needs the static values again
pub static PUBLISH_REQUESTED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// A central is subscribed to CSC Measurement notifications
pub static CSC_SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// A central is subscribed to drag factor notifications
pub static DRAG_SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// Number of connected centrals
pub static CONNECTED: AtomicU8 = AtomicU8::new(0);

/// Record the subscription state reported by the radio
pub fn set_subscriptions(csc: bool, drag: bool) {
    CSC_SUBSCRIBED.store(csc, Ordering::Relaxed);
    DRAG_SUBSCRIBED.store(drag, Ordering::Relaxed);
}

/// Record the connection count; dropping to zero clears subscriptions
pub fn set_connected(count: u8) {
    CONNECTED.store(count, Ordering::Relaxed);
    if count == 0 {
        set_subscriptions(false, false);
    }
}
