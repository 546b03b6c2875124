//! Remex Radio Link Protocol
//!
//! This crate defines what the sensor puts on the air and how it gets there:
//! the Bluetooth CSC measurement encoding, the drag factor presentation, and
//! the UART-based link to the BLE co-processor that owns the radio.
//!
//! # Link Overview
//!
//! All link messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The co-processor is a "dumb radio": it advertises, tracks connections and
//! forwards characteristic values verbatim. All sensor logic stays on the
//! RP2040.

#![no_std]
#![deny(unsafe_code)]

pub mod csc;
pub mod drag;
pub mod frame;
pub mod info;
pub mod messages;

pub use csc::{to_ble_ticks, CscError, CscMeasurement, CSC_FEATURES, SENSOR_LOCATION};
pub use drag::{display_drag_factor, distance_from_drag_factor, drag_text, DragText};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use info::InfoField;
pub use messages::{LinkMessage, RadioEvent};
