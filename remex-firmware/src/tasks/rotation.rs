//! Flywheel rotation capture task
//!
//! Runs on the high-priority interrupt executor so edge timestamps are
//! taken as close to the reed switch closing as possible. Each falling
//! edge is handed straight to the stroke engine; the engine does all the
//! filtering.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use crate::Engine;

/// Rotation task - timestamps every falling edge of the rotation input
#[embassy_executor::task]
pub async fn rotation_task(mut sensor: Input<'static>, engine: &'static Engine) {
    info!("Rotation task started");

    loop {
        sensor.wait_for_falling_edge().await;
        engine.ingest(Instant::now().as_micros());
    }
}
