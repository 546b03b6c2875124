//! Radio UART transmit task
//!
//! Publishes the static characteristic values, answers heartbeats and
//! sends periodic CSC and drag notifications to the BLE co-processor.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;
use portable_atomic::Ordering;

use remex_core::Snapshot;
use remex_protocol::{
    display_drag_factor, drag_text, CscMeasurement, InfoField, LinkMessage, MAX_FRAME_SIZE,
};

use crate::channels::{CSC_SUBSCRIBED, DRAG_SUBSCRIBED, HEARTBEAT_RECEIVED, PUBLISH_REQUESTED};
use crate::config::DeviceInfo;
use crate::Engine;

/// Radio TX task - sends frames to the co-processor
#[embassy_executor::task]
pub async fn radio_tx_task(
    mut tx: BufferedUartTx,
    engine: &'static Engine,
    device: &'static DeviceInfo,
    notify_interval: Duration,
) {
    info!("Radio TX task started");

    publish_static(&mut tx, device).await;

    let mut ticker = Ticker::every(notify_interval);
    let mut last_stroke_count = 0;

    loop {
        match select3(
            ticker.next(),
            HEARTBEAT_RECEIVED.wait(),
            PUBLISH_REQUESTED.wait(),
        )
        .await
        {
            Either3::First(()) => {
                let snapshot = engine.snapshot();
                if snapshot.stroke_count != last_stroke_count {
                    last_stroke_count = snapshot.stroke_count;
                    debug!(
                        "Stroke {}: {} revolutions, drag {}",
                        snapshot.stroke_count,
                        snapshot.rev_count,
                        display_drag_factor(snapshot.drag_factor)
                    );
                }
                notify(&mut tx, &snapshot).await;
            }
            Either3::Second(()) => {
                send(&mut tx, &LinkMessage::Pong).await;
                trace!("PONG sent");
            }
            Either3::Third(()) => publish_static(&mut tx, device).await,
        }
    }
}

/// Send Device Information strings and CSC feature values
async fn publish_static(tx: &mut BufferedUartTx, device: &DeviceInfo) {
    for field in InfoField::ALL {
        let text = device.field(field);
        send(tx, &LinkMessage::DeviceInfo { field, text }).await;
    }
    send(tx, &LinkMessage::CscFeature).await;
    info!("Static characteristics published");
}

/// Notify subscribed characteristics with the current snapshot
async fn notify(tx: &mut BufferedUartTx, snapshot: &Snapshot) {
    if CSC_SUBSCRIBED.load(Ordering::Relaxed) {
        let measurement = CscMeasurement::from_micros(
            snapshot.rev_count,
            snapshot.last_rev_time,
            snapshot.stroke_count,
            snapshot.last_stroke_time,
        );
        send(tx, &LinkMessage::CscMeasurement(measurement)).await;
    }

    if DRAG_SUBSCRIBED.load(Ordering::Relaxed) {
        let text = drag_text(display_drag_factor(snapshot.drag_factor));
        send(tx, &LinkMessage::DragFactor(&text)).await;
    }
}

/// Encode and write one message; failures are logged and dropped
async fn send(tx: &mut BufferedUartTx, message: &LinkMessage<'_>) {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let len = match message.to_frame().and_then(|frame| frame.encode(&mut buf)) {
        Ok(len) => len,
        Err(e) => {
            warn!("Failed to encode link message: {:?}", e);
            return;
        }
    };

    if let Err(e) = tx.write_all(&buf[..len]).await {
        warn!("Failed to send frame: {:?}", e);
    }
}
