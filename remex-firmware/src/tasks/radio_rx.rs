//! Radio UART receive task
//!
//! Receives frames from the BLE co-processor and records link state.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use remex_protocol::{FrameParser, RadioEvent};

use crate::channels::{set_connected, set_subscriptions, HEARTBEAT_RECEIVED, PUBLISH_REQUESTED};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Radio RX task - receives and parses frames from the co-processor
#[embassy_executor::task]
pub async fn radio_rx_task(mut rx: BufferedUartRx) {
    info!("Radio RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(frame)) => match RadioEvent::from_frame(&frame) {
                    Ok(event) => handle_radio_event(event),
                    Err(e) => warn!("Failed to parse radio event: {:?}", e),
                },
                Ok(None) => {}
                Err(e) => warn!("Frame parse error: {:?}", e),
            }
        }
    }
}

/// Handle a parsed radio event
fn handle_radio_event(event: RadioEvent) {
    match event {
        RadioEvent::Ping => {
            trace!("PING received");
            HEARTBEAT_RECEIVED.signal(());
        }
        RadioEvent::Subscriptions { csc, drag } => {
            debug!("Subscriptions: csc={} drag={}", csc, drag);
            set_subscriptions(csc, drag);
        }
        RadioEvent::Connected(count) => {
            info!("Connected centrals: {}", count);
            set_connected(count);
            // Zero follows a radio reset or the last disconnect
            if count == 0 {
                PUBLISH_REQUESTED.signal(());
            }
        }
    }
}
