//! Remex - Rowing Machine Stroke Sensor Firmware
//!
//! Main firmware binary for RP2040-based rowing sensors. Times flywheel
//! revolutions from a reed switch, turns them into strokes and drag, and
//! hands the results to a BLE co-processor as Cycling Speed and Cadence
//! notifications.
//!
//! Named after the Latin "remex" (rower).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use remex_core::SharedStrokeEngine;

use crate::config::{parse_config, DeviceInfo, RowerConfig, HISTORY_LEN};

mod channels;
mod config;
mod tasks;

/// Stroke engine shared by the rotation and radio tasks
pub type Engine = SharedStrokeEngine<CriticalSectionRawMutex, HISTORY_LEN>;

/// Embedded configuration (compiled into firmware)
/// Edit rower.toml and rebuild to recalibrate
const EMBEDDED_CONFIG: &str = include_str!("../rower.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// High-priority executor for edge capture
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

// Shared state (must live forever for task references)
static ENGINE: StaticCell<Engine> = StaticCell::new();
static DEVICE_INFO: StaticCell<DeviceInfo> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Remex firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Stroke settings: debounce {}-{} us, threshold {}, notify every {} ms",
        config.stroke.rotation_debounce_min_us,
        config.stroke.rotation_debounce_max_us,
        config.stroke.power_change_threshold,
        config.link.notify_interval_ms
    );

    let engine: &'static Engine = ENGINE.init(Engine::new(config.stroke));
    let device: &'static DeviceInfo = DEVICE_INFO.init(config.device);

    // Setup UART for the radio co-processor
    // Pin assignments are board-specific (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.link.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for radio link");

    // Reed switch pulls the rotation input low once per revolution
    // Pin assignment is board-specific (GPIO2)
    let sensor = Input::new(p.PIN_2, Pull::Up);

    // Edge capture preempts everything running on the thread executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(high_spawner.spawn(tasks::rotation_task(sensor, engine)));

    let notify_interval = Duration::from_millis(u64::from(config.link.notify_interval_ms));
    unwrap!(spawner.spawn(tasks::radio_rx_task(rx)));
    unwrap!(spawner.spawn(tasks::radio_tx_task(tx, engine, device, notify_interval)));

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!(
            "Main loop heartbeat: phase {:?}, {} strokes",
            engine.cycle_phase(),
            engine.snapshot().stroke_count
        );
    }
}

/// Parse the embedded configuration
///
/// Falls back to the built-in defaults if rower.toml does not parse or
/// does not validate. build.rs rejects most such files, so this only
/// happens during development.
fn load_config() -> RowerConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            RowerConfig::default()
        }
    }
}
