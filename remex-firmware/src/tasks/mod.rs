//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals and the
//! shared stroke engine.

pub mod radio_rx;
pub mod radio_tx;
pub mod rotation;

pub use radio_rx::radio_rx_task;
pub use radio_tx::radio_tx_task;
pub use rotation::rotation_task;
