//! Configuration loading and parsing
//!
//! The configuration is embedded at build time from rower.toml and parsed
//! at boot by a custom no_std parser.

pub mod toml;

pub use toml::{parse_config, ParseError};

use heapless::String;
use remex_core::StrokeSettings;
use remex_protocol::InfoField;

/// Clean interval history length used by the firmware
pub const HISTORY_LEN: usize = 4;

/// Longest device information string
pub const MAX_DEVICE_STRING: usize = 32;

/// Device information string storage
pub type DeviceString = String<MAX_DEVICE_STRING>;

/// Radio link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkSettings {
    /// Co-processor UART speed
    pub baud_rate: u32,
    /// Period of CSC and drag notifications (ms)
    pub notify_interval_ms: u32,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            notify_interval_ms: 1_000,
        }
    }
}

/// Device Information Service strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: DeviceString,
    pub manufacturer: DeviceString,
    pub model: DeviceString,
    pub serial: DeviceString,
    pub software_revision: DeviceString,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            name: device_string("CSC-Sensor"),
            manufacturer: device_string("ZOCO BODY FIT"),
            model: device_string("AR-C2"),
            serial: device_string("20220104"),
            software_revision: device_string(env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DeviceInfo {
    /// String published for a Device Information field
    pub fn field(&self, field: InfoField) -> &str {
        match field {
            InfoField::DeviceName => &self.name,
            InfoField::Manufacturer => &self.manufacturer,
            InfoField::Model => &self.model,
            InfoField::Serial => &self.serial,
            InfoField::SoftwareRevision => &self.software_revision,
        }
    }

    /// Mutable access for the parser
    fn field_mut(&mut self, field: InfoField) -> &mut DeviceString {
        match field {
            InfoField::DeviceName => &mut self.name,
            InfoField::Manufacturer => &mut self.manufacturer,
            InfoField::Model => &mut self.model,
            InfoField::Serial => &mut self.serial,
            InfoField::SoftwareRevision => &mut self.software_revision,
        }
    }
}

/// Truncating conversion for built-in defaults
fn device_string(text: &str) -> DeviceString {
    let mut out = DeviceString::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Complete firmware configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowerConfig {
    pub stroke: StrokeSettings,
    pub link: LinkSettings,
    pub device: DeviceInfo,
}
