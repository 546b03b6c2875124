//! Device Information Service fields

/// Device Information characteristic the radio should publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InfoField {
    /// Advertised device name
    DeviceName,
    /// Manufacturer Name String
    Manufacturer,
    /// Model Number String
    Model,
    /// Serial Number String
    Serial,
    /// Software Revision String
    SoftwareRevision,
}

// Wire format values
const FIELD_DEVICE_NAME: u8 = 0x00;
const FIELD_MANUFACTURER: u8 = 0x01;
const FIELD_MODEL: u8 = 0x02;
const FIELD_SERIAL: u8 = 0x03;
const FIELD_SOFTWARE_REVISION: u8 = 0x04;

impl InfoField {
    /// Every field, in the order they are sent at boot
    pub const ALL: [InfoField; 5] = [
        InfoField::DeviceName,
        InfoField::Manufacturer,
        InfoField::Model,
        InfoField::Serial,
        InfoField::SoftwareRevision,
    ];

    /// Parse a field from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            FIELD_DEVICE_NAME => Some(InfoField::DeviceName),
            FIELD_MANUFACTURER => Some(InfoField::Manufacturer),
            FIELD_MODEL => Some(InfoField::Model),
            FIELD_SERIAL => Some(InfoField::Serial),
            FIELD_SOFTWARE_REVISION => Some(InfoField::SoftwareRevision),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            InfoField::DeviceName => FIELD_DEVICE_NAME,
            InfoField::Manufacturer => FIELD_MANUFACTURER,
            InfoField::Model => FIELD_MODEL,
            InfoField::Serial => FIELD_SERIAL,
            InfoField::SoftwareRevision => FIELD_SOFTWARE_REVISION,
        }
    }
}
