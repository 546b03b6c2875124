//! Cycling Speed and Cadence measurement encoding
//!
//! Rowing apps read the CSC profile with flywheel revolutions in the wheel
//! fields and strokes in the crank fields:
//!
//! ```text
//! ┌───────┬───────────┬──────────┬──────────────┬─────────────┐
//! │ FLAGS │ REV COUNT │ REV TIME │ STROKE COUNT │ STROKE TIME │
//! │ 1B    │ u32 LE    │ u16 LE   │ u16 LE       │ u16 LE      │
//! └───────┴───────────┴──────────┴──────────────┴─────────────┘
//! ```
//!
//! Times are in 1/1024 s and wrap at 65536.

/// Wheel revolution data present
pub const FLAG_WHEEL_DATA: u8 = 0x01;

/// Crank revolution data present
pub const FLAG_CRANK_DATA: u8 = 0x02;

/// Flags byte sent with every measurement
pub const MEASUREMENT_FLAGS: u8 = FLAG_WHEEL_DATA | FLAG_CRANK_DATA;

/// CSC Feature characteristic value: wheel and crank revolution data supported
pub const CSC_FEATURES: [u8; 2] = [MEASUREMENT_FLAGS, 0x00];

/// Sensor Location characteristic value ("other")
pub const SENSOR_LOCATION: u8 = 0x00;

/// Encoded measurement size
pub const MEASUREMENT_SIZE: usize = 11;

const MICROS_PER_SECOND: u64 = 1_000_000;
const TICKS_PER_SECOND: u64 = 1024;

/// Errors when decoding a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CscError {
    /// Buffer is not exactly [`MEASUREMENT_SIZE`] bytes
    WrongLength,
    /// Flags byte is not [`MEASUREMENT_FLAGS`]
    UnsupportedFlags,
}

/// Convert a microsecond timestamp to CSC event time
///
/// Rounds to the nearest 1/1024 s (halves up) and keeps the low 16 bits.
pub fn to_ble_ticks(micros: u64) -> u16 {
    let seconds = micros / MICROS_PER_SECOND;
    let remainder = micros % MICROS_PER_SECOND;
    let fraction = (remainder * TICKS_PER_SECOND + MICROS_PER_SECOND / 2) / MICROS_PER_SECOND;

    // Only the low 16 bits survive, so wrapping here is harmless
    seconds
        .wrapping_mul(TICKS_PER_SECOND)
        .wrapping_add(fraction) as u16
}

/// One CSC measurement notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CscMeasurement {
    /// Cumulative flywheel revolutions
    pub rev_count: u32,
    /// Time of the last revolution (1/1024 s)
    pub rev_time: u16,
    /// Cumulative strokes, truncated to 16 bits
    pub stroke_count: u16,
    /// Time of the last stroke (1/1024 s)
    pub stroke_time: u16,
}

impl CscMeasurement {
    /// Build a measurement from counters and microsecond timestamps
    pub fn from_micros(
        rev_count: u32,
        last_rev_micros: u64,
        stroke_count: u32,
        last_stroke_micros: u64,
    ) -> Self {
        Self {
            rev_count,
            rev_time: to_ble_ticks(last_rev_micros),
            stroke_count: stroke_count as u16,
            stroke_time: to_ble_ticks(last_stroke_micros),
        }
    }

    /// Encode to the 11-byte characteristic value
    pub fn encode(&self) -> [u8; MEASUREMENT_SIZE] {
        let mut out = [0u8; MEASUREMENT_SIZE];
        out[0] = MEASUREMENT_FLAGS;
        out[1..5].copy_from_slice(&self.rev_count.to_le_bytes());
        out[5..7].copy_from_slice(&self.rev_time.to_le_bytes());
        out[7..9].copy_from_slice(&self.stroke_count.to_le_bytes());
        out[9..11].copy_from_slice(&self.stroke_time.to_le_bytes());
        out
    }

    /// Decode an 11-byte characteristic value
    pub fn decode(bytes: &[u8]) -> Result<Self, CscError> {
        if bytes.len() != MEASUREMENT_SIZE {
            return Err(CscError::WrongLength);
        }
        if bytes[0] != MEASUREMENT_FLAGS {
            return Err(CscError::UnsupportedFlags);
        }

        Ok(Self {
            rev_count: u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
            rev_time: u16::from_le_bytes([bytes[5], bytes[6]]),
            stroke_count: u16::from_le_bytes([bytes[7], bytes[8]]),
            stroke_time: u16::from_le_bytes([bytes[9], bytes[10]]),
        })
    }
}
