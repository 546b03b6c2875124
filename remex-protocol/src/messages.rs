//! Message types for the radio link
//!
//! Message types are divided into two categories:
//! - Radio → Firmware: heartbeat requests, subscription and connection state
//! - Firmware → Radio: characteristic values to publish or notify

use crate::csc::{CscMeasurement, CSC_FEATURES, MEASUREMENT_SIZE, SENSOR_LOCATION};
use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::info::InfoField;
use heapless::Vec;

// Message type IDs: Radio → Firmware
pub const MSG_PING: u8 = 0x01;
pub const MSG_SUBSCRIPTIONS: u8 = 0x02;
pub const MSG_CONNECTED: u8 = 0x03;

// Message type IDs: Firmware → Radio
pub const MSG_DEVICE_INFO: u8 = 0x20;
pub const MSG_CSC_FEATURE: u8 = 0x21;
pub const MSG_CSC_MEASUREMENT: u8 = 0x22;
pub const MSG_DRAG_FACTOR: u8 = 0x23;
pub const MSG_PONG: u8 = 0x24;

const SUBSCRIBED_CSC: u8 = 0x01;
const SUBSCRIBED_DRAG: u8 = 0x02;

/// Messages from the firmware to the radio
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMessage<'a> {
    /// Publish a Device Information string
    DeviceInfo { field: InfoField, text: &'a str },
    /// Publish CSC Feature and Sensor Location values
    CscFeature,
    /// Notify a CSC measurement
    CscMeasurement(CscMeasurement),
    /// Notify the drag factor text
    DragFactor(&'a str),
    /// Heartbeat response
    Pong,
}

impl<'a> LinkMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            LinkMessage::DeviceInfo { field, text } => {
                // Payload: [field][utf-8 text...]
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(field.to_byte())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(text.as_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;

                Frame::new(MSG_DEVICE_INFO, &payload)
            }
            LinkMessage::CscFeature => Frame::new(
                MSG_CSC_FEATURE,
                &[CSC_FEATURES[0], CSC_FEATURES[1], SENSOR_LOCATION],
            ),
            LinkMessage::CscMeasurement(measurement) => {
                Frame::new(MSG_CSC_MEASUREMENT, &measurement.encode())
            }
            LinkMessage::DragFactor(text) => Frame::new(MSG_DRAG_FACTOR, text.as_bytes()),
            LinkMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }

    /// Parse a message from a frame (radio side, and for testing)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_DEVICE_INFO => {
                let (&field, text) = frame
                    .payload
                    .split_first()
                    .ok_or(FrameError::InvalidFrame)?;
                let field = InfoField::from_byte(field).ok_or(FrameError::InvalidFrame)?;
                let text = core::str::from_utf8(text).map_err(|_| FrameError::InvalidFrame)?;
                Ok(LinkMessage::DeviceInfo { field, text })
            }
            MSG_CSC_FEATURE => {
                if frame.payload[..] != [CSC_FEATURES[0], CSC_FEATURES[1], SENSOR_LOCATION] {
                    return Err(FrameError::InvalidFrame);
                }
                Ok(LinkMessage::CscFeature)
            }
            MSG_CSC_MEASUREMENT => {
                if frame.payload.len() != MEASUREMENT_SIZE {
                    return Err(FrameError::InvalidFrame);
                }
                CscMeasurement::decode(&frame.payload)
                    .map(LinkMessage::CscMeasurement)
                    .map_err(|_| FrameError::InvalidFrame)
            }
            MSG_DRAG_FACTOR => core::str::from_utf8(&frame.payload)
                .map(LinkMessage::DragFactor)
                .map_err(|_| FrameError::InvalidFrame),
            MSG_PONG => Ok(LinkMessage::Pong),
            other => Err(FrameError::UnknownType(other)),
        }
    }
}

/// Events parsed from radio-originated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioEvent {
    /// Heartbeat request
    Ping,
    /// Whether any central is subscribed to each notifying characteristic
    Subscriptions { csc: bool, drag: bool },
    /// Number of connected centrals
    Connected(u8),
}

impl RadioEvent {
    /// Parse an event from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PING => Ok(RadioEvent::Ping),
            MSG_SUBSCRIPTIONS => {
                let &[bits] = frame.payload.as_slice() else {
                    return Err(FrameError::InvalidFrame);
                };
                Ok(RadioEvent::Subscriptions {
                    csc: bits & SUBSCRIBED_CSC != 0,
                    drag: bits & SUBSCRIBED_DRAG != 0,
                })
            }
            MSG_CONNECTED => {
                let &[count] = frame.payload.as_slice() else {
                    return Err(FrameError::InvalidFrame);
                };
                Ok(RadioEvent::Connected(count))
            }
            other => Err(FrameError::UnknownType(other)),
        }
    }

    /// Encode this event into a frame (radio side, and for testing)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            RadioEvent::Ping => Ok(Frame::empty(MSG_PING)),
            RadioEvent::Subscriptions { csc, drag } => {
                let mut bits = 0;
                if *csc {
                    bits |= SUBSCRIBED_CSC;
                }
                if *drag {
                    bits |= SUBSCRIBED_DRAG;
                }
                Frame::new(MSG_SUBSCRIPTIONS, &[bits])
            }
            RadioEvent::Connected(count) => Frame::new(MSG_CONNECTED, &[*count]),
        }
    }
}
