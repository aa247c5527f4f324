//! Frame encoding and decoding for the host link.
//!
//! Inbound format (host → controller, 4 bytes):
//! - DEVICE ID: 0 = controller, 1/2 = heater
//! - COMMAND TYPE
//! - VALUE
//! - CHECKSUM: sum of the three bytes before it, modulo 256
//!
//! Outbound format (controller → host, 5 bytes):
//! - DEVICE ID
//! - VALUE TYPE (status update) or ACK CODE (acknowledgement)
//! - VALUE1 (status update) or COMMAND TYPE (acknowledgement)
//! - VALUE2 (status update) or 0x00 (acknowledgement)
//! - CHECKSUM: sum of the four bytes before it, modulo 256

use crate::checksum::checksum;
use crate::messages::{AckCode, DeviceId, ValueType};

/// Length of a host → controller frame
pub const INBOUND_FRAME_LEN: usize = 4;

/// Length of a controller → host frame
pub const OUTBOUND_FRAME_LEN: usize = 5;

/// Errors that can occur during frame decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Checksum mismatch
    InvalidChecksum,
    /// Device id is not a heater
    UnknownDevice,
    /// Second byte is neither a value type nor an ack code
    UnknownValueType,
    /// Second byte looks like an ack code but is not one
    UnknownAckCode,
}

/// A command frame as received from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InboundFrame {
    pub device_id: u8,
    pub command_type: u8,
    pub value: u8,
    /// Checksum as sent, not as computed
    pub checksum: u8,
}

impl InboundFrame {
    /// Build a frame with a correct checksum
    pub fn new(device_id: u8, command_type: u8, value: u8) -> Self {
        Self {
            device_id,
            command_type,
            value,
            checksum: checksum(&[device_id, command_type, value]),
        }
    }

    /// Take the four raw bytes as received
    pub fn from_bytes(bytes: [u8; INBOUND_FRAME_LEN]) -> Self {
        Self {
            device_id: bytes[0],
            command_type: bytes[1],
            value: bytes[2],
            checksum: bytes[3],
        }
    }

    /// Raw wire bytes
    pub fn to_bytes(&self) -> [u8; INBOUND_FRAME_LEN] {
        [self.device_id, self.command_type, self.value, self.checksum]
    }

    /// Check the trailing checksum against the first three bytes
    pub fn verify(&self) -> Result<(), FrameError> {
        if checksum(&[self.device_id, self.command_type, self.value]) == self.checksum {
            Ok(())
        } else {
            Err(FrameError::InvalidChecksum)
        }
    }
}

/// Status report for one heater value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusUpdate {
    pub device: DeviceId,
    pub value_type: ValueType,
    pub value1: u8,
    pub value2: u8,
}

impl StatusUpdate {
    /// Encode to wire format
    pub fn encode(&self) -> [u8; OUTBOUND_FRAME_LEN] {
        seal([
            self.device.to_byte(),
            self.value_type.to_byte(),
            self.value1,
            self.value2,
        ])
    }
}

/// Acknowledgement of a host command
///
/// The device id is echoed verbatim from the inbound frame, so it may be
/// the meta channel or even an invalid id when the frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckNak {
    pub device_id: u8,
    pub code: AckCode,
    pub command_type: u8,
}

impl AckNak {
    /// Encode to wire format
    pub fn encode(&self) -> [u8; OUTBOUND_FRAME_LEN] {
        seal([
            self.device_id,
            self.code.to_byte(),
            self.command_type,
            0x00,
        ])
    }
}

/// Any controller → host frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutboundFrame {
    Status(StatusUpdate),
    Ack(AckNak),
}

impl OutboundFrame {
    /// Encode to wire format
    pub fn encode(&self) -> [u8; OUTBOUND_FRAME_LEN] {
        match self {
            OutboundFrame::Status(update) => update.encode(),
            OutboundFrame::Ack(ack) => ack.encode(),
        }
    }

    /// Decode a frame received from the controller (host side and tests)
    ///
    /// Ack codes occupy 0xFD..=0xFF, value types 0x00..=0x07; the second
    /// byte alone tells the two apart.
    pub fn decode(bytes: &[u8; OUTBOUND_FRAME_LEN]) -> Result<Self, FrameError> {
        if checksum(&bytes[..4]) != bytes[4] {
            return Err(FrameError::InvalidChecksum);
        }

        if bytes[1] >= 0xF0 {
            let code = AckCode::from_byte(bytes[1]).ok_or(FrameError::UnknownAckCode)?;
            return Ok(OutboundFrame::Ack(AckNak {
                device_id: bytes[0],
                code,
                command_type: bytes[2],
            }));
        }

        let device = DeviceId::from_byte(bytes[0]).ok_or(FrameError::UnknownDevice)?;
        let value_type = ValueType::from_byte(bytes[1]).ok_or(FrameError::UnknownValueType)?;

        Ok(OutboundFrame::Status(StatusUpdate {
            device,
            value_type,
            value1: bytes[2],
            value2: bytes[3],
        }))
    }
}

impl From<StatusUpdate> for OutboundFrame {
    fn from(update: StatusUpdate) -> Self {
        OutboundFrame::Status(update)
    }
}

impl From<AckNak> for OutboundFrame {
    fn from(ack: AckNak) -> Self {
        OutboundFrame::Ack(ack)
    }
}

/// Append the checksum to a four byte body
fn seal(body: [u8; 4]) -> [u8; OUTBOUND_FRAME_LEN] {
    [body[0], body[1], body[2], body[3], checksum(&body)]
}
