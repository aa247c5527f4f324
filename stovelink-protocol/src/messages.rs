//! Message vocabulary of the host link
//!
//! Identifiers carried inside frames:
//! - Device ids (heater 1, heater 2, and the controller meta channel)
//! - Value type tags of status updates
//! - Acknowledgement codes
//! - Host requests decoded from inbound frames

use crate::frame::InboundFrame;

/// Device id addressing the controller itself
pub const META_CHANNEL: u8 = 0x00;

// Command types: heater channels
pub const CMD_SWITCH: u8 = 0x00;
pub const CMD_SET_POWER: u8 = 0x01;

// Command types: meta channel
pub const CMD_FORCE_RESEND: u8 = 0x01;

// Wire format values
const VALUE_STATE: u8 = 0x00;
const VALUE_POWER: u8 = 0x01;
const VALUE_SMOKE_TEMPERATURE: u8 = 0x02;
const VALUE_AMBIENT_TEMPERATURE: u8 = 0x03;
const VALUE_VENTILATION: u8 = 0x04;
const VALUE_STANDBY: u8 = 0x05;
const VALUE_MODE: u8 = 0x06;
const VALUE_PELLET_LEVEL: u8 = 0x07;

const CODE_ACK: u8 = 0xFD;
const CODE_CONTROLLER_NAK: u8 = 0xFE;
const CODE_DEVICE_NAK: u8 = 0xFF;

/// One of the two heaters behind the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceId {
    /// Living room stove (device id 1)
    Heater1,
    /// Cellar stove (device id 2)
    Heater2,
}

impl DeviceId {
    /// Both heaters in polling order
    pub const ALL: [DeviceId; 2] = [DeviceId::Heater1, DeviceId::Heater2];

    /// Parse a device id from its wire format byte
    ///
    /// The meta channel (0) is not a device and yields `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(DeviceId::Heater1),
            2 => Some(DeviceId::Heater2),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            DeviceId::Heater1 => 1,
            DeviceId::Heater2 => 2,
        }
    }

    /// Zero-based slot for per-device arrays
    pub fn index(self) -> usize {
        match self {
            DeviceId::Heater1 => 0,
            DeviceId::Heater2 => 1,
        }
    }
}

/// Kind of value carried by a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueType {
    /// Operating state (off, ignition phases, running, cleaning)
    State,
    /// Power level
    Power,
    /// Flue gas temperature in °C; value2 is the high byte where available
    SmokeTemperature,
    /// Room temperature (reserved, not polled)
    AmbientTemperature,
    /// Circulation fan
    Ventilation,
    /// Standby on/off
    Standby,
    /// Fuel mode (0 = wood, 1 = pellet)
    Mode,
    /// Distance from sensor to pellet surface in cm
    PelletLevel,
}

impl ValueType {
    /// Parse a value type from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            VALUE_STATE => Some(ValueType::State),
            VALUE_POWER => Some(ValueType::Power),
            VALUE_SMOKE_TEMPERATURE => Some(ValueType::SmokeTemperature),
            VALUE_AMBIENT_TEMPERATURE => Some(ValueType::AmbientTemperature),
            VALUE_VENTILATION => Some(ValueType::Ventilation),
            VALUE_STANDBY => Some(ValueType::Standby),
            VALUE_MODE => Some(ValueType::Mode),
            VALUE_PELLET_LEVEL => Some(ValueType::PelletLevel),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            ValueType::State => VALUE_STATE,
            ValueType::Power => VALUE_POWER,
            ValueType::SmokeTemperature => VALUE_SMOKE_TEMPERATURE,
            ValueType::AmbientTemperature => VALUE_AMBIENT_TEMPERATURE,
            ValueType::Ventilation => VALUE_VENTILATION,
            ValueType::Standby => VALUE_STANDBY,
            ValueType::Mode => VALUE_MODE,
            ValueType::PelletLevel => VALUE_PELLET_LEVEL,
        }
    }
}

/// Second byte of an acknowledgement frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckCode {
    /// Command accepted (and confirmed by the heater, for heater commands)
    Ack,
    /// Controller rejected the frame (bad checksum, stray bytes)
    ControllerNak,
    /// Heater answered the write with something other than the expected echo
    DeviceNak,
}

impl AckCode {
    /// Parse an ack code from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CODE_ACK => Some(AckCode::Ack),
            CODE_CONTROLLER_NAK => Some(AckCode::ControllerNak),
            CODE_DEVICE_NAK => Some(AckCode::DeviceNak),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            AckCode::Ack => CODE_ACK,
            AckCode::ControllerNak => CODE_CONTROLLER_NAK,
            AckCode::DeviceNak => CODE_DEVICE_NAK,
        }
    }

    /// Returns true for either rejection code
    pub fn is_nak(&self) -> bool {
        !matches!(self, AckCode::Ack)
    }
}

/// Request decoded from a checksum-valid inbound frame
///
/// Decoding only checks the shape of a request. Value ranges that differ
/// per heater model (power levels) are validated by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostRequest {
    /// Report every value on the next full cycle, changed or not
    ForceResend,
    /// Switch a heater on or off
    Switch { device: DeviceId, on: bool },
    /// Set the power level of a heater
    SetPower { device: DeviceId, level: u8 },
    /// Anything else; the controller stays silent
    Unsupported,
}

impl HostRequest {
    /// Decode the request carried by a frame
    pub fn from_frame(frame: &InboundFrame) -> Self {
        if frame.device_id == META_CHANNEL {
            return match (frame.command_type, frame.value) {
                (CMD_FORCE_RESEND, 1) => HostRequest::ForceResend,
                _ => HostRequest::Unsupported,
            };
        }

        let Some(device) = DeviceId::from_byte(frame.device_id) else {
            return HostRequest::Unsupported;
        };

        match (frame.command_type, frame.value) {
            (CMD_SWITCH, 0) => HostRequest::Switch { device, on: false },
            (CMD_SWITCH, 1) => HostRequest::Switch { device, on: true },
            (CMD_SET_POWER, level) => HostRequest::SetPower { device, level },
            _ => HostRequest::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_roundtrip() {
        for byte in 0x00..=0x07 {
            let value_type = ValueType::from_byte(byte).unwrap();
            assert_eq!(value_type.to_byte(), byte);
        }
        assert!(ValueType::from_byte(0x08).is_none());
    }

    #[test]
    fn test_ack_codes() {
        assert_eq!(AckCode::Ack.to_byte(), 0xFD);
        assert_eq!(AckCode::ControllerNak.to_byte(), 0xFE);
        assert_eq!(AckCode::DeviceNak.to_byte(), 0xFF);
        assert!(!AckCode::Ack.is_nak());
        assert!(AckCode::DeviceNak.is_nak());
        assert!(AckCode::from_byte(0x00).is_none());
    }

    #[test]
    fn test_device_id() {
        assert_eq!(DeviceId::from_byte(1), Some(DeviceId::Heater1));
        assert_eq!(DeviceId::from_byte(2), Some(DeviceId::Heater2));
        assert_eq!(DeviceId::from_byte(META_CHANNEL), None);
        assert_eq!(DeviceId::from_byte(3), None);
        assert_eq!(DeviceId::Heater2.index(), 1);
    }

    #[test]
    fn test_decode_force_resend() {
        let frame = InboundFrame::new(0, 1, 1);
        assert_eq!(HostRequest::from_frame(&frame), HostRequest::ForceResend);

        // Other meta combinations are not requests
        let frame = InboundFrame::new(0, 1, 0);
        assert_eq!(HostRequest::from_frame(&frame), HostRequest::Unsupported);
        let frame = InboundFrame::new(0, 0, 1);
        assert_eq!(HostRequest::from_frame(&frame), HostRequest::Unsupported);
    }

    #[test]
    fn test_decode_switch() {
        let frame = InboundFrame::new(1, 0, 1);
        assert_eq!(
            HostRequest::from_frame(&frame),
            HostRequest::Switch {
                device: DeviceId::Heater1,
                on: true
            }
        );

        let frame = InboundFrame::new(2, 0, 0);
        assert_eq!(
            HostRequest::from_frame(&frame),
            HostRequest::Switch {
                device: DeviceId::Heater2,
                on: false
            }
        );

        // Only 0 and 1 are switch values
        let frame = InboundFrame::new(1, 0, 2);
        assert_eq!(HostRequest::from_frame(&frame), HostRequest::Unsupported);
    }

    #[test]
    fn test_decode_set_power_keeps_raw_level() {
        let frame = InboundFrame::new(2, 1, 9);
        assert_eq!(
            HostRequest::from_frame(&frame),
            HostRequest::SetPower {
                device: DeviceId::Heater2,
                level: 9
            }
        );
    }

    #[test]
    fn test_decode_unknown() {
        assert_eq!(
            HostRequest::from_frame(&InboundFrame::new(3, 0, 1)),
            HostRequest::Unsupported
        );
        assert_eq!(
            HostRequest::from_frame(&InboundFrame::new(1, 7, 1)),
            HostRequest::Unsupported
        );
    }
}
