//! Register tables of the two heater models
//!
//! Each heater is read through an ordered list of probes. A probe names
//! one or two register addresses, the value type it reports as and how the
//! raw response turns into the reported value.

use core::ops::RangeInclusive;

use stovelink_protocol::{DeviceId, ValueType};

/// Header of the on/off write, shared by both models
pub const SWITCH_HEADER: [u8; 2] = [0x80, 0xE8];

/// State byte that switches a heater on
pub const STATE_ON: u8 = 0x55;

/// State byte that switches a heater off
pub const STATE_OFF: u8 = 0xAA;

/// How the raw response becomes `value1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transform {
    /// `value1 = raw[1]`
    Identity,
    /// The register reports one more than the value (wrapping)
    MinusOne,
    /// `(0x04, 0x00)` is off, `(0x05, 0x01)` is on
    StandbyPattern,
}

impl Transform {
    /// Derive `value1` from a raw response
    ///
    /// `None` when the response does not match a pattern the transform
    /// knows about.
    pub fn apply(self, raw: &[u8; 4]) -> Option<u8> {
        match self {
            Transform::Identity => Some(raw[1]),
            Transform::MinusOne => Some(raw[1].wrapping_sub(1)),
            Transform::StandbyPattern => match (raw[0], raw[1]) {
                (0x04, 0x00) => Some(0),
                (0x05, 0x01) => Some(1),
                _ => None,
            },
        }
    }

    /// Raw encoding of a value written to the heater
    pub fn encode(self, value: u8) -> u8 {
        match self {
            Transform::MinusOne => value.wrapping_add(1),
            Transform::Identity | Transform::StandbyPattern => value,
        }
    }
}

/// One logical measurement probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterCommand {
    /// Also read `second_address` (values wider than one byte)
    pub read_second: bool,
    pub first_address: [u8; 2],
    pub second_address: [u8; 2],
    /// Tag of the status update this probe produces
    pub value_type: ValueType,
    pub transform: Transform,
}

impl RegisterCommand {
    const fn single(address: [u8; 2], value_type: ValueType, transform: Transform) -> Self {
        Self {
            read_second: false,
            first_address: address,
            second_address: [0x00, 0x00],
            value_type,
            transform,
        }
    }

    const fn pair(first: [u8; 2], second: [u8; 2], value_type: ValueType) -> Self {
        Self {
            read_second: true,
            first_address: first,
            second_address: second,
            value_type,
            transform: Transform::Identity,
        }
    }

    /// Number of response bytes a complete read returns
    pub fn response_len(&self) -> usize {
        if self.read_second {
            4
        } else {
            2
        }
    }
}

/// How bytes must be put on a heater's service wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Turnaround {
    /// Flush after every byte before sending the next
    PerByte,
    /// Send the whole command in one write
    Block,
}

/// Static description of one heater model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub id: DeviceId,
    pub probes: &'static [RegisterCommand],
    pub turnaround: Turnaround,
    /// Header of the set-power write
    pub power_header: [u8; 2],
    /// Power levels the heater accepts
    pub power_range: RangeInclusive<u8>,
}

impl DeviceProfile {
    /// Number of probes in the table
    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Probe at a cursor position, `None` past the end of the table
    pub fn probe(&self, position: usize) -> Option<&'static RegisterCommand> {
        self.probes.get(position)
    }

    /// Position of the probe reporting `value_type`
    pub fn probe_index(&self, value_type: ValueType) -> Option<usize> {
        self.probes.iter().position(|p| p.value_type == value_type)
    }
}

// Living room stove
const HEATER_1_PROBES: [RegisterCommand; 6] = [
    RegisterCommand::single([0x20, 0x00], ValueType::State, Transform::Identity),
    RegisterCommand::single([0x00, 0xE7], ValueType::Power, Transform::MinusOne),
    // value2 is the high byte above 255 °C
    RegisterCommand::pair([0x00, 0x5F], [0x00, 0x60], ValueType::SmokeTemperature),
    RegisterCommand::single([0x20, 0x71], ValueType::Ventilation, Transform::Identity),
    RegisterCommand::single([0x20, 0x64], ValueType::Standby, Transform::Identity),
    RegisterCommand::single([0x20, 0xEB], ValueType::Mode, Transform::Identity),
];

// Cellar stove
const HEATER_2_PROBES: [RegisterCommand; 4] = [
    RegisterCommand::single([0x00, 0x21], ValueType::State, Transform::Identity),
    RegisterCommand::single([0x20, 0xD0], ValueType::Power, Transform::Identity),
    RegisterCommand::single([0x00, 0x5C], ValueType::SmokeTemperature, Transform::Identity),
    RegisterCommand::single([0x20, 0xE4], ValueType::Standby, Transform::StandbyPattern),
];

/// Heater 1 (device id 1), single wire with per-byte turnaround
pub static HEATER_1: DeviceProfile = DeviceProfile {
    id: DeviceId::Heater1,
    probes: &HEATER_1_PROBES,
    turnaround: Turnaround::PerByte,
    power_header: [0xA0, 0x01],
    power_range: 1..=5,
};

/// Heater 2 (device id 2), block writes
pub static HEATER_2: DeviceProfile = DeviceProfile {
    id: DeviceId::Heater2,
    probes: &HEATER_2_PROBES,
    turnaround: Turnaround::Block,
    power_header: [0xA0, 0xD0],
    power_range: 0..=5,
};

/// Length of the longer table; the shared cursor runs over `0..MAX_PROBES`
pub const MAX_PROBES: usize = max(HEATER_1_PROBES.len(), HEATER_2_PROBES.len());

const fn max(a: usize, b: usize) -> usize {
    if a > b {
        a
    } else {
        b
    }
}

/// Profile of a heater
pub fn profile(device: DeviceId) -> &'static DeviceProfile {
    match device {
        DeviceId::Heater1 => &HEATER_1,
        DeviceId::Heater2 => &HEATER_2,
    }
}
