//! Write commands sent to a heater on behalf of the host

use stovelink_protocol::{checksum, HostRequest, ValueType};

use super::table::{DeviceProfile, STATE_OFF, STATE_ON, SWITCH_HEADER};

/// A verified register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteCommand {
    /// Header, state byte, checksum
    pub bytes: [u8; 4],
    /// Acknowledgement the heater must answer with
    pub expected: [u8; 2],
    /// Probe whose cached response reflects this write
    pub probe: usize,
    /// Raw value byte to cache once the write is acknowledged
    pub cached_value: u8,
}

impl WriteCommand {
    fn new(header: [u8; 2], state: u8, probe: usize, cached_value: u8) -> Self {
        let sum = checksum(&[header[0], header[1], state]);
        Self {
            bytes: [header[0], header[1], state, sum],
            // The heater echoes the checksum and the state byte
            expected: [sum, state],
            probe,
            cached_value,
        }
    }

    /// Build the write for a heater request
    ///
    /// Returns `None` for requests this heater does not take: meta
    /// requests, unsupported frames, power levels outside its range.
    pub fn for_request(profile: &DeviceProfile, request: &HostRequest) -> Option<Self> {
        match *request {
            HostRequest::Switch { device, on } if device == profile.id => {
                let state = if on { STATE_ON } else { STATE_OFF };
                let probe = profile.probe_index(ValueType::State)?;
                Some(Self::new(SWITCH_HEADER, state, probe, state))
            }
            HostRequest::SetPower { device, level } if device == profile.id => {
                if !profile.power_range.contains(&level) {
                    return None;
                }
                let probe = profile.probe_index(ValueType::Power)?;
                let cached_value = profile.probes[probe].transform.encode(level);
                Some(Self::new(profile.power_header, level, probe, cached_value))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::table::{HEATER_1, HEATER_2};
    use stovelink_protocol::DeviceId;

    fn switch(device: DeviceId, on: bool) -> HostRequest {
        HostRequest::Switch { device, on }
    }

    fn power(device: DeviceId, level: u8) -> HostRequest {
        HostRequest::SetPower { device, level }
    }

    #[test]
    fn test_switch_on() {
        let cmd = WriteCommand::for_request(&HEATER_1, &switch(DeviceId::Heater1, true)).unwrap();
        assert_eq!(cmd.bytes, [0x80, 0xE8, 0x55, 0xBD]);
        assert_eq!(cmd.expected, [0xBD, 0x55]);
        assert_eq!(cmd.probe, 0);
        assert_eq!(cmd.cached_value, 0x55);
    }

    #[test]
    fn test_switch_off() {
        let cmd = WriteCommand::for_request(&HEATER_2, &switch(DeviceId::Heater2, false)).unwrap();
        assert_eq!(cmd.bytes, [0x80, 0xE8, 0xAA, 0x12]);
        assert_eq!(cmd.expected, [0x12, 0xAA]);
    }

    #[test]
    fn test_heater_1_power() {
        let cmd = WriteCommand::for_request(&HEATER_1, &power(DeviceId::Heater1, 3)).unwrap();
        assert_eq!(cmd.bytes, [0xA0, 0x01, 0x03, 0xA4]);
        assert_eq!(cmd.expected, [0xA4, 0x03]);
        assert_eq!(cmd.probe, 1);
        // The power register reports level + 1
        assert_eq!(cmd.cached_value, 4);
    }

    #[test]
    fn test_heater_2_power() {
        let cmd = WriteCommand::for_request(&HEATER_2, &power(DeviceId::Heater2, 0)).unwrap();
        assert_eq!(cmd.bytes, [0xA0, 0xD0, 0x00, 0x70]);
        assert_eq!(cmd.expected, [0x70, 0x00]);
        assert_eq!(cmd.cached_value, 0);

        let cmd = WriteCommand::for_request(&HEATER_2, &power(DeviceId::Heater2, 5)).unwrap();
        assert_eq!(cmd.expected, [0x75, 0x05]);
    }

    #[test]
    fn test_out_of_range_power() {
        assert!(WriteCommand::for_request(&HEATER_1, &power(DeviceId::Heater1, 0)).is_none());
        assert!(WriteCommand::for_request(&HEATER_1, &power(DeviceId::Heater1, 6)).is_none());
        assert!(WriteCommand::for_request(&HEATER_2, &power(DeviceId::Heater2, 6)).is_none());
    }

    #[test]
    fn test_other_requests() {
        assert!(WriteCommand::for_request(&HEATER_1, &HostRequest::ForceResend).is_none());
        assert!(WriteCommand::for_request(&HEATER_1, &HostRequest::Unsupported).is_none());
        // Request addressed to the other heater
        assert!(WriteCommand::for_request(&HEATER_1, &switch(DeviceId::Heater2, true)).is_none());
    }
}
