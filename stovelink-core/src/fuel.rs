//! Fuel-level reporting
//!
//! Once per cycle each heater's hopper is ranged. The distance from sensor
//! to pellet surface is reported when it moves or when the cycle was
//! forced. A zero reading means no echo and is never sent.

use stovelink_protocol::{DeviceId, StatusUpdate, ValueType};

use crate::traits::RangeSensor;

/// One range sensor per heater, indexed like [`DeviceId::index`]
pub struct FuelReporter<S> {
    sensors: [S; 2],
    last_cm: [u16; 2],
}

impl<S: RangeSensor> FuelReporter<S> {
    pub fn new(sensors: [S; 2]) -> Self {
        Self {
            sensors,
            last_cm: [0; 2],
        }
    }

    /// Last distance taken for a heater, zero before the first reading
    pub fn last_cm(&self, device: DeviceId) -> u16 {
        self.last_cm[device.index()]
    }

    /// Range one heater and build its report if due
    pub fn check(&mut self, device: DeviceId, forced: bool) -> Option<StatusUpdate> {
        let slot = device.index();
        let reading = self.sensors[slot].read_distance_cm();

        if reading == self.last_cm[slot] && !forced {
            return None;
        }
        self.last_cm[slot] = reading;

        if reading == 0 {
            return None;
        }

        Some(StatusUpdate {
            device,
            value_type: ValueType::PelletLevel,
            value1: u8::try_from(reading).unwrap_or(u8::MAX),
            value2: 0,
        })
    }
}
