//! Bridge configuration
//!
//! The firmware fills this from constants generated out of `bridge.toml`
//! at build time. `Default` carries the values the bridge has always run
//! with.

use stovelink_hal::UartConfig;

/// Runtime parameters of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Host link baud rate
    pub host_baud: u32,
    /// Heater service port baud rate (both heaters)
    pub heater_baud: u32,
    /// Quiet time after which a heater read gives up (ms)
    pub read_timeout_ms: u32,
    /// Pause after each device poll and between ordinary ticks (ms)
    pub step_delay_ms: u32,
    /// Wait for the rest of a partially received host frame (ms)
    pub settle_delay_ms: u32,
    /// Pause at every cycle wrap (ms)
    pub cycle_pause_ms: u32,
    /// Run the fuel-level check at cycle wrap
    pub pellet_sensors_enabled: bool,
    /// Ranging cutoff; anything further reads as no echo (cm)
    pub pellet_max_distance_cm: u16,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host_baud: 19_200,
            heater_baud: 1_200,
            read_timeout_ms: 1_000,
            step_delay_ms: 10,
            settle_delay_ms: 10,
            cycle_pause_ms: 1_000,
            pellet_sensors_enabled: true,
            pellet_max_distance_cm: 200,
        }
    }
}

impl BridgeConfig {
    /// Host link: 8N1 on separate wires
    pub fn host_uart(&self) -> UartConfig {
        UartConfig::full_duplex(self.host_baud)
    }

    /// Heater links: 8N1 on the single service wire
    pub fn heater_uart(&self) -> UartConfig {
        UartConfig::single_wire(self.heater_baud)
    }
}
