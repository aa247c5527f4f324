//! Bridge configuration
//!
//! `bridge.toml` is validated by the build script and baked in as
//! constants; edit it and rebuild to change the bridge.

use stovelink_core::BridgeConfig;

include!(concat!(env!("OUT_DIR"), "/bridge_config.rs"));

/// Configuration compiled into this build
pub fn bridge_config() -> BridgeConfig {
    BridgeConfig {
        host_baud: HOST_BAUD,
        heater_baud: HEATER_BAUD,
        read_timeout_ms: READ_TIMEOUT_MS,
        step_delay_ms: STEP_DELAY_MS,
        settle_delay_ms: SETTLE_DELAY_MS,
        cycle_pause_ms: CYCLE_PAUSE_MS,
        pellet_sensors_enabled: PELLET_SENSORS_ENABLED,
        pellet_max_distance_cm: PELLET_MAX_DISTANCE_CM,
    }
}
