//! Board-agnostic core logic for the pellet heater bridge
//!
//! This crate contains all bridge logic that does not depend on a
//! specific board:
//!
//! - Register tables and write commands for both heater models
//! - Response cache and change detection
//! - Device poller
//! - Host command processor with write verification
//! - Fuel-level reporting from a ranging sensor
//! - Cycle scheduler tying it together
//!
//! Nothing here logs. Every step returns a typed outcome and the firmware
//! decides what to print.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod config;
pub mod device;
pub mod fuel;
pub mod host;
pub mod poller;
pub mod scheduler;
pub mod traits;

#[cfg(test)]
mod mock;

pub use config::BridgeConfig;
pub use scheduler::{Bridge, CycleState, TickReport};
