//! Stovelink Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the bridge logic is written
//! against. Chip-specific crates implement or adapt them, so the poll cycle
//! runs unchanged on the target and against scripted links in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (stovelink-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stovelink-core / stovelink-drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stovelink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stovelink-hal-stm32                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication with read timeouts
//! - [`time::Clock`] - Monotonic microsecond time
//!
//! [`link::IoLink`] turns any `embedded-io` byte stream plus a clock into
//! a link implementing both UART traits.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod link;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use link::IoLink;
pub use time::Clock;
pub use uart::{Uart, UartConfig, UartRx, UartTx};
