//! STM32-specific HAL for the Stovelink firmware
//!
//! This crate provides STM32-specific glue for use with `stovelink-hal`
//! traits. It supports chips with at least three USARTs, including:
//!
//! - STM32F401RE (Nucleo-64 bridge board)
//!
//! # Features
//!
//! - `stm32f401re` - Enable support for STM32F401RE
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware creates buffered USARTs with embassy-stm32 directly and
//! wraps them with the link constructors here, which attach the embassy
//! clock and the configured read timeout.

#![no_std]

pub mod time;
pub mod uart;

pub use time::EmbassyClock;
pub use uart::{heater_link, host_link, HeaterLink, HostLink, UartBusError};
