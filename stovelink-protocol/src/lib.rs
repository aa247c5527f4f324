//! Stovelink Host Link Protocol
//!
//! This crate defines the serial protocol between the bridge controller and
//! the host (home automation server). Frames have a fixed length in each
//! direction and end in an 8-bit additive checksum.
//!
//! # Protocol Overview
//!
//! Host → controller (4 bytes):
//! ```text
//! ┌───────────┬──────────────┬───────┬──────────┐
//! │ DEVICE ID │ COMMAND TYPE │ VALUE │ CHECKSUM │
//! └───────────┴──────────────┴───────┴──────────┘
//! ```
//!
//! Controller → host (5 bytes), either a status update:
//! ```text
//! ┌───────────┬────────────┬────────┬────────┬──────────┐
//! │ DEVICE ID │ VALUE TYPE │ VALUE1 │ VALUE2 │ CHECKSUM │
//! └───────────┴────────────┴────────┴────────┴──────────┘
//! ```
//! or an acknowledgement:
//! ```text
//! ┌───────────┬──────────┬──────────────┬──────┬──────────┐
//! │ DEVICE ID │ ACK CODE │ COMMAND TYPE │ 0x00 │ CHECKSUM │
//! └───────────┴──────────┴──────────────┴──────┴──────────┘
//! ```
//!
//! Device id 0 addresses the controller itself rather than a heater.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod checksum;
pub mod frame;
pub mod messages;

pub use checksum::{checksum, has_valid_checksum};
pub use frame::{
    AckNak, FrameError, InboundFrame, OutboundFrame, StatusUpdate, INBOUND_FRAME_LEN,
    OUTBOUND_FRAME_LEN,
};
pub use messages::{AckCode, DeviceId, HostRequest, ValueType, META_CHANNEL};
