//! Embassy async tasks
//!
//! The bridge is a single blocking loop; one task owns it and paces it.

pub mod bridge;

pub use bridge::{bridge_task, FirmwareBridge, Pacing, PelletSensor};
