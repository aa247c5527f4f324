//! Cycle scheduler
//!
//! Drives the poll cycle: both heaters at the shared cursor, then the host
//! command drain, then the cursor step with its wrap-time work.

pub mod bridge;
pub mod cycle;

pub use bridge::{Bridge, TickReport};
pub use cycle::{CycleState, Rollover};
