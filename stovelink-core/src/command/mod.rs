//! Host command handling
//!
//! Inbound frames are drained between poll steps, never in the middle of
//! one.

pub mod processor;

pub use processor::{CommandLog, CommandOutcome, CommandProcessor, MAX_LOGGED_COMMANDS};
