//! Hardware abstraction traits
//!
//! These traits define the interface between the bridge logic and
//! sensor drivers.

pub mod ranging;

pub use ranging::RangeSensor;
