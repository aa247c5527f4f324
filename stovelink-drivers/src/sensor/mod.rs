//! Sensor drivers

pub mod ultrasonic;

pub use ultrasonic::{echo_to_cm, Ultrasonic, US_ROUNDTRIP_CM};
