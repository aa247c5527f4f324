//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in stovelink-core:
//!
//! - Ultrasonic ranging (HC-SR04 style trigger/echo transducers)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod sensor;
