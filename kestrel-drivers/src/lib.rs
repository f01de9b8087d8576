//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the capability traits
//! used by kestrel-core:
//!
//! - SH1106 128×64 OLED over I2C (a `DisplayBackend`)
//! - Radio coprocessor link over a byte stream (a `RadioGateway`)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod radio;

pub use display::Sh1106;
pub use radio::{Clock, LinkConfig, RadioLink};
