//! Configuration types
//!
//! Timing and radio constants for the device. The firmware builds a
//! `DeviceConfig` at compile time from `device.toml`; nothing is persisted.

pub mod types;

pub use types::*;
