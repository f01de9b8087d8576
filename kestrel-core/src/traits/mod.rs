//! Capability traits
//!
//! These traits define the interface between the application logic
//! and the radio and display implementations.

pub mod radio;
pub mod render;

pub use radio::{AdvertiserConfig, Address, RadioError, RadioGateway, ScanEntry, ScanList};
pub use render::{RenderError, RenderGateway};
