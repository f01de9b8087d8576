//! Board-agnostic core logic for the Kestrel handheld radio tool
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Input decoding (encoder edges, debounced push button)
//! - Static menu tree and cursor model
//! - Flood action scheduler (cooperative, non-blocking)
//! - Controller running one poll loop iteration
//! - Radio and render gateway traits
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod menu;
pub mod scheduler;
pub mod time;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{Controller, PollOutcome};
pub use events::AppEvent;
