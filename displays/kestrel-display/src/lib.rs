//! Display abstraction and menu renderer for Kestrel
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-addressed displays
//! - `Screen`, an 8×21 character buffer with per-row highlight
//! - `MenuRenderer`, which lays out a titled list on a `Screen` and
//!   paints it through any backend, implementing the core's
//!   `RenderGateway`
//!
//! Hardware backends (the SH1106 OLED) live in `kestrel-drivers`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod renderer;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use renderer::{MenuRenderer, LIST_ROWS};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
