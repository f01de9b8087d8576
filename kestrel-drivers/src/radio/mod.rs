//! Radio drivers

pub mod link;

pub use link::{Clock, LinkConfig, RadioLink};
