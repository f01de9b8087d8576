//! Action scheduler
//!
//! Runs the one resumable action (the advertisement flood) a slice at a
//! time from the poll loop, so input keeps being sampled between bursts.

pub mod flood;
pub mod identity;

pub use flood::{ActionScheduler, FloodState, TickOutcome, RECENT_ADDRESSES};
pub use identity::{random_address, random_identity, random_interval, Identity, IDENTITY_LEN};
