//! Radio Coprocessor Link Protocol
//!
//! The RP2040 host has no radio of its own. It drives a radio
//! coprocessor over UART using small binary frames:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The host sends one command at a time and waits for its ACK or NACK.
//! A scan is answered by zero or more SCAN_ENTRY frames followed by
//! SCAN_DONE.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{AdvParams, Band, HostCommand, NackCode, RadioReply, MAX_NAME_LEN};
