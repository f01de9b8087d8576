//! Input decoding
//!
//! Turns raw line samples from the rotary encoder and its push button
//! into discrete navigation and click events.

pub mod button;
pub mod decoder;
pub mod encoder;

pub use button::{ButtonDebouncer, ButtonEvent};
pub use decoder::{InputDecoder, InputFrame, InputSample};
pub use encoder::{EncoderDecoder, EncoderEvent};
