//! Combined encoder and button decoder

use super::button::{ButtonDebouncer, ButtonEvent};
use super::encoder::{EncoderDecoder, EncoderEvent};
use crate::config::InputTiming;
use crate::time::Millis;

/// Line levels read in one poll (`true` = electrically HIGH)
///
/// All three lines are active-low with pull-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    pub encoder_a: bool,
    pub encoder_b: bool,
    pub button: bool,
}

impl InputSample {
    /// All lines released
    pub const IDLE: Self = Self {
        encoder_a: true,
        encoder_b: true,
        button: true,
    };

    pub const fn button_pressed(&self) -> bool {
        !self.button
    }
}

impl Default for InputSample {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Events decoded from one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputFrame {
    pub encoder: Option<EncoderEvent>,
    pub button: Option<ButtonEvent>,
    /// Raw, undebounced button level
    pub button_down: bool,
}

impl InputFrame {
    /// Whether the frame carries a navigation or click event
    pub fn has_event(&self) -> bool {
        self.encoder.is_some() || self.button.is_some()
    }
}

/// Input decoder for the encoder and its push button
#[derive(Debug, Clone)]
pub struct InputDecoder {
    encoder: EncoderDecoder,
    button: ButtonDebouncer,
}

impl InputDecoder {
    pub const fn new(timing: &InputTiming) -> Self {
        Self {
            encoder: EncoderDecoder::new(timing.encoder_min_edge_ms),
            button: ButtonDebouncer::new(timing.debounce_ms, timing.long_press_ms),
        }
    }

    /// Decode one sample
    ///
    /// Yields at most one encoder event and one button event.
    pub fn poll(&mut self, sample: InputSample, now: Millis) -> InputFrame {
        let pressed = sample.button_pressed();
        InputFrame {
            encoder: self.encoder.update(sample.encoder_a, sample.encoder_b, now),
            button: self.button.update(pressed, now),
            button_down: pressed,
        }
    }

    /// Swallow the button press in progress
    pub fn suppress_current_press(&mut self) {
        self.button.suppress_current_press();
    }

    pub fn button_held(&self) -> bool {
        self.button.is_pressed()
    }
}
