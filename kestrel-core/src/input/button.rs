//! Push button debouncing and press classification
//!
//! A raw level change becomes a candidate; it commits once it has held
//! for longer than the debounce window. A committed press that is still
//! held after `long_press_ms` (measured from the first raw change) emits
//! one latched `LongPress` and swallows the release. A shorter press
//! emits `Click` on its committed release.

use crate::time::{elapsed, Millis};

/// Classified button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Click,
    LongPress,
}

/// Debouncer for one active-low push button
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    debounce_ms: u32,
    long_press_ms: u32,
    /// Committed level (true = pressed)
    stable: bool,
    /// Most recent raw level
    candidate: bool,
    candidate_since: Millis,
    press_since: Millis,
    long_press_fired: bool,
    suppressed: bool,
}

impl ButtonDebouncer {
    pub const fn new(debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            debounce_ms,
            long_press_ms,
            stable: false,
            candidate: false,
            candidate_since: 0,
            press_since: 0,
            long_press_fired: false,
            suppressed: false,
        }
    }

    /// Feed one raw sample (`pressed` already converted from active-low)
    pub fn update(&mut self, pressed: bool, now: Millis) -> Option<ButtonEvent> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.candidate_since = now;
        }

        let mut event = None;

        if self.candidate != self.stable && elapsed(now, self.candidate_since) > self.debounce_ms {
            self.stable = self.candidate;
            if self.stable {
                self.press_since = self.candidate_since;
                self.long_press_fired = false;
            } else {
                if !self.long_press_fired && !self.suppressed {
                    event = Some(ButtonEvent::Click);
                }
                self.long_press_fired = false;
            }
        }

        if self.stable
            && self.candidate
            && !self.long_press_fired
            && elapsed(now, self.press_since) >= self.long_press_ms
        {
            self.long_press_fired = true;
            if !self.suppressed {
                event = Some(ButtonEvent::LongPress);
            }
        }

        if self.suppressed && !self.stable && !self.candidate {
            self.suppressed = false;
        }

        event
    }

    /// Swallow the press in progress
    ///
    /// The press produces neither `Click` nor `LongPress`. Has no effect
    /// when the button is fully released.
    pub fn suppress_current_press(&mut self) {
        if self.stable || self.candidate {
            self.suppressed = true;
        }
    }

    /// Committed level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Whether a raw change is waiting to commit
    pub fn is_debouncing(&self) -> bool {
        self.candidate != self.stable
    }
}
