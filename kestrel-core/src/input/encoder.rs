//! Rotary encoder edge decoding
//!
//! Only falling edges on channel A are considered. Channel B is sampled
//! at that instant: HIGH means clockwise (Right), LOW counter-clockwise
//! (Left). Edges arriving sooner than `min_edge_ms` after the previously
//! accepted edge are treated as contact bounce and dropped.

use crate::time::{elapsed, Millis};

/// One detent of rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderEvent {
    Left,
    Right,
}

impl EncoderEvent {
    /// Signed unit step (-1 or +1)
    pub const fn delta(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Falling-edge encoder decoder
#[derive(Debug, Clone)]
pub struct EncoderDecoder {
    min_edge_ms: u32,
    last_a: bool,
    last_edge_at: Option<Millis>,
}

impl EncoderDecoder {
    /// Create a decoder; `min_edge_ms` of 0 accepts every edge
    pub const fn new(min_edge_ms: u32) -> Self {
        Self {
            min_edge_ms,
            // Lines idle HIGH through the pull-ups
            last_a: true,
            last_edge_at: None,
        }
    }

    /// Feed one sample of both channels
    pub fn update(&mut self, a: bool, b: bool, now: Millis) -> Option<EncoderEvent> {
        let falling = self.last_a && !a;
        self.last_a = a;
        if !falling {
            return None;
        }

        if self.min_edge_ms > 0 {
            if let Some(last) = self.last_edge_at {
                if elapsed(now, last) < self.min_edge_ms {
                    return None;
                }
            }
        }
        self.last_edge_at = Some(now);

        Some(if b {
            EncoderEvent::Right
        } else {
            EncoderEvent::Left
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detent(dec: &mut EncoderDecoder, b: bool, at: Millis) -> Option<EncoderEvent> {
        let event = dec.update(false, b, at);
        assert_eq!(dec.update(true, b, at + 1), None);
        event
    }

    #[test]
    fn test_direction_from_b() {
        let mut dec = EncoderDecoder::new(0);
        assert_eq!(detent(&mut dec, true, 10), Some(EncoderEvent::Right));
        assert_eq!(detent(&mut dec, false, 20), Some(EncoderEvent::Left));
    }

    #[test]
    fn test_rising_edge_ignored() {
        let mut dec = EncoderDecoder::new(0);
        assert_eq!(dec.update(false, true, 0), Some(EncoderEvent::Right));
        // Holding low produces nothing further
        assert_eq!(dec.update(false, true, 1), None);
        assert_eq!(dec.update(true, true, 2), None);
        assert_eq!(dec.update(true, false, 3), None);
    }

    #[test]
    fn test_bounce_within_gap_dropped() {
        let mut dec = EncoderDecoder::new(3);
        assert_eq!(dec.update(false, true, 100), Some(EncoderEvent::Right));
        assert_eq!(dec.update(true, false, 101), None);
        // Bounce with B already flipped would read as the wrong direction
        assert_eq!(dec.update(false, false, 102), None);
        assert_eq!(dec.update(true, true, 103), None);
        assert_eq!(dec.update(false, true, 103), Some(EncoderEvent::Right));
    }

    #[test]
    fn test_zero_gap_is_raw() {
        let mut dec = EncoderDecoder::new(0);
        assert_eq!(dec.update(false, true, 5), Some(EncoderEvent::Right));
        assert_eq!(dec.update(true, true, 5), None);
        assert_eq!(dec.update(false, false, 5), Some(EncoderEvent::Left));
    }

    #[test]
    fn test_delta() {
        assert_eq!(EncoderEvent::Left.delta(), -1);
        assert_eq!(EncoderEvent::Right.delta(), 1);
    }
}
