//! Link frame codec
//!
//! Frame layout:
//! - START (1 byte): 0xAA
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type
//! - PAYLOAD (LENGTH bytes)
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and every PAYLOAD byte

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Largest payload a frame carries
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// START + LENGTH + TYPE + payload + CHECKSUM
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + 4;

/// Frame encoding and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds `MAX_PAYLOAD_SIZE`
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// LENGTH byte out of range, or payload does not match its type
    InvalidFrame,
    /// Output buffer too small
    BufferTooSmall,
}

/// One link frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Frame without payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Bytes needed to encode this frame
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + 4
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, byte| acc ^ byte)
    }

    /// Write the frame into `buffer`, returning the bytes used
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();
        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(len)
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    Length,
    Type,
    Payload,
    Checksum,
}

/// Incremental frame parser
///
/// Bytes outside a frame are skipped until the next START byte. A bad
/// LENGTH or checksum drops the partial frame and reports the error;
/// parsing resumes at the next START.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    length: u8,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            state: ParseState::Start,
            length: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.length = 0;
        self.msg_type = 0;
        self.payload.clear();
    }

    /// Whether a frame is partially received
    pub fn in_frame(&self) -> bool {
        self.state != ParseState::Start
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(frame))` when a frame completes, `Ok(None)` when
    /// more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Start => {
                if byte == FRAME_START {
                    self.state = ParseState::Length;
                }
            }
            ParseState::Length => {
                if usize::from(byte) > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.length = byte;
                self.state = ParseState::Type;
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
            }
            ParseState::Payload => {
                // Cannot overflow: length was bounded above
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(self.length) {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = Frame::checksum(self.length, self.msg_type, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }
                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Returns the frame and how many bytes were consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (Result<Option<Frame>, FrameError>, usize) {
        for (i, &byte) in bytes.iter().enumerate() {
            match self.feed(byte) {
                Ok(None) => {}
                other => return (other, i + 1),
            }
        }
        (Ok(None), bytes.len())
    }
}
