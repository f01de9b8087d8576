//! Link message types
//!
//! - Host → radio: advertising control, scans, ping
//! - Radio → host: ACK/NACK per command, scan entries, scan completion

use heapless::{String, Vec};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: radio → host
pub const MSG_ACK: u8 = 0x01;
pub const MSG_NACK: u8 = 0x02;
pub const MSG_SCAN_ENTRY: u8 = 0x03;
pub const MSG_SCAN_DONE: u8 = 0x04;

// Message type IDs: host → radio
pub const MSG_INIT_ADV: u8 = 0x40;
pub const MSG_PUBLISH: u8 = 0x41;
pub const MSG_STOP_ADV: u8 = 0x42;
pub const MSG_SCAN: u8 = 0x43;
pub const MSG_PING: u8 = 0x44;

/// Longest name carried in PUBLISH or SCAN_ENTRY
pub const MAX_NAME_LEN: usize = 32;

/// Which radio a scan uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    Ble,
    Wifi,
}

impl Band {
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Ble => 0,
            Self::Wifi => 1,
        }
    }

    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Ble),
            1 => Some(Self::Wifi),
            _ => None,
        }
    }
}

/// Reason carried by a NACK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NackCode {
    /// Another operation is running
    Busy,
    /// PUBLISH or STOP_ADV before INIT_ADV
    NotInitialized,
    /// Radio lacks the requested capability
    Unsupported,
    /// Command payload did not decode
    Malformed,
    /// Radio-side failure
    Failed,
    /// Code this host does not know
    Other(u8),
}

impl NackCode {
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Busy => 1,
            Self::NotInitialized => 2,
            Self::Unsupported => 3,
            Self::Malformed => 4,
            Self::Failed => 5,
            Self::Other(code) => code,
        }
    }

    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Busy,
            2 => Self::NotInitialized,
            3 => Self::Unsupported,
            4 => Self::Malformed,
            5 => Self::Failed,
            code => Self::Other(code),
        }
    }
}

/// INIT_ADV parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvParams {
    pub connectable: bool,
    pub scan_response: bool,
    /// 0.625 ms units
    pub interval_min: u16,
    /// 0.625 ms units
    pub interval_max: u16,
    /// Upper bound on one PUBLISH
    pub burst_ms: u16,
}

/// Commands from the host to the radio
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand<'a> {
    /// Prepare the advertising channel
    InitAdvertiser(AdvParams),
    /// Send one advertising burst
    Publish { address: [u8; 6], name: &'a str },
    /// Tear down the advertising channel
    StopAdvertiser,
    /// Scan for `duration_s` seconds
    Scan { band: Band, duration_s: u8 },
    /// Liveness check
    Ping,
}

impl<'a> HostCommand<'a> {
    /// Message type this command is sent as
    pub const fn msg_type(&self) -> u8 {
        match self {
            Self::InitAdvertiser(_) => MSG_INIT_ADV,
            Self::Publish { .. } => MSG_PUBLISH,
            Self::StopAdvertiser => MSG_STOP_ADV,
            Self::Scan { .. } => MSG_SCAN,
            Self::Ping => MSG_PING,
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            Self::InitAdvertiser(params) => {
                // Payload: [connectable][scan_rsp][imin u16le][imax u16le][burst u16le]
                let [min_lo, min_hi] = params.interval_min.to_le_bytes();
                let [max_lo, max_hi] = params.interval_max.to_le_bytes();
                let [burst_lo, burst_hi] = params.burst_ms.to_le_bytes();
                Frame::new(
                    MSG_INIT_ADV,
                    &[
                        u8::from(params.connectable),
                        u8::from(params.scan_response),
                        min_lo,
                        min_hi,
                        max_lo,
                        max_hi,
                        burst_lo,
                        burst_hi,
                    ],
                )
            }
            Self::Publish { address, name } => {
                Frame::new(MSG_PUBLISH, &named_payload(address, name)?)
            }
            Self::StopAdvertiser => Ok(Frame::empty(MSG_STOP_ADV)),
            Self::Scan { band, duration_s } => {
                Frame::new(MSG_SCAN, &[band.to_byte(), *duration_s])
            }
            Self::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }

    /// Parse a command from a frame (radio side and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let p = frame.payload.as_slice();
        match frame.msg_type {
            MSG_INIT_ADV => {
                let [connectable, scan_response, min_lo, min_hi, max_lo, max_hi, burst_lo, burst_hi] =
                    *p
                else {
                    return Err(FrameError::InvalidFrame);
                };
                Ok(Self::InitAdvertiser(AdvParams {
                    connectable: connectable != 0,
                    scan_response: scan_response != 0,
                    interval_min: u16::from_le_bytes([min_lo, min_hi]),
                    interval_max: u16::from_le_bytes([max_lo, max_hi]),
                    burst_ms: u16::from_le_bytes([burst_lo, burst_hi]),
                }))
            }
            MSG_PUBLISH => {
                let (address, name) = parse_named(p)?;
                Ok(Self::Publish { address, name })
            }
            MSG_STOP_ADV => Ok(Self::StopAdvertiser),
            MSG_SCAN => {
                let [band, duration_s] = *p else {
                    return Err(FrameError::InvalidFrame);
                };
                let band = Band::from_byte(band).ok_or(FrameError::InvalidFrame)?;
                Ok(Self::Scan { band, duration_s })
            }
            MSG_PING => Ok(Self::Ping),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

/// Replies from the radio to the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioReply {
    /// Command accepted and completed
    Ack { command: u8 },
    /// Command refused
    Nack { command: u8, code: NackCode },
    /// One scan hit
    ScanEntry {
        address: [u8; 6],
        name: String<MAX_NAME_LEN>,
    },
    /// Scan finished after `count` entries
    ScanDone { count: u8 },
}

impl RadioReply {
    /// Parse a reply from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let p = frame.payload.as_slice();
        match frame.msg_type {
            MSG_ACK => match *p {
                [command] => Ok(Self::Ack { command }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_NACK => match *p {
                [command, code] => Ok(Self::Nack {
                    command,
                    code: NackCode::from_byte(code),
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_SCAN_ENTRY => {
                let (address, name) = parse_named(p)?;
                let name = String::try_from(name).map_err(|_| FrameError::InvalidFrame)?;
                Ok(Self::ScanEntry { address, name })
            }
            MSG_SCAN_DONE => match *p {
                [count] => Ok(Self::ScanDone { count }),
                _ => Err(FrameError::InvalidFrame),
            },
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this reply into a frame (radio side and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            Self::Ack { command } => Frame::new(MSG_ACK, &[*command]),
            Self::Nack { command, code } => Frame::new(MSG_NACK, &[*command, code.to_byte()]),
            Self::ScanEntry { address, name } => {
                Frame::new(MSG_SCAN_ENTRY, &named_payload(address, name)?)
            }
            Self::ScanDone { count } => Frame::new(MSG_SCAN_DONE, &[*count]),
        }
    }
}

/// Payload: [addr×6][len][name...]
fn named_payload(address: &[u8; 6], name: &str) -> Result<Vec<u8, MAX_PAYLOAD_SIZE>, FrameError> {
    if name.len() > MAX_NAME_LEN {
        return Err(FrameError::PayloadTooLarge);
    }
    let mut payload = Vec::new();
    payload
        .extend_from_slice(address)
        .map_err(|_| FrameError::PayloadTooLarge)?;
    payload
        .push(name.len() as u8)
        .map_err(|_| FrameError::PayloadTooLarge)?;
    payload
        .extend_from_slice(name.as_bytes())
        .map_err(|_| FrameError::PayloadTooLarge)?;
    Ok(payload)
}

fn parse_named(payload: &[u8]) -> Result<([u8; 6], &str), FrameError> {
    let Some((&[a, b, c, d, e, f, len], rest)) = payload.split_first_chunk::<7>() else {
        return Err(FrameError::InvalidFrame);
    };
    if rest.len() != usize::from(len) || rest.len() > MAX_NAME_LEN {
        return Err(FrameError::InvalidFrame);
    }
    let name = core::str::from_utf8(rest).map_err(|_| FrameError::InvalidFrame)?;
    Ok(([a, b, c, d, e, f], name))
}
