//! Radio capability trait

use core::fmt;

use heapless::{String, Vec};

use crate::config::MAX_SCAN_RESULTS;

/// Longest name kept from a scan entry
pub const MAX_NAME_LEN: usize = 20;

/// Bounded list returned by a scan
pub type ScanList = Vec<ScanEntry, MAX_SCAN_RESULTS>;

/// Errors reported by a radio implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// Advertising requested before `init_advertiser`
    NotInitialized,
    /// Radio missing or not responding
    Unavailable,
    /// No reply within the deadline
    Timeout,
    /// Radio is occupied with another operation
    Busy,
    /// Operation not supported by this radio
    Unsupported,
    /// Transport or framing failure
    Link,
}

/// 6-byte link-layer address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(pub [u8; 6]);

impl Address {
    /// Build an address with the locally-administered bit set and the
    /// multicast bit cleared in the first octet
    pub const fn localized(mut octets: [u8; 6]) -> Self {
        octets[0] = (octets[0] | 0x02) & !0x01;
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub const fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    pub const fn is_unicast(&self) -> bool {
        self.0[0] & 0x01 == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// One device or network seen by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub name: String<MAX_NAME_LEN>,
    pub address: Address,
}

impl ScanEntry {
    /// Create an entry, truncating the name to `MAX_NAME_LEN` bytes
    pub fn new(name: &str, address: Address) -> Self {
        let mut kept = String::new();
        for ch in name.chars() {
            if kept.push(ch).is_err() {
                break;
            }
        }
        Self {
            name: kept,
            address,
        }
    }
}

/// Advertising channel parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertiserConfig {
    pub connectable: bool,
    pub scan_response: bool,
    /// Advertising interval minimum (0.625 ms units)
    pub interval_min: u16,
    /// Advertising interval maximum (0.625 ms units)
    pub interval_max: u16,
    /// Upper bound on one `publish_advertisement` call
    pub burst_ms: u16,
}

/// Trait for the radio
///
/// Every call returns within a bounded time. `scan` and `scan_networks`
/// block for their duration; `publish_advertisement` returns within the
/// configured burst width.
pub trait RadioGateway {
    /// Prepare the advertising channel
    fn init_advertiser(&mut self, config: &AdvertiserConfig) -> Result<(), RadioError>;

    /// Transmit one advertisement burst with the given identity and address
    fn publish_advertisement(&mut self, identity: &str, address: Address)
        -> Result<(), RadioError>;

    /// Tear down the advertising channel
    fn stop_advertiser(&mut self) -> Result<(), RadioError>;

    /// Scan for advertising devices
    fn scan(&mut self, duration_s: u8) -> Result<ScanList, RadioError>;

    /// Scan for wireless access points
    fn scan_networks(&mut self, duration_s: u8) -> Result<ScanList, RadioError> {
        let _ = duration_s;
        Err(RadioError::Unsupported)
    }
}
