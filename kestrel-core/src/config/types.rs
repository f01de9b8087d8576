//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum entries kept from one scan
pub const MAX_SCAN_RESULTS: usize = 5;

/// Shortest advertising interval the radio accepts (units of 0.625 ms)
pub const ADV_INTERVAL_MIN: u16 = 0x0020;

/// Longest advertising interval the radio accepts (units of 0.625 ms)
pub const ADV_INTERVAL_MAX: u16 = 0x4000;

/// Longest scan the loop may block for
pub const MAX_SCAN_DURATION_S: u8 = 10;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Debounce window is zero
    ZeroDebounce,
    /// Long press threshold does not exceed the debounce window
    LongPressWithinDebounce,
    /// Flood interval range is empty or starts at zero
    InvalidFloodInterval,
    /// Burst width does not fit inside the shortest flood interval
    BurstTooLong,
    /// Advertising interval outside the radio's accepted range
    AdvertisingIntervalOutOfRange,
    /// Advertising interval minimum above maximum
    AdvertisingIntervalInverted,
    /// Scan duration is zero or too long to block the loop
    InvalidScanDuration,
    /// Notice timeout is zero
    ZeroNoticeTimeout,
}

/// Button and encoder timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputTiming {
    /// A button level change must persist longer than this to commit
    pub debounce_ms: u32,
    /// Hold time that turns a press into a long press
    pub long_press_ms: u32,
    /// Minimum gap between accepted encoder edges (0 = raw edges)
    pub encoder_min_edge_ms: u32,
}

impl InputTiming {
    pub const fn new() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 600,
            encoder_min_edge_ms: 3,
        }
    }
}

impl Default for InputTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Beacon flood parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FloodConfig {
    /// Shortest gap between bursts (inclusive)
    pub min_interval_ms: u32,
    /// Longest gap between bursts (exclusive)
    pub max_interval_ms: u32,
    /// Advertising interval minimum (0.625 ms units)
    pub adv_interval_min: u16,
    /// Advertising interval maximum (0.625 ms units)
    pub adv_interval_max: u16,
    /// Fixed width of one burst
    pub burst_ms: u16,
}

impl FloodConfig {
    pub const fn new() -> Self {
        Self {
            min_interval_ms: 100,
            max_interval_ms: 500,
            adv_interval_min: 0x0020,
            adv_interval_max: 0x0030,
            burst_ms: 20,
        }
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// How long one scan blocks the loop
    pub duration_s: u8,
}

impl ScanConfig {
    pub const fn new() -> Self {
        Self { duration_s: 3 }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// User interface parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiConfig {
    /// How long a notice stays up before returning to its submenu
    pub notice_ms: u32,
}

impl UiConfig {
    pub const fn new() -> Self {
        Self { notice_ms: 1500 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    pub input: InputTiming,
    pub flood: FloodConfig,
    pub scan: ScanConfig,
    pub ui: UiConfig,
}

impl DeviceConfig {
    /// Default configuration, usable in const context
    pub const fn new() -> Self {
        Self {
            input: InputTiming::new(),
            flood: FloodConfig::new(),
            scan: ScanConfig::new(),
            ui: UiConfig::new(),
        }
    }

    /// Check that all values are usable
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let input = &self.input;
        if input.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if input.long_press_ms <= input.debounce_ms {
            return Err(ConfigError::LongPressWithinDebounce);
        }

        let flood = &self.flood;
        if flood.min_interval_ms == 0 || flood.min_interval_ms >= flood.max_interval_ms {
            return Err(ConfigError::InvalidFloodInterval);
        }
        if flood.burst_ms == 0 || u32::from(flood.burst_ms) >= flood.min_interval_ms {
            return Err(ConfigError::BurstTooLong);
        }
        let legal = ADV_INTERVAL_MIN..=ADV_INTERVAL_MAX;
        if !legal.contains(&flood.adv_interval_min) || !legal.contains(&flood.adv_interval_max) {
            return Err(ConfigError::AdvertisingIntervalOutOfRange);
        }
        if flood.adv_interval_min > flood.adv_interval_max {
            return Err(ConfigError::AdvertisingIntervalInverted);
        }

        if self.scan.duration_s == 0 || self.scan.duration_s > MAX_SCAN_DURATION_S {
            return Err(ConfigError::InvalidScanDuration);
        }

        if self.ui.notice_ms == 0 {
            return Err(ConfigError::ZeroNoticeTimeout);
        }

        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}
