//! Notable outcomes of a poll
//!
//! The core does not log. The firmware logs these instead.

use crate::menu::ActionId;
use crate::traits::{Address, RadioError, RenderError};

/// Something worth reporting that happened during a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppEvent {
    // Scan events
    /// Scan finished with `found` entries kept
    ScanCompleted { found: u8 },
    /// Scan call failed
    ScanFailed(RadioError),

    // Flood events
    /// Advertising channel up, bursts scheduled
    FloodStarted,
    /// Advertising channel could not be prepared
    FloodStartFailed(RadioError),
    /// Flood stopped after `bursts` successful bursts
    FloodCancelled { bursts: u32 },
    /// One burst sent
    BurstSent(Address),
    /// One burst failed; the next is still scheduled
    BurstFailed(RadioError),

    // UI events
    /// Leaf has no backing hardware
    ActionUnavailable(ActionId),
    /// Drawing the screen failed
    RenderFailed(RenderError),
}
