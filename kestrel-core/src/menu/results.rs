//! Scan result list shown on the results screen

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::MAX_SCAN_RESULTS;
use crate::traits::radio::{Address, ScanEntry, MAX_NAME_LEN};

/// One row of the results screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    label: String<MAX_NAME_LEN>,
    address: Address,
}

impl ScanResult {
    /// Build a row; unnamed entries are labelled with their address
    pub fn from_entry(entry: &ScanEntry) -> Self {
        let label = if entry.name.is_empty() {
            let mut label = String::new();
            // 17 characters always fit
            let _ = write!(label, "{}", entry.address);
            label
        } else {
            entry.name.clone()
        };
        Self {
            label,
            address: entry.address,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Bounded result list
///
/// Lives only while the results screen is shown.
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    entries: Vec<ScanResult, MAX_SCAN_RESULTS>,
}

impl ScanResults {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the list; entries beyond capacity are dropped
    pub fn fill(&mut self, entries: &[ScanEntry]) {
        self.entries.clear();
        for entry in entries.iter().take(MAX_SCAN_RESULTS) {
            let _ = self.entries.push(ScanResult::from_entry(entry));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScanResult> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanResult> {
        self.entries.iter()
    }
}
