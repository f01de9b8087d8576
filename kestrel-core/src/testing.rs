//! Test doubles for the gateways and randomness

use std::string::String;
use std::vec::Vec;

use rand_core::{impls, RngCore};

use crate::config::MAX_SCAN_RESULTS;
use crate::input::InputSample;
use crate::time::Millis;
use crate::traits::{
    AdvertiserConfig, Address, RadioError, RadioGateway, RenderError, RenderGateway, ScanEntry,
    ScanList,
};

/// Radio call record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioCall {
    InitAdvertiser(AdvertiserConfig),
    Publish { identity: String, address: Address },
    StopAdvertiser,
    Scan(u8),
    ScanNetworks(u8),
}

/// Recording radio with injectable failures
#[derive(Debug)]
pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    pub fail_init: Option<RadioError>,
    pub fail_publish: Option<RadioError>,
    pub fail_stop: Option<RadioError>,
    pub scan_result: Result<Vec<ScanEntry>, RadioError>,
    /// `None` keeps the trait's default (unsupported)
    pub network_result: Option<Result<Vec<ScanEntry>, RadioError>>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_init: None,
            fail_publish: None,
            fail_stop: None,
            scan_result: Ok(Vec::new()),
            network_result: None,
        }
    }

    /// Radio whose scan finds `count` devices
    pub fn with_devices(count: u8) -> Self {
        let mut radio = Self::new();
        radio.scan_result = Ok((0..count)
            .map(|i| ScanEntry::new(&std::format!("dev{i}"), Address([0x02, 0, 0, 0, 0, i])))
            .collect());
        radio
    }

    pub fn publish_count(&self) -> usize {
        self.published_addresses().len()
    }

    pub fn stop_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == RadioCall::StopAdvertiser)
            .count()
    }

    pub fn published_addresses(&self) -> Vec<Address> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::Publish { address, .. } => Some(*address),
                _ => None,
            })
            .collect()
    }

    fn to_list(entries: &[ScanEntry]) -> ScanList {
        entries.iter().take(MAX_SCAN_RESULTS).cloned().collect()
    }
}

impl RadioGateway for MockRadio {
    fn init_advertiser(&mut self, config: &AdvertiserConfig) -> Result<(), RadioError> {
        self.calls.push(RadioCall::InitAdvertiser(*config));
        self.fail_init.map_or(Ok(()), Err)
    }

    fn publish_advertisement(
        &mut self,
        identity: &str,
        address: Address,
    ) -> Result<(), RadioError> {
        if let Some(e) = self.fail_publish {
            return Err(e);
        }
        self.calls.push(RadioCall::Publish {
            identity: identity.into(),
            address,
        });
        Ok(())
    }

    fn stop_advertiser(&mut self) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StopAdvertiser);
        self.fail_stop.map_or(Ok(()), Err)
    }

    fn scan(&mut self, duration_s: u8) -> Result<ScanList, RadioError> {
        self.calls.push(RadioCall::Scan(duration_s));
        self.scan_result
            .as_ref()
            .map(|entries| Self::to_list(entries))
            .map_err(|e| *e)
    }

    fn scan_networks(&mut self, duration_s: u8) -> Result<ScanList, RadioError> {
        self.calls.push(RadioCall::ScanNetworks(duration_s));
        match &self.network_result {
            None => Err(RadioError::Unsupported),
            Some(Ok(entries)) => Ok(Self::to_list(entries)),
            Some(Err(e)) => Err(*e),
        }
    }
}

/// One recorded render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub title: String,
    pub items: Vec<String>,
    pub selected: Option<usize>,
}

/// Recording renderer
#[derive(Debug, Default)]
pub struct MockView {
    pub frames: Vec<Frame>,
    pub fail: Option<RenderError>,
}

impl MockView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &Frame {
        self.frames.last().expect("nothing rendered")
    }
}

impl RenderGateway for MockView {
    fn render(
        &mut self,
        title: &str,
        items: &[&str],
        selected: Option<usize>,
    ) -> Result<(), RenderError> {
        if let Some(e) = self.fail {
            return Err(e);
        }
        self.frames.push(Frame {
            title: title.into(),
            items: items.iter().map(|s| String::from(*s)).collect(),
            selected,
        });
        Ok(())
    }
}

/// Deterministic xorshift generator
#[derive(Debug, Clone)]
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }
}

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Generator replaying `next_u32` values in a cycle
///
/// Byte fills come from a separate counter so address draws do not
/// consume the script.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    script: Vec<u32>,
    pos: usize,
    counter: u8,
}

impl ScriptedRng {
    pub fn new(script: &[u32]) -> Self {
        Self {
            script: script.to_vec(),
            pos: 0,
            counter: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.script[self.pos % self.script.len()];
        self.pos += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.counter = self.counter.wrapping_add(1);
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.counter.wrapping_add(i as u8);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Generator that always yields the same byte
#[derive(Debug, Clone)]
pub struct ConstRng(pub u8);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_le_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_le_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Sample with the given line levels
pub fn sample(a: bool, b: bool, button: bool) -> InputSample {
    InputSample {
        encoder_a: a,
        encoder_b: b,
        button,
    }
}

/// Sample with the button held down and the encoder idle
pub const PRESSED: InputSample = InputSample {
    encoder_a: true,
    encoder_b: true,
    button: false,
};

/// Millisecond clock for driving a poll loop in tests
#[derive(Debug, Default)]
pub struct Clock {
    pub now: Millis,
}

impl Clock {
    pub fn tick(&mut self) -> Millis {
        let now = self.now;
        self.now = self.now.wrapping_add(1);
        now
    }
}
