//! UART link to the radio coprocessor
//!
//! Implements [`RadioGateway`] by exchanging `kestrel-protocol` frames
//! over any blocking byte stream. Commands are strictly sequential: each
//! one waits for its ACK/NACK (or, for scans, SCAN_DONE) before returning.

use embedded_io::{Read, ReadReady, Write};
use kestrel_core::time::reached;
use kestrel_core::traits::{
    Address, AdvertiserConfig, RadioError, RadioGateway, ScanEntry, ScanList,
};
use kestrel_protocol::messages::MSG_SCAN;
use kestrel_protocol::{AdvParams, Band, Frame, FrameParser, HostCommand, NackCode, RadioReply};

/// Millisecond time source for reply deadlines
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Time allowed for an ACK/NACK beyond the command's own duration
    pub reply_timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 200,
        }
    }
}

/// Radio coprocessor behind a byte stream
pub struct RadioLink<T, C> {
    port: T,
    clock: C,
    parser: FrameParser,
    config: LinkConfig,
    advertising: bool,
    burst_ms: u32,
}

impl<T, C> RadioLink<T, C>
where
    T: Read + Write + ReadReady,
    C: Clock,
{
    pub fn new(port: T, clock: C, config: LinkConfig) -> Self {
        Self {
            port,
            clock,
            parser: FrameParser::new(),
            config,
            advertising: false,
            burst_ms: 0,
        }
    }

    /// Check the coprocessor answers at all
    pub fn ping(&mut self) -> Result<(), RadioError> {
        self.command(&HostCommand::Ping, self.config.reply_timeout_ms)
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    pub fn release(self) -> (T, C) {
        (self.port, self.clock)
    }

    fn send(&mut self, cmd: &HostCommand<'_>) -> Result<(), RadioError> {
        let frame = cmd.to_frame().map_err(|_| RadioError::Link)?;
        let bytes = frame.encode_to_vec().map_err(|_| RadioError::Link)?;
        self.port.write_all(&bytes).map_err(|_| RadioError::Link)?;
        self.port.flush().map_err(|_| RadioError::Link)
    }

    /// Next complete frame, or `Timeout` once `deadline` passes
    fn next_frame(&mut self, deadline: u32) -> Result<Frame, RadioError> {
        loop {
            while self.port.read_ready().map_err(|_| RadioError::Link)? {
                let mut byte = [0u8; 1];
                if self.port.read(&mut byte).map_err(|_| RadioError::Link)? == 0 {
                    break;
                }
                // Corrupt frames are dropped; the parser resyncs on START
                if let Ok(Some(frame)) = self.parser.feed(byte[0]) {
                    return Ok(frame);
                }
            }
            if reached(self.clock.now_ms(), deadline) {
                return Err(RadioError::Timeout);
            }
        }
    }

    /// Send `cmd` and wait for the reply that names it
    fn command(&mut self, cmd: &HostCommand<'_>, timeout_ms: u32) -> Result<(), RadioError> {
        let expected = cmd.msg_type();
        self.parser.reset();
        self.send(cmd)?;

        let deadline = self.clock.now_ms().wrapping_add(timeout_ms);
        loop {
            let frame = self.next_frame(deadline)?;
            match RadioReply::from_frame(&frame) {
                Ok(RadioReply::Ack { command }) if command == expected => return Ok(()),
                Ok(RadioReply::Nack { command, code }) if command == expected => {
                    return Err(nack_error(code))
                }
                // Stale reply from an earlier command
                _ => {}
            }
        }
    }

    fn scan_band(&mut self, band: Band, duration_s: u8) -> Result<ScanList, RadioError> {
        self.parser.reset();
        self.send(&HostCommand::Scan { band, duration_s })?;

        let timeout = u32::from(duration_s) * 1000 + self.config.reply_timeout_ms;
        let deadline = self.clock.now_ms().wrapping_add(timeout);
        let mut found = ScanList::new();
        loop {
            let frame = self.next_frame(deadline)?;
            match RadioReply::from_frame(&frame) {
                Ok(RadioReply::ScanEntry { address, name }) => {
                    // Extra hits past capacity are dropped
                    let _ = found.push(ScanEntry::new(&name, Address(address)));
                }
                Ok(RadioReply::ScanDone { .. }) => return Ok(found),
                Ok(RadioReply::Nack { command, code }) if command == MSG_SCAN => {
                    return Err(nack_error(code))
                }
                _ => {}
            }
        }
    }
}

fn nack_error(code: NackCode) -> RadioError {
    match code {
        NackCode::Busy => RadioError::Busy,
        NackCode::NotInitialized => RadioError::NotInitialized,
        NackCode::Unsupported => RadioError::Unsupported,
        NackCode::Malformed => RadioError::Link,
        NackCode::Failed | NackCode::Other(_) => RadioError::Unavailable,
    }
}

impl<T, C> RadioGateway for RadioLink<T, C>
where
    T: Read + Write + ReadReady,
    C: Clock,
{
    fn init_advertiser(&mut self, config: &AdvertiserConfig) -> Result<(), RadioError> {
        let params = AdvParams {
            connectable: config.connectable,
            scan_response: config.scan_response,
            interval_min: config.interval_min,
            interval_max: config.interval_max,
            burst_ms: config.burst_ms,
        };
        self.command(
            &HostCommand::InitAdvertiser(params),
            self.config.reply_timeout_ms,
        )?;
        self.advertising = true;
        self.burst_ms = u32::from(config.burst_ms);
        Ok(())
    }

    fn publish_advertisement(&mut self, identity: &str, address: Address) -> Result<(), RadioError> {
        if !self.advertising {
            return Err(RadioError::NotInitialized);
        }
        let cmd = HostCommand::Publish {
            address: address.octets(),
            name: identity,
        };
        // The ACK must land inside the burst so the poll loop never
        // stalls longer than one burst width
        self.command(&cmd, self.burst_ms)
    }

    fn stop_advertiser(&mut self) -> Result<(), RadioError> {
        // Local state is cleared even if the radio never answers
        self.advertising = false;
        self.command(&HostCommand::StopAdvertiser, self.config.reply_timeout_ms)
    }

    fn scan(&mut self, duration_s: u8) -> Result<ScanList, RadioError> {
        self.scan_band(Band::Ble, duration_s)
    }

    fn scan_networks(&mut self, duration_s: u8) -> Result<ScanList, RadioError> {
        self.scan_band(Band::Wifi, duration_s)
    }
}
