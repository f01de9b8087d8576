//! Advertisement flood task
//!
//! `start` prepares a non-connectable advertising channel, `tick` sends
//! one burst whenever the randomized deadline has passed, and `stop`
//! tears the channel down. None of them block beyond one burst width.

use heapless::Deque;
use rand_core::RngCore;

use super::identity::{random_address, random_identity, random_interval};
use crate::config::FloodConfig;
use crate::time::{reached, Millis};
use crate::traits::radio::{AdvertiserConfig, Address, RadioError, RadioGateway};

/// Published addresses remembered for collision checks
pub const RECENT_ADDRESSES: usize = 8;

/// Flood task state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FloodState {
    /// Advertising channel is up and bursts are scheduled
    pub active: bool,
    /// Deadline of the next burst
    pub next_fire_at: Millis,
    /// Gap drawn for the current wait, in `[min_interval_ms, max_interval_ms)`
    pub interval_ms: u32,
}

impl FloodState {
    pub const fn idle() -> Self {
        Self {
            active: false,
            next_fire_at: 0,
            interval_ms: 0,
        }
    }
}

/// Result of a tick that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    Published(Address),
    /// Burst failed; the next one is still scheduled
    Failed(RadioError),
}

/// Owner of the flood task
pub struct ActionScheduler<R> {
    rng: R,
    config: FloodConfig,
    flood: FloodState,
    recent: Deque<Address, RECENT_ADDRESSES>,
    sent: u32,
    failed: u32,
}

impl<R: RngCore> ActionScheduler<R> {
    pub fn new(config: FloodConfig, rng: R) -> Self {
        Self {
            rng,
            config,
            flood: FloodState::idle(),
            recent: Deque::new(),
            sent: 0,
            failed: 0,
        }
    }

    /// Advertising parameters used by `start`
    pub fn advertiser_config(&self) -> AdvertiserConfig {
        AdvertiserConfig {
            connectable: false,
            scan_response: false,
            interval_min: self.config.adv_interval_min,
            interval_max: self.config.adv_interval_max,
            burst_ms: self.config.burst_ms,
        }
    }

    /// Arm the flood; the first burst is due immediately
    ///
    /// Does nothing if already active. A failed channel setup leaves the
    /// scheduler inactive.
    pub fn start<G: RadioGateway>(&mut self, now: Millis, radio: &mut G) -> Result<(), RadioError> {
        if self.flood.active {
            return Ok(());
        }

        radio.init_advertiser(&self.advertiser_config())?;

        self.flood = FloodState {
            active: true,
            next_fire_at: now,
            interval_ms: self.draw_interval(),
        };
        self.recent.clear();
        self.sent = 0;
        self.failed = 0;
        Ok(())
    }

    /// Send one burst if due
    ///
    /// Returns `None` when inactive or not yet due.
    pub fn tick<G: RadioGateway>(&mut self, now: Millis, radio: &mut G) -> Option<TickOutcome> {
        if !self.flood.active || !reached(now, self.flood.next_fire_at) {
            return None;
        }

        let address = self.fresh_address();
        let identity = random_identity(&mut self.rng);

        let outcome = match radio.publish_advertisement(&identity, address) {
            Ok(()) => {
                self.sent = self.sent.wrapping_add(1);
                TickOutcome::Published(address)
            }
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                TickOutcome::Failed(e)
            }
        };

        let interval = self.draw_interval();
        self.flood.interval_ms = interval;
        self.flood.next_fire_at = now.wrapping_add(interval);

        Some(outcome)
    }

    /// Tear down the advertising channel
    ///
    /// Returns whether a running flood was stopped. The channel is torn
    /// down once per `start`; teardown errors are ignored.
    pub fn stop<G: RadioGateway>(&mut self, radio: &mut G) -> bool {
        if !self.flood.active {
            return false;
        }
        self.flood = FloodState::idle();
        let _ = radio.stop_advertiser();
        true
    }

    pub fn is_active(&self) -> bool {
        self.flood.active
    }

    pub fn state(&self) -> &FloodState {
        &self.flood
    }

    pub fn next_fire_at(&self) -> Option<Millis> {
        self.flood.active.then_some(self.flood.next_fire_at)
    }

    /// Bursts published since the last `start`
    pub fn bursts_sent(&self) -> u32 {
        self.sent
    }

    /// Bursts that failed since the last `start`
    pub fn bursts_failed(&self) -> u32 {
        self.failed
    }

    fn draw_interval(&mut self) -> u32 {
        random_interval(
            &mut self.rng,
            self.config.min_interval_ms,
            self.config.max_interval_ms,
        )
    }

    /// Draw an address not among the last `RECENT_ADDRESSES` published
    ///
    /// Older addresses may come back; uniqueness only holds within that
    /// window.
    fn fresh_address(&mut self) -> Address {
        let mut address = random_address(&mut self.rng);
        // At most RECENT_ADDRESSES bumps are needed
        while self.recent.iter().any(|seen| *seen == address) {
            address.0[5] = address.0[5].wrapping_add(1);
        }
        if self.recent.is_full() {
            self.recent.pop_front();
        }
        let _ = self.recent.push_back(address);
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ConstRng, MockRadio, RadioCall, ScriptedRng, TestRng};

    fn scheduler() -> ActionScheduler<TestRng> {
        ActionScheduler::new(FloodConfig::default(), TestRng::new(0x5EED))
    }

    #[test]
    fn test_start_configures_channel() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        sched.start(1000, &mut radio).unwrap();

        assert!(sched.is_active());
        assert_eq!(sched.next_fire_at(), Some(1000));
        let interval = sched.state().interval_ms;
        assert!((100..500).contains(&interval));

        let [RadioCall::InitAdvertiser(config)] = radio.calls.as_slice() else {
            panic!("unexpected calls: {:?}", radio.calls);
        };
        assert!(!config.connectable);
        assert!(!config.scan_response);
        assert_eq!(config.interval_min, 0x20);
        assert_eq!(config.interval_max, 0x30);
    }

    #[test]
    fn test_start_failure_stays_inactive() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        radio.fail_init = Some(RadioError::Unavailable);
        assert_eq!(sched.start(0, &mut radio), Err(RadioError::Unavailable));
        assert!(!sched.is_active());
        assert_eq!(sched.tick(0, &mut radio), None);
        assert!(!sched.stop(&mut radio));
        assert_eq!(radio.stop_count(), 0);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        sched.start(50, &mut radio).unwrap();
        assert_eq!(radio.calls.len(), 1);
        assert_eq!(sched.next_fire_at(), Some(0));
    }

    #[test]
    fn test_tick_inactive_does_nothing() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        for t in 0..1000 {
            assert_eq!(sched.tick(t, &mut radio), None);
        }
        assert!(radio.calls.is_empty());
    }

    #[test]
    fn test_tick_schedule() {
        // Interval draws: 100 + value % 400
        let mut sched = ActionScheduler::new(
            FloodConfig::default(),
            ScriptedRng::new(&[0, 20, 40, 50, 380]),
        );
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        assert_eq!(sched.state().interval_ms, 100);

        let mut published = std::vec::Vec::new();
        for now in [0, 120, 260, 410] {
            let due = sched.next_fire_at().unwrap();
            assert!(now >= due, "tick at {now} before deadline {due}");
            let outcome = sched.tick(now, &mut radio);
            let Some(TickOutcome::Published(addr)) = outcome else {
                panic!("expected publish at {now}, got {outcome:?}");
            };
            published.push(addr);

            let interval = sched.state().interval_ms;
            assert!((100..500).contains(&interval));
            assert_eq!(sched.next_fire_at(), Some(now + interval));
            // Not due again on the same pass
            assert_eq!(sched.tick(now, &mut radio), None);
        }

        assert_eq!(radio.publish_count(), 4);
        assert_eq!(sched.bursts_sent(), 4);
        for (i, a) in published.iter().enumerate() {
            assert!(a.is_locally_administered() && a.is_unicast());
            assert!(!published[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_not_due_before_deadline() {
        let mut sched = ActionScheduler::new(FloodConfig::default(), ScriptedRng::new(&[300]));
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        assert!(sched.tick(0, &mut radio).is_some());
        // Next interval is 100 + 300
        assert_eq!(sched.tick(399, &mut radio), None);
        assert!(sched.tick(400, &mut radio).is_some());
    }

    #[test]
    fn test_colliding_draws_are_bumped() {
        // Every draw yields the same bytes
        let mut sched = ActionScheduler::new(FloodConfig::default(), ConstRng(0x42));
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();

        let mut seen: std::vec::Vec<Address> = std::vec::Vec::new();
        let mut now = 0;
        for _ in 0..3 * RECENT_ADDRESSES {
            match sched.tick(now, &mut radio) {
                Some(TickOutcome::Published(addr)) => {
                    let window = &seen[seen.len().saturating_sub(RECENT_ADDRESSES)..];
                    assert!(!window.contains(&addr), "{addr} reused within window");
                    seen.push(addr);
                }
                other => panic!("unexpected {other:?}"),
            }
            now += 500;
        }

        // The window is full by now, so the first address is free again
        assert_eq!(seen[RECENT_ADDRESSES + 1], seen[0]);
    }

    #[test]
    fn test_many_bursts_never_repeat() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        let mut now = 0;
        for _ in 0..500 {
            sched.tick(now, &mut radio);
            now += 1;
        }
        let addresses = radio.published_addresses();
        assert!(addresses.len() > 1);
        for (i, a) in addresses.iter().enumerate() {
            assert!(!addresses[i + 1..].contains(a));
        }
    }

    #[test]
    fn test_publish_failure_keeps_schedule() {
        let mut sched = ActionScheduler::new(FloodConfig::default(), ScriptedRng::new(&[0]));
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        radio.fail_publish = Some(RadioError::Timeout);

        assert_eq!(
            sched.tick(0, &mut radio),
            Some(TickOutcome::Failed(RadioError::Timeout))
        );
        assert!(sched.is_active());
        assert_eq!(sched.next_fire_at(), Some(100));
        assert_eq!(sched.bursts_failed(), 1);

        radio.fail_publish = None;
        assert!(matches!(
            sched.tick(100, &mut radio),
            Some(TickOutcome::Published(_))
        ));
    }

    #[test]
    fn test_start_then_stop_tears_down_once() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        assert!(sched.stop(&mut radio));
        assert!(!sched.stop(&mut radio));
        assert_eq!(radio.stop_count(), 1);
        assert!(!sched.is_active());
        assert_eq!(sched.tick(10_000, &mut radio), None);
    }

    #[test]
    fn test_stop_ignores_teardown_error() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        radio.fail_stop = Some(RadioError::Link);
        sched.start(0, &mut radio).unwrap();
        assert!(sched.stop(&mut radio));
        assert!(!sched.is_active());
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut sched = scheduler();
        let mut radio = MockRadio::new();
        sched.start(0, &mut radio).unwrap();
        sched.tick(0, &mut radio);
        assert_eq!(sched.bursts_sent(), 1);
        sched.stop(&mut radio);
        sched.start(1000, &mut radio).unwrap();
        assert_eq!(sched.bursts_sent(), 0);
        assert_eq!(sched.next_fire_at(), Some(1000));
    }
}
