//! Application controller
//!
//! Owns the input decoder, the menu model, and the action scheduler, and
//! runs one loop iteration per `poll`:
//!
//! 1. Decode the sample
//! 2. Cancel a running flood on any button activity
//! 3. Otherwise feed encoder and button events to the menu
//! 4. Time out notices
//! 5. Advance the flood task
//! 6. Render if anything visible changed

use heapless::Vec;
use rand_core::RngCore;

use crate::config::DeviceConfig;
use crate::events::AppEvent;
use crate::input::{ButtonEvent, InputDecoder, InputSample};
use crate::menu::{ActionId, ClickOutcome, MenuModel, MenuTree, Notice, Screen};
use crate::scheduler::{ActionScheduler, TickOutcome};
use crate::time::Millis;
use crate::traits::{RadioError, RadioGateway, RenderError, RenderGateway};

/// Most events one poll can report
pub const MAX_POLL_EVENTS: usize = 4;

/// Text of the About notice
pub const VERSION_TEXT: &str = concat!("Kestrel v", env!("CARGO_PKG_VERSION"));

/// What happened during one poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// A render succeeded
    pub rendered: bool,
    pub events: Vec<AppEvent, MAX_POLL_EVENTS>,
}

impl PollOutcome {
    fn record(&mut self, event: AppEvent) {
        let _ = self.events.push(event);
    }
}

/// Controller state threaded through the poll loop
pub struct Controller<R> {
    decoder: InputDecoder,
    menu: MenuModel,
    scheduler: ActionScheduler<R>,
    config: DeviceConfig,
}

impl<R: RngCore> Controller<R> {
    pub fn new(tree: &'static MenuTree, config: DeviceConfig, rng: R) -> Self {
        Self {
            decoder: InputDecoder::new(&config.input),
            menu: MenuModel::new(tree),
            scheduler: ActionScheduler::new(config.flood, rng),
            config,
        }
    }

    /// Draw the initial screen
    ///
    /// An error here means the display is unusable.
    pub fn start<V: RenderGateway>(&mut self, view: &mut V) -> Result<(), RenderError> {
        let labels = self.menu.labels();
        view.render(self.menu.title(), &labels, self.menu.cursor())
    }

    /// Run one loop iteration
    pub fn poll<G, V>(
        &mut self,
        sample: InputSample,
        now: Millis,
        radio: &mut G,
        view: &mut V,
    ) -> PollOutcome
    where
        G: RadioGateway,
        V: RenderGateway,
    {
        let mut out = PollOutcome::default();
        let frame = self.decoder.poll(sample, now);
        let mut changed = false;

        if self.scheduler.is_active() && frame.button_down {
            // Kill switch: the press never reaches the menu
            self.decoder.suppress_current_press();
            self.cancel_flood(radio, &mut out);
            changed |= self.menu.return_to_owner();
        } else {
            if let Some(event) = frame.encoder {
                changed |= self.menu.on_encoder(event);
            }
            match frame.button {
                Some(ButtonEvent::Click) => {
                    changed |= self.handle_click(now, radio, view, &mut out);
                }
                Some(ButtonEvent::LongPress) => {
                    changed |= self.menu.on_long_press();
                }
                None => {}
            }
        }

        changed |= self.menu.expire_notice(now, self.config.ui.notice_ms);

        if self.scheduler.is_active() && !matches!(self.menu.screen(), Screen::Flooding { .. }) {
            self.cancel_flood(radio, &mut out);
        }

        match self.scheduler.tick(now, radio) {
            Some(TickOutcome::Published(address)) => out.record(AppEvent::BurstSent(address)),
            Some(TickOutcome::Failed(e)) => out.record(AppEvent::BurstFailed(e)),
            None => {}
        }

        if changed {
            self.draw(view, &mut out);
        }

        out
    }

    pub fn menu(&self) -> &MenuModel {
        &self.menu
    }

    pub fn scheduler(&self) -> &ActionScheduler<R> {
        &self.scheduler
    }

    pub fn screen(&self) -> &Screen {
        self.menu.screen()
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn handle_click<G, V>(
        &mut self,
        now: Millis,
        radio: &mut G,
        view: &mut V,
        out: &mut PollOutcome,
    ) -> bool
    where
        G: RadioGateway,
        V: RenderGateway,
    {
        match self.menu.on_click() {
            ClickOutcome::Ignored => false,
            ClickOutcome::Moved => true,
            ClickOutcome::Dispatch(action) => {
                self.dispatch(action, now, radio, view, out);
                true
            }
        }
    }

    fn dispatch<G, V>(
        &mut self,
        action: ActionId,
        now: Millis,
        radio: &mut G,
        view: &mut V,
        out: &mut PollOutcome,
    ) where
        G: RadioGateway,
        V: RenderGateway,
    {
        let label = self.menu.leaf_label();
        match action {
            ActionId::BleScan | ActionId::WifiScan => {
                self.menu.show_scanning();
                self.draw(view, out);

                let duration_s = self.config.scan.duration_s;
                let result = if action == ActionId::BleScan {
                    radio.scan(duration_s)
                } else {
                    radio.scan_networks(duration_s)
                };

                match result {
                    Ok(entries) => {
                        out.record(AppEvent::ScanCompleted {
                            found: entries.len() as u8,
                        });
                        self.menu.show_scan_results(&entries);
                    }
                    Err(RadioError::Unsupported) => {
                        out.record(AppEvent::ActionUnavailable(action));
                        self.menu.show_notice(Notice::new(label, "Not supported"));
                    }
                    Err(e) => {
                        out.record(AppEvent::ScanFailed(e));
                        self.menu.show_notice(Notice::new(label, "Scan failed"));
                    }
                }
            }
            ActionId::BeaconFlood => match self.scheduler.start(now, radio) {
                Ok(()) => {
                    out.record(AppEvent::FloodStarted);
                    self.menu.show_flooding();
                }
                Err(e) => {
                    out.record(AppEvent::FloodStartFailed(e));
                    self.menu.show_notice(Notice::new(label, "Radio unavailable"));
                }
            },
            ActionId::NfcRead => {
                out.record(AppEvent::ActionUnavailable(action));
                self.menu.show_notice(Notice::new(label, "NFC unavailable"));
            }
            ActionId::About => {
                self.menu.show_notice(Notice::new(label, VERSION_TEXT));
            }
        }
    }

    fn cancel_flood<G: RadioGateway>(&mut self, radio: &mut G, out: &mut PollOutcome) {
        let bursts = self.scheduler.bursts_sent();
        if self.scheduler.stop(radio) {
            out.record(AppEvent::FloodCancelled { bursts });
        }
    }

    fn draw<V: RenderGateway>(&mut self, view: &mut V, out: &mut PollOutcome) {
        let labels = self.menu.labels();
        match view.render(self.menu.title(), &labels, self.menu.cursor()) {
            Ok(()) => out.rendered = true,
            Err(e) => out.record(AppEvent::RenderFailed(e)),
        }
    }
}
