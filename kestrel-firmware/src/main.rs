//! Kestrel - Handheld Radio Tool Firmware
//!
//! Main firmware binary for RP2040 boards with an SH1106 OLED, a rotary
//! encoder with push button and a radio coprocessor on UART1.
//!
//! Everything runs in the main task: each tick samples the inputs and
//! hands them to the [`Controller`], which drives the menu, the beacon
//! flood and the display.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Duration, Instant, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kestrel_core::config::DeviceConfig;
use kestrel_core::input::InputSample;
use kestrel_core::menu::STANDARD_MENU;
use kestrel_core::{AppEvent, Controller};
use kestrel_display::MenuRenderer;
use kestrel_drivers::{Clock, LinkConfig, RadioLink, Sh1106};

mod device_config {
    include!(concat!(env!("OUT_DIR"), "/device_config.rs"));
}

use device_config::{DEVICE_CONFIG, LINK_BAUDRATE, LINK_REPLY_TIMEOUT_MS, POLL_INTERVAL_MS};

bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Link deadlines from the embassy time driver
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Kestrel firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Display: SH1106 on I2C0 (SDA=GPIO16, SCL=GPIO17)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c_config);
    let mut oled = Sh1106::new(i2c);
    if let Err(e) = oled.init() {
        error!("Display init failed: {}", e);
        halt();
    }
    let mut view = MenuRenderer::new(oled);
    info!("Display initialized");

    // Encoder A/B and push button, active low
    let encoder_a = Input::new(p.PIN_2, Pull::Up);
    let encoder_b = Input::new(p.PIN_3, Pull::Up);
    let button = Input::new(p.PIN_4, Pull::Up);

    // Radio coprocessor on UART1 (TX=GPIO8, RX=GPIO9)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUDRATE;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART1, p.PIN_8, p.PIN_9, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let mut radio = RadioLink::new(
        uart,
        EmbassyClock,
        LinkConfig {
            reply_timeout_ms: LINK_REPLY_TIMEOUT_MS,
        },
    );
    match radio.ping() {
        Ok(()) => info!("Radio coprocessor answered"),
        // Not fatal: actions report the radio as unavailable
        Err(e) => warn!("Radio coprocessor not responding: {}", e),
    }

    let config: DeviceConfig = DEVICE_CONFIG;
    info!(
        "Config: debounce={}ms long_press={}ms flood={}..{}ms scan={}s",
        config.input.debounce_ms,
        config.input.long_press_ms,
        config.flood.min_interval_ms,
        config.flood.max_interval_ms,
        config.scan.duration_s
    );

    let mut controller = Controller::new(&STANDARD_MENU, config, RoscRng);
    if let Err(e) = controller.start(&mut view) {
        error!("Initial render failed: {}", e);
        halt();
    }
    info!("Menu ready");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        ticker.next().await;

        let sample = InputSample {
            encoder_a: encoder_a.is_high(),
            encoder_b: encoder_b.is_high(),
            button: button.is_high(),
        };
        let now = Instant::now().as_millis() as u32;

        let outcome = controller.poll(sample, now, &mut radio, &mut view);
        for event in outcome.events.iter() {
            log_event(event);
        }
    }
}

fn log_event(event: &AppEvent) {
    match event {
        AppEvent::ScanCompleted { found } => info!("Scan complete: {} found", found),
        AppEvent::ScanFailed(e) => warn!("Scan failed: {}", e),
        AppEvent::FloodStarted => info!("Beacon flood started"),
        AppEvent::FloodStartFailed(e) => warn!("Beacon flood failed to start: {}", e),
        AppEvent::FloodCancelled { bursts } => {
            info!("Beacon flood stopped after {} bursts", bursts)
        }
        AppEvent::BurstSent(address) => trace!("Burst sent from {}", address),
        AppEvent::BurstFailed(e) => debug!("Burst failed: {}", e),
        AppEvent::ActionUnavailable(action) => warn!("Action unavailable: {}", action),
        AppEvent::RenderFailed(e) => error!("Render failed: {}", e),
    }
}

/// Park the core; nothing useful can run without a display
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
