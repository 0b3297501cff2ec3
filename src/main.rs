//! Doorsign firmware: hackerspace door-state monitor.
//!
//! Hexagonal architecture with a single blocking poll loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  WifiLink       SpaceNotifier    SystemClock             │
//! │  (LinkPort)     (NotifierPort)   (ClockPort)             │
//! │  LogEventSink   DoorSwitch       BlinkIndicator          │
//! │  (EventSink)    (DoorSensorPort) (IndicatorPort)         │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            DoorMonitor (pure logic)            │      │
//! │  │   sample · settle · confirm · commit · report  │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{bail, Result};
use log::{info, warn};

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use doorsign::adapters::clock::SystemClock;
use doorsign::adapters::log_sink::LogEventSink;
use doorsign::adapters::notifier::SpaceNotifier;
use doorsign::adapters::wifi::WifiLink;
use doorsign::config::DeviceConfig;
use doorsign::drivers::door_switch::DoorSwitch;
use doorsign::drivers::indicator::BlinkIndicator;
use doorsign::drivers::status_led::StatusLed;
use doorsign::monitor::DoorMonitor;
use doorsign::pins;
use doorsign::ports::{IndicatorPattern, IndicatorPort};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();

    info!("doorsign v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Build-time configuration ───────────────────────────
    let config = DeviceConfig::default();
    if let Err(e) = config.validate() {
        bail!("build-time configuration rejected: {e}");
    }
    info!(
        "reporting space {} to https://{}",
        config.space_id, config.host
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let Peripherals { modem, .. } = Peripherals::take()?;

    let mut door_pin = unsafe { PinDriver::input(AnyIOPin::new(pins::DOOR_SWITCH_GPIO)) }?;
    door_pin.set_pull(Pull::Up)?;
    let led_pin = unsafe { PinDriver::output(AnyOutputPin::new(pins::STATUS_LED_GPIO)) }?;

    let mut sensor = DoorSwitch::new(door_pin);
    let mut indicator = BlinkIndicator::new(StatusLed::new(led_pin), SystemClock::new());
    let mut clock = SystemClock::new();

    // ── 4. Network bring-up ───────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut link = match WifiLink::new(modem, sysloop, nvs) {
        Ok(link) => link,
        Err(e) => bail!("wifi driver init failed: {e}"),
    };
    if let Err(e) = link.add_network(&config.ssid, &config.password) {
        bail!("primary network rejected: {e}");
    }
    if let Some((ssid, password)) = config.secondary_network() {
        if let Err(e) = link.add_network(ssid, password) {
            warn!("secondary network rejected: {e}");
        }
    }
    if let Err(e) = link.connect() {
        // Not fatal: reports are skipped while the link is down, and the
        // link retries one candidate per poll cycle.
        warn!("initial association failed: {e}");
    }

    let mut notifier = SpaceNotifier::new(link, &config);

    // ── 5. Arm the monitor ────────────────────────────────────
    indicator.show(IndicatorPattern::Startup);

    let mut sink = LogEventSink::new();
    let mut monitor = DoorMonitor::seed(&mut sensor, &mut sink);

    // ── 6. Poll loop ──────────────────────────────────────────
    loop {
        monitor.poll_cycle(
            &mut sensor,
            &mut notifier,
            &mut indicator,
            &mut clock,
            &mut sink,
        );
    }
}
