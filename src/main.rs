//! ThingNode firmware, main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LoopbackFramework   NvsAdapter         │
//! │  (DHT + button + LED)   (ThingFramework)    (Config+Storage)   │
//! │  LogEventSink           SystemClock                            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             DeviceNode (ThingHandler)                  │    │
//! │  │  SensorPoller · ResetGesture · InboundRouter           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · Watchdog                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use thingnode::adapters::framework::LoopbackFramework;
use thingnode::adapters::hardware::HardwareAdapter;
use thingnode::adapters::log_sink::LogEventSink;
use thingnode::adapters::nvs::NvsAdapter;
use thingnode::adapters::time::SystemClock;
use thingnode::app::handler::ThingHandler;
use thingnode::app::ports::{ConfigPort, PlatformPort};
use thingnode::app::service::DeviceNode;
use thingnode::config::NodeConfig;
use thingnode::drivers::button::ResetButton;
use thingnode::drivers::hw_init;
use thingnode::drivers::status_led::StatusLed;
use thingnode::drivers::watchdog::Watchdog;
use thingnode::pins;
use thingnode::scheduler::Scheduler;
use thingnode::sensors::dht::DhtSensor;

/// Scheduler resolution.  Shorter than every task interval.
const LOOP_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ThingNode v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let watchdog = Watchdog::default();

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {}", e))?;
    let config = nvs.load().unwrap_or_else(|e| {
        warn!("NVS config load failed ({}), using defaults", e);
        NodeConfig::default()
    });

    // ── 4. Adapters ───────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    // GPIO4 == pins::DHT_DATA_GPIO; open-drain so the sensor can pull low.
    let dht_pin = PinDriver::input_output_od(peripherals.pins.gpio4)?;
    let sensor = DhtSensor::new(config.sensor_kind, dht_pin, Ets);

    let hw = HardwareAdapter::new(
        sensor,
        ResetButton::new(pins::RESET_BUTTON_GPIO),
        StatusLed::new(pins::STATUS_LED_GPIO),
        SystemClock::new(),
    );

    // ── 5. Node ───────────────────────────────────────────────
    let mut node = DeviceNode::new(config, hw, LoopbackFramework::new(), nvs, LogEventSink::new());
    let mut timers = Scheduler::new();
    node.setup(&mut timers);

    info!("Node {} ready, entering scheduler loop", node.get_mac_address());

    // ── 6. Scheduler loop ─────────────────────────────────────
    // Never returns.  The node marks itself offline (`shutdown`) before
    // any restart it initiates; a power cut gives no notice.
    loop {
        let now = node.hw().now_ms();
        timers.tick(now, &mut node);
        watchdog.feed();
        FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
