//! Hardware adapter that bridges real peripherals to the domain port traits.
//!
//! Owns the sensor, reset button, status LED and clock, exposing them
//! through [`SensorPort`], [`ResetInputPort`], [`ActuatorPort`] and
//! [`PlatformPort`].  On non-espidf targets the underlying drivers use
//! cfg-gated simulation stubs.

use log::warn;

use crate::app::ports::{ActuatorPort, PlatformPort, ResetInputPort, SensorPort};
use crate::drivers::button::ResetButton;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;

use super::device_id::{self, MacAddress};
use super::time::SystemClock;

/// Concrete adapter that combines all board hardware behind port traits.
pub struct HardwareAdapter<S> {
    sensor: S,
    button: ResetButton,
    led: StatusLed,
    clock: SystemClock,
}

impl<S: SensorPort> HardwareAdapter<S> {
    pub fn new(sensor: S, button: ResetButton, led: StatusLed, clock: SystemClock) -> Self {
        Self {
            sensor,
            button,
            led,
            clock,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort> SensorPort for HardwareAdapter<S> {
    fn detect(&mut self, now_ms: u32) -> Result<(), SensorError> {
        self.sensor.detect(now_ms)
    }

    fn read_temperature(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        self.sensor.read_temperature(now_ms)
    }

    fn read_humidity(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        self.sensor.read_humidity(now_ms)
    }
}

// ── Input / actuator / platform ───────────────────────────────

impl<S> ResetInputPort for HardwareAdapter<S> {
    fn is_reset_asserted(&mut self) -> bool {
        self.button.is_pressed()
    }
}

impl<S> ActuatorPort for HardwareAdapter<S> {
    fn set_led(&mut self, on: bool) {
        self.led.set(on);
    }

    fn is_led_on(&self) -> bool {
        self.led.is_on()
    }
}

impl<S> PlatformPort for HardwareAdapter<S> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    fn mac_address(&self) -> MacAddress {
        device_id::read_mac()
    }

    #[cfg(target_os = "espidf")]
    fn restart(&mut self) {
        warn!("Restarting");
        // SAFETY: plain IDF call; does not return.
        unsafe { esp_idf_svc::sys::esp_restart() }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self) {
        warn!("Restart requested (simulation)");
    }
}
