//! Single-colour status LED on a plain GPIO output.
//!
//! On ESP-IDF the level is written through `hw_init`; on the host only
//! the in-memory state changes.

use crate::drivers::hw_init;

pub struct StatusLed {
    gpio: i32,
    on: bool,
}

impl StatusLed {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
