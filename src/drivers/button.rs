//! Reset button driver.
//!
//! Active-low momentary switch with the internal pull-up enabled.  The
//! level is polled from the reset-check task; the hold gesture itself
//! is recognised by [`ResetGesture`](crate::app::reset::ResetGesture),
//! so this driver only answers "is it down right now".

use crate::drivers::hw_init;

pub struct ResetButton {
    gpio: i32,
}

impl ResetButton {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn is_pressed(&self) -> bool {
        !hw_init::gpio_read(self.gpio)
    }
}
