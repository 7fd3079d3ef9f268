//! GPIO drivers, one-shot hardware initialisation and the task watchdog.

pub mod button;
pub mod hw_init;
pub mod status_led;
pub mod watchdog;
