//! One-shot GPIO initialisation for the reset button and status LED.
//!
//! Uses raw ESP-IDF sys calls.  Called once from `main()` before the
//! scheduler loop starts.  The DHT data line is owned by an
//! `esp-idf-hal` pin driver and is not touched here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::Result;

#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: called once from main() before the loop; single-threaded.
    unsafe {
        init_button()?;
        init_led()?;
    }
    info!("hw_init: GPIO configured (button={}, led={})", pins::RESET_BUTTON_GPIO, pins::STATUS_LED_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Reset button (active-low, internal pull-up, polled) ───────

#[cfg(target_os = "espidf")]
unsafe fn init_button() -> Result<()> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::RESET_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: button gpio_config rc={}", ret);
        return Err(Error::Init("reset button GPIO config failed"));
    }
    Ok(())
}

// ── Status LED (push-pull output, starts off) ─────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_led() -> Result<()> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::STATUS_LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: led gpio_config rc={}", ret);
        return Err(Error::Init("status LED GPIO config failed"));
    }
    unsafe { gpio_set_level(pins::STATUS_LED_GPIO, 0) };
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: register read on a pin configured as input in init_button().
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulation: the line idles high (pull-up) unless pulled low through
/// [`sim::set_level`].
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::level(pin)
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: register write on a pin configured as output in init_led();
    // main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

/// Host-side input level injection.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicU64, Ordering};

    /// One bit per GPIO, set while the line is held low.
    static LOW: AtomicU64 = AtomicU64::new(0);

    pub fn set_level(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            LOW.fetch_and(!bit, Ordering::AcqRel);
        } else {
            LOW.fetch_or(bit, Ordering::AcqRel);
        }
    }

    pub(super) fn level(pin: i32) -> bool {
        LOW.load(Ordering::Acquire) & (1u64 << pin) == 0
    }
}
