//! GPIO pin assignments for the thing-node board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// DHT11 / DHT22 single-wire sensor
// ---------------------------------------------------------------------------

/// Open-drain data line with a 10 kΩ external pull-up.
/// The binary claims this pin through `Peripherals` (see `main`).
pub const DHT_DATA_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Reset button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button; hold to factory reset.
pub const RESET_BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// On-board LED, active HIGH.  Driven by the `led_on` / `led_off` actions.
pub const STATUS_LED_GPIO: i32 = 2;
