//! DHT11 / DHT22 single-wire temperature and humidity sensor.
//!
//! The data line is open-drain with an external pull-up.  A read is:
//!
//! ```text
//!  host:   ──┐  start  ┌── release ──
//!            └─────────┘
//!  sensor:                  ┐ 80µs ┌ 80µs ┐ 50µs ┌ 26µs (0) / 70µs (1) ┐ ... ×40
//!                           └──────┘      └──────┘                     └
//! ```
//!
//! Each bit is a ~50 µs low followed by a high whose width encodes the bit.
//! The driver counts polling iterations for both halves and calls the bit
//! a 1 when the high half is longer, so the absolute loop speed does not
//! matter.
//!
//! ## Dual-target design
//!
//! The driver is generic over `embedded-hal` 1.0 pins and delays.  On
//! ESP-IDF `main` hands it a `PinDriver` in input-output open-drain mode
//! and `Ets`.  Host tests drive it with a scripted waveform.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use serde::{Deserialize, Serialize};

use crate::app::ports::SensorPort;
use crate::error::SensorError;

/// Upper bound for a single pulse, in polling iterations (≈ µs).
const PULSE_TIMEOUT: u32 = 1_000;
/// Host keeps the line released before the start pulse.
const PRE_START_HIGH_MS: u32 = 1;
/// Wait after releasing the line before the sensor's response begins.
const RELEASE_WAIT_US: u32 = 40;

/// Supported sensor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DhtKind {
    /// 1 °C / 1 % resolution, 0–50 °C.
    Dht11,
    /// 0.1 °C / 0.1 % resolution, −40–80 °C.  Also AM2302.
    Dht22,
}

impl DhtKind {
    /// Minimum time between two bus transactions.
    pub const fn min_interval_ms(self) -> u32 {
        match self {
            Self::Dht11 => 1_000,
            Self::Dht22 => 2_000,
        }
    }

    /// Length of the host start pulse.
    const fn start_low_us(self) -> u32 {
        match self {
            Self::Dht11 => 20_000,
            Self::Dht22 => 1_100,
        }
    }

    fn temperature_range(self) -> core::ops::RangeInclusive<f32> {
        match self {
            Self::Dht11 => -20.0..=60.0,
            Self::Dht22 => -40.0..=80.0,
        }
    }
}

/// One decoded 40-bit frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtFrame {
    pub humidity: f32,
    pub temperature: f32,
}

/// Verify the checksum and convert the raw bytes for `kind`.
pub fn decode(kind: DhtKind, raw: [u8; 5]) -> Result<DhtFrame, SensorError> {
    let sum = raw[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != raw[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let (humidity, temperature) = match kind {
        DhtKind::Dht11 => {
            let humidity = raw[0] as f32 + raw[1] as f32 * 0.1;
            let magnitude = raw[2] as f32 + (raw[3] & 0x0F) as f32 * 0.1;
            let temperature = if raw[3] & 0x80 != 0 { -magnitude } else { magnitude };
            (humidity, temperature)
        }
        DhtKind::Dht22 => {
            let humidity = u16::from_be_bytes([raw[0], raw[1]]) as f32 * 0.1;
            let magnitude = u16::from_be_bytes([raw[2] & 0x7F, raw[3]]) as f32 * 0.1;
            let temperature = if raw[2] & 0x80 != 0 { -magnitude } else { magnitude };
            (humidity, temperature)
        }
    };

    if !(0.0..=100.0).contains(&humidity) || !kind.temperature_range().contains(&temperature) {
        return Err(SensorError::OutOfRange);
    }

    Ok(DhtFrame {
        humidity,
        temperature,
    })
}

/// Bit-banged DHT driver with a sampling-interval guard.
///
/// Requests that arrive inside [`DhtKind::min_interval_ms`] of the last
/// bus transaction return that transaction's result, so temperature and
/// humidity can be asked for separately without two reads.
pub struct DhtSensor<P, D> {
    kind: DhtKind,
    pin: P,
    delay: D,
    last: Option<(u32, Result<DhtFrame, SensorError>)>,
}

impl<P, D> DhtSensor<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(kind: DhtKind, pin: P, delay: D) -> Self {
        Self {
            kind,
            pin,
            delay,
            last: None,
        }
    }

    /// Read a frame, reusing the cached result inside the sampling interval.
    pub fn read(&mut self, now_ms: u32) -> Result<DhtFrame, SensorError> {
        if let Some((at, result)) = self.last {
            if now_ms.wrapping_sub(at) < self.kind.min_interval_ms() {
                return result;
            }
        }
        let result = self.read_raw().and_then(|raw| decode(self.kind, raw));
        self.last = Some((now_ms, result));
        result
    }

    /// Perform one bus transaction and return the five raw bytes.
    pub fn read_raw(&mut self) -> Result<[u8; 5], SensorError> {
        self.pin.set_high().map_err(|_| SensorError::Bus)?;
        self.delay.delay_ms(PRE_START_HIGH_MS);
        self.pin.set_low().map_err(|_| SensorError::Bus)?;
        self.delay.delay_us(self.kind.start_low_us());

        // The response is ~4 ms of tight pulse timing.
        critical_section::with(|_| {
            self.pin.set_high().map_err(|_| SensorError::Bus)?;
            self.delay.delay_us(RELEASE_WAIT_US);
            self.response()
        })
    }

    fn response(&mut self) -> Result<[u8; 5], SensorError> {
        self.expect_pulse(false)?;
        self.expect_pulse(true)?;

        let mut raw = [0u8; 5];
        for bit in 0..40 {
            let low = self.expect_pulse(false)?;
            let high = self.expect_pulse(true)?;
            if high > low {
                raw[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(raw)
    }

    /// Count iterations while the line stays at `level`.
    fn expect_pulse(&mut self, level: bool) -> Result<u32, SensorError> {
        let mut count = 0;
        while self.pin.is_high().map_err(|_| SensorError::Bus)? == level {
            if count >= PULSE_TIMEOUT {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            count += 1;
        }
        Ok(count)
    }
}

impl<P, D> SensorPort for DhtSensor<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn detect(&mut self, now_ms: u32) -> Result<(), SensorError> {
        match self.read(now_ms) {
            // A corrupted frame still proves something answered.
            Ok(_) | Err(SensorError::ChecksumMismatch | SensorError::OutOfRange) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn read_temperature(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        self.read(now_ms).map(|f| f.temperature)
    }

    fn read_humidity(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        self.read(now_ms).map(|f| f.humidity)
    }
}
