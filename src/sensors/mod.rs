//! Sensor subsystem: the DHT driver and the [`SensorPoller`] that keeps
//! the last good reading for each metric.
//!
//! The poller does not own the sensor: the node passes its
//! [`SensorPort`] in on every call, so the same poller logic runs against
//! real hardware and against test doubles.

pub mod dht;

use log::{debug, warn};

use crate::app::ports::SensorPort;
use crate::error::SensorError;

/// Which of the two reportable values a read concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
        }
    }
}

/// Last-value-wins snapshot of both metrics.  `None` = no data yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: Option<f32>,
    /// Relative humidity, percent.
    pub humidity: Option<f32>,
}

impl SensorReading {
    pub fn get(&self, metric: Metric) -> Option<f32> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
        }
    }
}

/// Polls the sensor and retains the latest successful values.
///
/// Read failures are logged and the previous value is kept; a flaky
/// sensor must never take the node down.  If the boot-time detection fails
/// the sensor is marked unavailable and never touched again.
#[derive(Debug, Default)]
pub struct SensorPoller {
    available: bool,
    latest: SensorReading,
}

impl SensorPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the sensor once.  Never blocks beyond one bus transaction.
    pub fn init(&mut self, sensor: &mut impl SensorPort, now_ms: u32) -> bool {
        self.available = match sensor.detect(now_ms) {
            Ok(()) => true,
            Err(e) => {
                warn!("Sensor detection failed ({}), marking unavailable", e);
                false
            }
        };
        self.available
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn latest(&self) -> SensorReading {
        self.latest
    }

    pub fn read_temperature(
        &mut self,
        sensor: &mut impl SensorPort,
        now_ms: u32,
    ) -> Result<f32, SensorError> {
        self.read(Metric::Temperature, sensor, now_ms)
    }

    pub fn read_humidity(
        &mut self,
        sensor: &mut impl SensorPort,
        now_ms: u32,
    ) -> Result<f32, SensorError> {
        self.read(Metric::Humidity, sensor, now_ms)
    }

    fn read(
        &mut self,
        metric: Metric,
        sensor: &mut impl SensorPort,
        now_ms: u32,
    ) -> Result<f32, SensorError> {
        if !self.available {
            return Err(SensorError::Unavailable);
        }

        let result = match metric {
            Metric::Temperature => sensor.read_temperature(now_ms),
            Metric::Humidity => sensor.read_humidity(now_ms),
        };

        match result {
            Ok(value) => {
                debug!("{} = {:.1}", metric.name(), value);
                match metric {
                    Metric::Temperature => self.latest.temperature = Some(value),
                    Metric::Humidity => self.latest.humidity = Some(value),
                }
            }
            Err(e) => warn!("{} read failed: {}, keeping previous value", metric.name(), e),
        }
        result
    }
}
