//! Node configuration parameters
//!
//! All tunable parameters for the thing node.
//! Values can be overridden via NVS (non-volatile storage); a factory reset
//! erases the stored copy and the node boots with these defaults again.

use serde::{Deserialize, Serialize};

use crate::adapters::utils::is_printable_ascii;
use crate::app::ports::ConfigError;
use crate::sensors::dht::DhtKind;

/// Maximum length of the human-readable node label.
pub const NODE_LABEL_CAP: usize = 32;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Identity ---
    /// Label shown next to the node in the fleet console.
    pub node_label: heapless::String<NODE_LABEL_CAP>,

    // --- Sensor ---
    /// Which DHT variant is wired to the data pin.
    pub sensor_kind: DhtKind,
    /// Sensor poll interval (milliseconds).  Never below the sensor's
    /// minimum sampling interval.
    pub sensor_read_interval_ms: u32,
    /// Interval at which the latest values are published (milliseconds).
    pub report_interval_ms: u32,

    // --- Reset gesture ---
    /// How long the reset button must be held before a factory reset.
    pub reset_hold_ms: u32,
    /// How often the reset button level is sampled.
    pub reset_poll_interval_ms: u32,

    // --- Link ---
    /// How often a disconnected framework link is retried.
    pub reconnect_interval_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let mut node_label = heapless::String::new();
        // Fits: the literal is shorter than NODE_LABEL_CAP.
        let _ = node_label.push_str("DHT Node");

        Self {
            node_label,

            // Sensor
            sensor_kind: DhtKind::Dht11,
            sensor_read_interval_ms: 2_000, // 0.5 Hz
            report_interval_ms: 10_000,

            // Reset gesture
            reset_hold_ms: 3_000,
            reset_poll_interval_ms: 100, // 10 Hz

            // Link
            reconnect_interval_ms: 10_000,
        }
    }
}

impl NodeConfig {
    /// The configured sensor poll interval, raised to the sensor's minimum.
    pub fn effective_read_interval_ms(&self) -> u32 {
        self.sensor_read_interval_ms
            .max(self.sensor_kind.min_interval_ms())
    }

    /// Range-check every field.  Out-of-range values are rejected, never
    /// clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_label.is_empty() || !is_printable_ascii(&self.node_label) {
            return Err(ConfigError::ValidationFailed(
                "node_label must be non-empty printable ASCII",
            ));
        }
        if self.sensor_read_interval_ms < self.sensor_kind.min_interval_ms() {
            return Err(ConfigError::ValidationFailed(
                "sensor_read_interval_ms is below the sensor minimum",
            ));
        }
        if self.sensor_read_interval_ms > 3_600_000 {
            return Err(ConfigError::ValidationFailed(
                "sensor_read_interval_ms must be at most 1 h",
            ));
        }
        if !(1_000..=3_600_000).contains(&self.report_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "report_interval_ms must be 1 s to 1 h",
            ));
        }
        if !(1_000..=60_000).contains(&self.reset_hold_ms) {
            return Err(ConfigError::ValidationFailed(
                "reset_hold_ms must be 1000-60000",
            ));
        }
        if !(10..=1_000).contains(&self.reset_poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "reset_poll_interval_ms must be 10-1000",
            ));
        }
        if self.reset_poll_interval_ms >= self.reset_hold_ms {
            return Err(ConfigError::ValidationFailed(
                "reset_poll_interval_ms must be < reset_hold_ms",
            ));
        }
        if !(1_000..=600_000).contains(&self.reconnect_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "reconnect_interval_ms must be 1 s to 10 min",
            ));
        }
        Ok(())
    }
}

/// Partial configuration pushed by the framework.
///
/// Absent fields keep their current value.  The sensor kind is wired at
/// build time and cannot be changed remotely.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigUpdate {
    pub node_label: Option<heapless::String<NODE_LABEL_CAP>>,
    pub sensor_read_interval_ms: Option<u32>,
    pub report_interval_ms: Option<u32>,
    pub reset_hold_ms: Option<u32>,
    pub reset_poll_interval_ms: Option<u32>,
    pub reconnect_interval_ms: Option<u32>,
}

impl ConfigUpdate {
    /// `base` with every present field overridden.  Not validated.
    pub fn apply_to(&self, base: &NodeConfig) -> NodeConfig {
        NodeConfig {
            node_label: self.node_label.clone().unwrap_or_else(|| base.node_label.clone()),
            sensor_kind: base.sensor_kind,
            sensor_read_interval_ms: self
                .sensor_read_interval_ms
                .unwrap_or(base.sensor_read_interval_ms),
            report_interval_ms: self.report_interval_ms.unwrap_or(base.report_interval_ms),
            reset_hold_ms: self.reset_hold_ms.unwrap_or(base.reset_hold_ms),
            reset_poll_interval_ms: self
                .reset_poll_interval_ms
                .unwrap_or(base.reset_poll_interval_ms),
            reconnect_interval_ms: self
                .reconnect_interval_ms
                .unwrap_or(base.reconnect_interval_ms),
        }
    }
}
