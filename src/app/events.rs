//! Outbound application events.
//!
//! The [`DeviceNode`](super::service::DeviceNode) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::error::SensorError;
use crate::sensors::Metric;

use super::actions::ThingAction;
use super::ports::ConfigError;

/// Structured events emitted by the node core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// `setup` finished.  Carries whether the sensor answered at boot.
    Started { sensor_available: bool },

    /// A metric was read successfully.
    Reading { metric: Metric, value: f32 },

    /// A metric read failed; the previous value is kept.
    ReadFailed { metric: Metric, error: SensorError },

    /// A value was handed to the framework.
    Reported { thing_id: &'static str, value: f32 },

    /// A report found no data for this metric.
    NoData(Metric),

    /// A remote action ran.
    ActionExecuted(ThingAction),

    /// A message addressed to another device was dropped.
    TargetMismatch,

    /// Something arrived that could not be dispatched.  Carries the
    /// message as it arrived.
    UnknownMessage(String),

    /// A configuration update was stored and is now in effect.
    ConfigApplied,

    /// A configuration update failed validation or could not be stored.
    ConfigRejected(ConfigError),

    /// A reset hold started.
    ResetArmed { since_ms: u32 },

    /// The button was released before the hold threshold.
    ResetCancelled { held_ms: u32 },

    /// Stored state is being erased; a restart follows.
    FactoryReset,

    /// Framework link came up.
    LinkUp,

    /// Framework link dropped.
    LinkDown,

    /// Node and things registered with the framework.
    Registered { things: u8 },
}
