//! Port traits: the hexagonal boundary between the node logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DeviceNode (domain)
//! ```
//!
//! Driven adapters (sensor, reset button, LED, framework link, storage,
//! event sinks) implement these traits.  The
//! [`DeviceNode`](super::service::DeviceNode) owns one implementation of
//! each, so the domain core never touches hardware directly.

use crate::adapters::device_id::MacAddress;
use crate::config::NodeConfig;
use crate::error::SensorError;
use crate::scheduler::Scheduler;

use super::actions::ThingAction;
use super::inventory::{NodeDescriptor, ThingData, ThingDescriptor};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Blocking temperature/humidity primitives with a typed failure signal.
///
/// `now_ms` lets the implementation enforce the sensor's minimum
/// sampling interval.
pub trait SensorPort {
    /// Check that a sensor answers at all.  Called once from `setup`.
    fn detect(&mut self, now_ms: u32) -> Result<(), SensorError>;

    /// Degrees Celsius.
    fn read_temperature(&mut self, now_ms: u32) -> Result<f32, SensorError>;

    /// Relative humidity, percent.
    fn read_humidity(&mut self, now_ms: u32) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Input / actuator / platform ports
// ───────────────────────────────────────────────────────────────

/// The physical reset input.
pub trait ResetInputPort {
    /// `true` while the button is held.
    fn is_reset_asserted(&mut self) -> bool;
}

/// Write-side port: the node drives its status LED through this.
pub trait ActuatorPort {
    fn set_led(&mut self, on: bool);

    fn is_led_on(&self) -> bool;
}

/// Board services: clock, hardware identity, restart.
pub trait PlatformPort {
    /// Milliseconds since boot (monotonic, wraps at `u32::MAX`).
    fn now_ms(&self) -> u32;

    /// Factory MAC of the network interface.
    fn mac_address(&self) -> MacAddress;

    /// Reboot the device.  On target this does not return.
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Thing framework port (driven adapter: domain ↔ fleet service)
// ───────────────────────────────────────────────────────────────

/// The fleet-management framework as the node sees it.
///
/// The wire protocol behind it is not the node's concern.  Boolean
/// returns mirror the framework's own accept/reject answers.
pub trait ThingFramework {
    /// Try to (re)establish the link.  Returns the resulting link state.
    fn connect(&mut self) -> bool;

    fn is_connected(&self) -> bool;

    /// Register the node.  Registering an already-known node succeeds.
    fn register_node(&mut self, node: &NodeDescriptor) -> bool;

    /// Register a thing under the node.
    fn register_thing(&mut self, thing: &ThingDescriptor) -> bool;

    /// Announce the action vocabulary the node accepts.
    fn register_actions(&mut self, actions: &'static [ThingAction]) -> bool;

    /// Mark a registered thing online or offline.
    fn set_thing_connected(&mut self, thing_id: &str, online: bool, reason: &str);

    /// Mark the node online or offline.
    fn set_node_connected(&mut self, online: bool, reason: &str);

    /// Publish one value on a thing.  Returns `false` if the framework
    /// did not accept it.
    fn publish(&mut self, thing_id: &str, data: ThingData) -> bool;

    /// Next raw inbound message, if any.
    fn poll_inbound(&mut self) -> Option<String>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The node emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists node configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// ranges with [`ConfigError::ValidationFailed`] instead of clamping.
pub trait ConfigPort {
    /// Load configuration.  Returns [`NodeConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<NodeConfig, ConfigError>;

    /// Validate and persist configuration.  Nothing is written when
    /// validation fails.
    fn save(&mut self, config: &NodeConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Namespace holding the persisted [`NodeConfig`].
pub const CONFIG_NAMESPACE: &str = "thingnode";
/// Namespace holding the framework registration record.
pub const REGISTRATION_NAMESPACE: &str = "ignite";
/// Key under [`REGISTRATION_NAMESPACE`] storing the registered node id.
pub const NODE_ID_KEY: &str = "node_id";

/// Persistent key-value storage.
///
/// Keys are namespaced to prevent collisions between subsystems.  Writes
/// MUST be atomic, with no partial writes on power loss.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Remove every key in `namespace` (factory reset).
    fn erase_namespace(&mut self, namespace: &str) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the node)
// ───────────────────────────────────────────────────────────────

/// Recurring jobs the node registers with the
/// [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Read temperature and humidity.
    SensorPoll,
    /// Sample the reset button (`reset_on`).
    ResetCheck,
    /// Publish the latest values.
    Report,
    /// Check the framework link, reconnect and re-register as needed.
    LinkWatchdog,
    /// Drain inbound framework messages.
    Inbound,
}

/// Callback trait that the scheduler invokes when a task is due.
///
/// The scheduler knows nothing about sensors or the framework; the node
/// implements this and maps each [`TimerTask`] onto one of its methods.
/// `timers` is the firing scheduler, so a task may reschedule others.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: TimerTask, now_ms: u32, timers: &mut Scheduler);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
