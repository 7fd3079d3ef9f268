//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements            | Connects to               |
//! |-------------|-----------------------|---------------------------|
//! | `hardware`  | SensorPort            | DHT driver                |
//! |             | ResetInputPort        | Reset button GPIO         |
//! |             | ActuatorPort          | Status LED GPIO           |
//! |             | PlatformPort          | Clock, MAC, restart       |
//! | `framework` | ThingFramework        | In-process loopback       |
//! | `log_sink`  | EventSink             | Serial log output         |
//! | `nvs`       | ConfigPort            | NVS / in-memory store     |
//! |             | StoragePort           |                           |

pub mod device_id;
pub mod framework;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub(crate) mod utils;
