//! What the node tells the framework about itself.
//!
//! One node (identified by its MAC) carrying two sensor things, the
//! status LED actuator and the reset button, plus the closed action
//! vocabulary.

use crate::config::NodeConfig;
use crate::sensors::Metric;
use crate::sensors::dht::DhtKind;

use super::actions::ThingAction;

pub const LED_THING_ID: &str = "Led";
/// The reset button, published as 1 while pressed and 0 once released.
pub const BUTTON_THING_ID: &str = "Button";

/// Vendor string reported for the DHT things.
const DHT_VENDOR: &str = "Aosong";
/// Vendor string reported for board GPIO things.
const BOARD_VENDOR: &str = "ESP32 GPIO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Generic,
}

/// Value type a thing publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingDataType {
    Integer,
    Float,
}

/// Whether the thing is part of the board or attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingCategory {
    Builtin,
    External,
}

/// A single published value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThingData {
    Integer(i32),
    Float(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub id: heapless::String<17>,
    pub label: heapless::String<32>,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThingDescriptor {
    pub id: &'static str,
    pub type_name: &'static str,
    pub vendor: &'static str,
    pub data_type: ThingDataType,
    pub category: ThingCategory,
    /// `true` if the thing accepts actions.
    pub actuator: bool,
}

/// Everything `inventory_setup` registers.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub node: NodeDescriptor,
    pub things: [ThingDescriptor; 4],
    pub actions: &'static [ThingAction],
}

impl Inventory {
    pub fn build(node_id: &str, config: &NodeConfig) -> Self {
        let mut id = heapless::String::new();
        // The MAC string is exactly 17 characters.
        let _ = id.push_str(node_id);

        let sensor_type = match config.sensor_kind {
            DhtKind::Dht11 => "DHT11",
            DhtKind::Dht22 => "DHT22",
        };

        Self {
            node: NodeDescriptor {
                id,
                label: config.node_label.clone(),
                node_type: NodeType::Generic,
            },
            things: [
                sensor_thing(Metric::Temperature, sensor_type),
                sensor_thing(Metric::Humidity, sensor_type),
                ThingDescriptor {
                    id: LED_THING_ID,
                    type_name: "LED",
                    vendor: BOARD_VENDOR,
                    data_type: ThingDataType::Integer,
                    category: ThingCategory::Builtin,
                    actuator: true,
                },
                ThingDescriptor {
                    id: BUTTON_THING_ID,
                    type_name: "BUTTON",
                    vendor: BOARD_VENDOR,
                    data_type: ThingDataType::Integer,
                    category: ThingCategory::Builtin,
                    actuator: false,
                },
            ],
            actions: ThingAction::ALL,
        }
    }
}

fn sensor_thing(metric: Metric, type_name: &'static str) -> ThingDescriptor {
    ThingDescriptor {
        id: metric.name(),
        type_name,
        vendor: DHT_VENDOR,
        data_type: ThingDataType::Float,
        category: ThingCategory::External,
        actuator: false,
    }
}
