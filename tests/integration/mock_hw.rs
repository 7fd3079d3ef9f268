//! Mock board, storage and event sink for integration tests.
//!
//! Records every call so tests can assert on the full history without
//! touching real GPIO.  The framework side uses the library's own
//! `LoopbackFramework`.

use std::collections::HashMap;

use thingnode::adapters::device_id::MacAddress;
use thingnode::adapters::framework::LoopbackFramework;
use thingnode::app::events::AppEvent;
use thingnode::app::handler::ThingHandler;
use thingnode::app::ports::{
    ActuatorPort, ConfigError, ConfigPort, EventSink, PlatformPort, ResetInputPort, SensorPort,
    StorageError, StoragePort,
};
use thingnode::app::service::DeviceNode;
use thingnode::config::NodeConfig;
use thingnode::error::SensorError;
use thingnode::scheduler::Scheduler;

pub const TEST_MAC: MacAddress = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
pub const TEST_NODE_ID: &str = "AA:BB:CC:DD:EE:FF";

// ── Board call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    SetLed(bool),
    Restart { at_ms: u32 },
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub now_ms: u32,
    pub button_down: bool,
    pub sensor_present: bool,
    /// `(temperature, humidity)` returned by every bus read.
    pub reading: Result<(f32, f32), SensorError>,
    pub sensor_reads: u32,
    pub calls: Vec<BoardCall>,
    led: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            button_down: false,
            sensor_present: true,
            reading: Ok((21.5, 48.0)),
            sensor_reads: 0,
            calls: Vec::new(),
            led: false,
        }
    }

    pub fn restarts(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BoardCall::Restart { at_ms } => Some(*at_ms),
                _ => None,
            })
            .collect()
    }

    pub fn led_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BoardCall::SetLed(_)))
            .count()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockBoard {
    fn detect(&mut self, _now_ms: u32) -> Result<(), SensorError> {
        if self.sensor_present {
            Ok(())
        } else {
            Err(SensorError::Timeout)
        }
    }

    fn read_temperature(&mut self, _now_ms: u32) -> Result<f32, SensorError> {
        self.sensor_reads += 1;
        self.reading.map(|(t, _)| t)
    }

    fn read_humidity(&mut self, _now_ms: u32) -> Result<f32, SensorError> {
        self.sensor_reads += 1;
        self.reading.map(|(_, h)| h)
    }
}

impl ResetInputPort for MockBoard {
    fn is_reset_asserted(&mut self) -> bool {
        self.button_down
    }
}

impl ActuatorPort for MockBoard {
    fn set_led(&mut self, on: bool) {
        self.led = on;
        self.calls.push(BoardCall::SetLed(on));
    }

    fn is_led_on(&self) -> bool {
        self.led
    }
}

impl PlatformPort for MockBoard {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }

    fn mac_address(&self) -> MacAddress {
        TEST_MAC
    }

    fn restart(&mut self) {
        self.calls.push(BoardCall::Restart { at_ms: self.now_ms });
    }
}

// ── MockNvs ───────────────────────────────────────────────────

pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    pub erased: Vec<String>,
    /// Successful `write` calls (flash wear).
    pub writes: u32,
    /// Last config accepted by `save`.
    pub saved: Option<NodeConfig>,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            erased: Vec::new(),
            writes: 0,
            saved: None,
        }
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&[u8]> {
        self.store
            .get(&format!("{}::{}", namespace, key))
            .map(Vec::as_slice)
    }
}

impl Default for MockNvs {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        match self.get(namespace, key) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn erase_namespace(&mut self, namespace: &str) -> Result<(), StorageError> {
        let prefix = format!("{}::", namespace);
        self.store.retain(|k, _| !k.starts_with(&prefix));
        self.erased.push(namespace.to_owned());
        Ok(())
    }
}

impl ConfigPort for MockNvs {
    fn load(&self) -> Result<NodeConfig, ConfigError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, config: &NodeConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.saved = Some(config.clone());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Payloads of every `UnknownMessage` event, in order.
    pub fn unknown_messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::UnknownMessage(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Node fixture ──────────────────────────────────────────────

pub type TestNode = DeviceNode<MockBoard, LoopbackFramework, MockNvs, RecordingSink>;

/// A node built from `board` and `config`, already set up at t=0.
pub fn make_node_with(board: MockBoard, config: NodeConfig) -> (TestNode, Scheduler) {
    let mut node = DeviceNode::new(
        config,
        board,
        LoopbackFramework::new(),
        MockNvs::new(),
        RecordingSink::default(),
    );
    let mut timers = Scheduler::new();
    node.setup(&mut timers);
    (node, timers)
}

#[allow(dead_code)]
pub fn make_node() -> (TestNode, Scheduler) {
    make_node_with(MockBoard::new(), NodeConfig::default())
}

/// Advance the clock in `step_ms` increments through `(from, to]`,
/// ticking the scheduler at every step.
#[allow(dead_code)]
pub fn run(node: &mut TestNode, timers: &mut Scheduler, from: u32, to: u32, step_ms: u32) {
    let mut now = from;
    while now < to {
        now += step_ms;
        node.hw_mut().now_ms = now;
        timers.tick(now, node);
    }
}
