//! Device node service, the hexagonal core.
//!
//! [`DeviceNode`] owns the sensor poller, the reset gesture detector and
//! the cached device identity, plus one adapter per port.  It implements
//! [`ThingHandler`] for the framework and [`SchedulerDelegate`] for the
//! timer engine, so every entry point into the node is a plain method
//! call on one execution context.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//! ResetInputPort ▶│       DeviceNode        │ ◀─▶ ThingFramework
//! ActuatorPort ◀──│ Poller · Reset · Router │ ──▶ StoragePort + ConfigPort
//!                 └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::adapters::device_id::{self, NodeIdString};
use crate::config::{ConfigUpdate, NodeConfig};
use crate::error::SensorError;
use crate::scheduler::Scheduler;
use crate::sensors::{Metric, SensorPoller, SensorReading};

use super::actions::{ActionMessage, ThingAction};
use super::events::AppEvent;
use super::handler::ThingHandler;
use super::inventory::{BUTTON_THING_ID, Inventory, LED_THING_ID, ThingData};
use super::ports::{
    ActuatorPort, CONFIG_NAMESPACE, ConfigError, ConfigPort, EventSink, NODE_ID_KEY,
    PlatformPort, REGISTRATION_NAMESPACE, ResetInputPort, SchedulerDelegate, SensorPort,
    StoragePort, ThingFramework, TimerTask,
};
use super::reset::{ResetCheck, ResetGesture, ResetState};
use super::router::InboundRouter;

/// How often the inbound queue is drained.
pub const INBOUND_POLL_MS: u32 = 50;
/// Messages handled per inbound drain, so one burst cannot starve the
/// reset check.
const INBOUND_BURST: usize = 4;

const REASON_STARTED: &str = "Application Started";
const REASON_DESTROYED: &str = "Application Destroyed";

// ───────────────────────────────────────────────────────────────
// DeviceNode
// ───────────────────────────────────────────────────────────────

pub struct DeviceNode<H, F, S, E> {
    hw: H,
    framework: F,
    storage: S,
    sink: E,
    config: NodeConfig,
    /// Read lazily on first need, then immutable.
    node_id: Option<NodeIdString>,
    poller: SensorPoller,
    reset: ResetGesture,
    link_up: bool,
    registered: bool,
    unknown_messages: u32,
    /// Set when an applied config changed task intervals.
    reschedule: bool,
}

impl<H, F, S, E> DeviceNode<H, F, S, E>
where
    H: SensorPort + ResetInputPort + ActuatorPort + PlatformPort,
    F: ThingFramework,
    S: StoragePort + ConfigPort,
    E: EventSink,
{
    pub fn new(config: NodeConfig, hw: H, framework: F, storage: S, sink: E) -> Self {
        let reset = ResetGesture::new(config.reset_hold_ms);
        Self {
            hw,
            framework,
            storage,
            sink,
            config,
            node_id: None,
            poller: SensorPoller::new(),
            reset,
            link_up: false,
            registered: false,
            unknown_messages: 0,
            reschedule: false,
        }
    }

    // ── Identity ──────────────────────────────────────────────

    /// The node id (`AA:BB:CC:DD:EE:FF`), read from the platform once.
    pub fn get_mac_address(&mut self) -> &str {
        if self.node_id.is_none() {
            let id = device_id::mac_string(&self.hw.mac_address());
            info!("Node id {}", id);
            self.node_id = Some(id);
        }
        self.node_id.as_deref().unwrap_or_default()
    }

    // ── Sensor poller ─────────────────────────────────────────

    pub fn read_temperature(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        let result = self.poller.read_temperature(&mut self.hw, now_ms);
        self.note_read(Metric::Temperature, result);
        result
    }

    pub fn read_humidity(&mut self, now_ms: u32) -> Result<f32, SensorError> {
        let result = self.poller.read_humidity(&mut self.hw, now_ms);
        self.note_read(Metric::Humidity, result);
        result
    }

    /// One poll of both metrics.  Failures are already logged.
    pub fn poll_sensor(&mut self, now_ms: u32) {
        let _ = self.read_temperature(now_ms);
        let _ = self.read_humidity(now_ms);
    }

    fn note_read(&mut self, metric: Metric, result: Result<f32, SensorError>) {
        match result {
            Ok(value) => self.sink.emit(&AppEvent::Reading { metric, value }),
            // Reported once at setup, not on every poll.
            Err(SensorError::Unavailable) => {}
            Err(error) => self.sink.emit(&AppEvent::ReadFailed { metric, error }),
        }
    }

    /// Publish the latest value of every metric that has one.
    pub fn report(&mut self) {
        let latest = self.poller.latest();
        for metric in [Metric::Temperature, Metric::Humidity] {
            let Some(value) = latest.get(metric) else {
                self.sink.emit(&AppEvent::NoData(metric));
                continue;
            };
            let thing_id = metric.name();
            if self.framework.publish(thing_id, ThingData::Float(value)) {
                self.sink.emit(&AppEvent::Reported { thing_id, value });
            } else {
                debug!("{} not accepted by framework", thing_id);
            }
        }
    }

    // ── Reset gesture ─────────────────────────────────────────

    /// Periodic reset sample.  Returns `true` when the hold threshold
    /// was reached and [`reset_on_final`](Self::reset_on_final) must run.
    ///
    /// Press and release edges are published on the `Button` thing.
    pub fn reset_on(&mut self, now_ms: u32) -> bool {
        let asserted = self.hw.is_reset_asserted();
        match self.reset.check(asserted, now_ms) {
            ResetCheck::Quiet => false,
            ResetCheck::Armed => {
                self.sink.emit(&AppEvent::ResetArmed { since_ms: now_ms });
                self.publish_button(true);
                false
            }
            ResetCheck::Cancelled { held_ms } => {
                self.sink.emit(&AppEvent::ResetCancelled { held_ms });
                self.publish_button(false);
                false
            }
            ResetCheck::Released => {
                self.publish_button(false);
                false
            }
            ResetCheck::Trigger => true,
        }
    }

    fn publish_button(&mut self, pressed: bool) {
        let level = ThingData::Integer(i32::from(pressed));
        if !self.framework.publish(BUTTON_THING_ID, level) {
            debug!("Button state not accepted by framework");
        }
    }

    /// Run the factory reset for a pending trigger.  Does nothing if no
    /// trigger is pending, so a second call is harmless.
    pub fn reset_on_final(&mut self) {
        if self.reset.complete() {
            self.factory_reset();
        }
    }

    /// Erase stored configuration and registration, then restart.
    fn factory_reset(&mut self) {
        self.sink.emit(&AppEvent::FactoryReset);
        self.shutdown();
        for ns in [CONFIG_NAMESPACE, REGISTRATION_NAMESPACE] {
            if let Err(e) = self.storage.erase_namespace(ns) {
                warn!("Factory reset: erase '{}' failed: {}", ns, e);
            }
        }
        self.hw.restart();
    }

    // ── Framework link ────────────────────────────────────────

    /// Reconnect if needed and (re-)register after every new connection.
    pub fn link_watchdog(&mut self) {
        let up = self.framework.is_connected() || self.framework.connect();

        if up && !self.link_up {
            self.sink.emit(&AppEvent::LinkUp);
        } else if !up && self.link_up {
            self.sink.emit(&AppEvent::LinkDown);
            self.registered = false;
        }
        self.link_up = up;

        if up && !self.registered {
            self.inventory_setup();
        } else if !up {
            debug!("Framework unreachable, retrying in {}ms", self.config.reconnect_interval_ms);
        }
    }

    /// Store the registered node id, skipping the flash write when the
    /// stored copy already matches.
    fn persist_node_id(&mut self, id: &str) {
        let mut buf = [0u8; 32];
        if let Ok(len) = self.storage.read(REGISTRATION_NAMESPACE, NODE_ID_KEY, &mut buf) {
            if &buf[..len] == id.as_bytes() {
                return;
            }
        }
        if let Err(e) = self
            .storage
            .write(REGISTRATION_NAMESPACE, NODE_ID_KEY, id.as_bytes())
        {
            warn!("Could not persist registration: {}", e);
        }
    }

    /// Route queued inbound messages.
    pub fn service_inbound(&mut self) {
        for _ in 0..INBOUND_BURST {
            let Some(raw) = self.framework.poll_inbound() else {
                break;
            };
            InboundRouter::new(self).route(&raw);
        }
    }

    /// Mark everything offline.  Runs before every restart the node
    /// initiates (reboot action, factory reset).
    pub fn shutdown(&mut self) {
        if self.registered {
            let id = self.get_mac_address().to_owned();
            let inventory = Inventory::build(&id, &self.config);
            for thing in &inventory.things {
                self.framework
                    .set_thing_connected(thing.id, false, REASON_DESTROYED);
            }
            self.framework.set_node_connected(false, REASON_DESTROYED);
        }
        self.registered = false;
        info!("Node shut down");
    }

    // ── Actions ───────────────────────────────────────────────

    fn execute(&mut self, action: ThingAction) {
        self.sink.emit(&AppEvent::ActionExecuted(action));
        match action {
            ThingAction::FactoryReset => self.factory_reset(),
            ThingAction::Reboot => {
                self.shutdown();
                self.hw.restart();
            }
            ThingAction::LedOn => self.drive_led(true),
            ThingAction::LedOff => self.drive_led(false),
            ThingAction::ReadNow => {
                let now = self.hw.now_ms();
                self.poll_sensor(now);
                self.report();
            }
        }
    }

    fn drive_led(&mut self, on: bool) {
        self.hw.set_led(on);
        let level = ThingData::Integer(i32::from(self.hw.is_led_on()));
        if !self.framework.publish(LED_THING_ID, level) {
            debug!("LED state not accepted by framework");
        }
    }

    /// Parse and run an action addressed to this node.  `raw` is the text
    /// the message arrived as, if it came through the inbound queue.
    fn dispatch_action(&mut self, thing_id: &str, action: &str, raw: Option<&str>) {
        if self.get_mac_address() != thing_id {
            debug!("Action '{}' for {} ignored", action, thing_id);
            self.sink.emit(&AppEvent::TargetMismatch);
            return;
        }

        match action.parse::<ThingAction>() {
            Ok(a) => self.execute(a),
            Err(_) => match raw {
                Some(raw) => self.unknown_message_received(raw),
                None => {
                    let msg = ActionMessage::new(thing_id, action).to_json();
                    self.unknown_message_received(&msg);
                }
            },
        }
    }

    // ── Configuration ─────────────────────────────────────────

    /// Merge `update` into the running config, persist it and put it in
    /// effect.  A rejected update changes nothing.
    pub fn apply_config(&mut self, update: &ConfigUpdate) -> Result<(), ConfigError> {
        let merged = update.apply_to(&self.config);
        if let Err(e) = self.storage.save(&merged) {
            warn!("Config update rejected: {}", e);
            self.sink.emit(&AppEvent::ConfigRejected(e));
            return Err(e);
        }

        if self.reset.hold_ms() != merged.reset_hold_ms {
            self.reset.set_hold_ms(merged.reset_hold_ms);
        }
        if merged.node_label != self.config.node_label {
            // The label is part of the node registration.
            self.registered = false;
        }
        self.config = merged;
        self.reschedule = true;
        info!("Config applied");
        self.sink.emit(&AppEvent::ConfigApplied);
        Ok(())
    }

    /// Bring every recurring task in line with the current config.  Tasks
    /// whose interval did not change keep their phase.
    fn schedule_tasks(&self, timers: &mut Scheduler, now_ms: u32) {
        let cfg = &self.config;
        let tasks = [
            (TimerTask::SensorPoll, cfg.effective_read_interval_ms()),
            (TimerTask::ResetCheck, cfg.reset_poll_interval_ms),
            (TimerTask::Report, cfg.report_interval_ms),
            (TimerTask::LinkWatchdog, cfg.reconnect_interval_ms),
            (TimerTask::Inbound, INBOUND_POLL_MS),
        ];
        for (task, interval_ms) in tasks {
            if timers.interval_of(task) == Some(interval_ms) {
                continue;
            }
            if timers.add(task, interval_ms, now_ms).is_none() {
                warn!("Could not schedule {:?}", task);
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn latest(&self) -> SensorReading {
        self.poller.latest()
    }

    pub fn is_sensor_available(&self) -> bool {
        self.poller.is_available()
    }

    pub fn reset_state(&self) -> ResetState {
        self.reset.state()
    }

    /// Start of the current reset hold, `None` when not counting.
    pub fn reset_state_time(&self) -> Option<u32> {
        self.reset.reset_state_time()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Messages that ended up in `unknown_message_received`.
    pub fn unknown_message_count(&self) -> u32 {
        self.unknown_messages
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn framework(&self) -> &F {
        &self.framework
    }

    pub fn framework_mut(&mut self) -> &mut F {
        &mut self.framework
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }
}

// ───────────────────────────────────────────────────────────────
// Framework callbacks
// ───────────────────────────────────────────────────────────────

impl<H, F, S, E> ThingHandler for DeviceNode<H, F, S, E>
where
    H: SensorPort + ResetInputPort + ActuatorPort + PlatformPort,
    F: ThingFramework,
    S: StoragePort + ConfigPort,
    E: EventSink,
{
    fn setup(&mut self, timers: &mut Scheduler) {
        let now = self.hw.now_ms();
        let sensor_available = self.poller.init(&mut self.hw, now);
        self.hw.set_led(false);
        self.schedule_tasks(timers, now);

        info!(
            "Node '{}' set up (sensor {:?}, hold {}ms)",
            self.config.node_label, self.config.sensor_kind, self.config.reset_hold_ms
        );
        self.sink.emit(&AppEvent::Started { sensor_available });

        self.link_watchdog();
    }

    fn inventory_setup(&mut self) {
        let id = self.get_mac_address().to_owned();
        let inventory = Inventory::build(&id, &self.config);

        if !self.framework.register_node(&inventory.node) {
            warn!("Node {} registration rejected", id);
            return;
        }
        self.persist_node_id(&id);

        let mut registered = 0u8;
        for thing in &inventory.things {
            if self.framework.register_thing(thing) {
                self.framework.set_thing_connected(thing.id, true, REASON_STARTED);
                registered += 1;
            } else {
                warn!("Thing {} registration rejected", thing.id);
            }
        }
        let actions_ok = self.framework.register_actions(inventory.actions);
        if !actions_ok {
            warn!("Action vocabulary rejected");
        }
        self.framework.set_node_connected(true, REASON_STARTED);

        self.registered = usize::from(registered) == inventory.things.len() && actions_ok;
        self.sink.emit(&AppEvent::Registered { things: registered });
    }

    fn thing_action_received(&mut self, thing_id: &str, action: &str) {
        self.dispatch_action(thing_id, action, None);
    }

    fn unknown_message_received(&mut self, msg: &str) {
        self.unknown_messages = self.unknown_messages.wrapping_add(1);
        warn!("Unknown message: {}", msg);
        self.sink.emit(&AppEvent::UnknownMessage(msg.to_owned()));
    }

    fn action_message_received(&mut self, thing_id: &str, action: &str, raw: &str) {
        self.dispatch_action(thing_id, action, Some(raw));
    }

    fn configuration_received(&mut self, thing_id: &str, update: &ConfigUpdate, _raw: &str) {
        if self.get_mac_address() != thing_id {
            debug!("Config for {} ignored", thing_id);
            self.sink.emit(&AppEvent::TargetMismatch);
            return;
        }
        // Already logged and emitted.
        let _ = self.apply_config(update);
    }
}

// ───────────────────────────────────────────────────────────────
// Timer callbacks
// ───────────────────────────────────────────────────────────────

impl<H, F, S, E> SchedulerDelegate for DeviceNode<H, F, S, E>
where
    H: SensorPort + ResetInputPort + ActuatorPort + PlatformPort,
    F: ThingFramework,
    S: StoragePort + ConfigPort,
    E: EventSink,
{
    fn on_task_due(&mut self, task: TimerTask, now_ms: u32, timers: &mut Scheduler) {
        match task {
            TimerTask::SensorPoll => self.poll_sensor(now_ms),
            TimerTask::ResetCheck => {
                if self.reset_on(now_ms) {
                    self.reset_on_final();
                }
            }
            TimerTask::Report => self.report(),
            TimerTask::LinkWatchdog => self.link_watchdog(),
            TimerTask::Inbound => {
                self.service_inbound();
                if core::mem::take(&mut self.reschedule) {
                    self.schedule_tasks(timers, now_ms);
                }
            }
        }
    }
}
