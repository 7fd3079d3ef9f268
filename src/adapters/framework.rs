//! In-process thing framework adapter.
//!
//! Implements [`ThingFramework`] without a backend: registrations and
//! published values are kept in memory and logged, and inbound messages
//! come from an injection queue.  The binary uses it until a transport
//! is wired in, and the integration tests drive it directly.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::app::actions::ThingAction;
use crate::app::inventory::{NodeDescriptor, ThingData, ThingDescriptor};
use crate::app::ports::ThingFramework;

/// Upper bound on queued inbound messages; older ones are dropped.
const INBOUND_CAPACITY: usize = 8;

#[derive(Debug, Clone)]
pub struct RegisteredThing {
    pub descriptor: ThingDescriptor,
    pub online: bool,
    pub last_value: Option<ThingData>,
}

pub struct LoopbackFramework {
    /// Whether a connect attempt would succeed.
    reachable: bool,
    connected: bool,
    node: Option<NodeDescriptor>,
    node_online: bool,
    things: Vec<RegisteredThing>,
    actions: &'static [ThingAction],
    /// Largest action vocabulary the backend accepts, if limited.
    action_capacity: Option<usize>,
    inbound: VecDeque<String>,
    published: u32,
}

impl Default for LoopbackFramework {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackFramework {
    pub fn new() -> Self {
        Self {
            reachable: true,
            connected: false,
            node: None,
            node_online: false,
            things: Vec::new(),
            actions: &[],
            action_capacity: None,
            inbound: VecDeque::new(),
            published: 0,
        }
    }

    /// Make the backend reachable or not.  Going unreachable drops the
    /// link immediately.
    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
        if !reachable && self.connected {
            warn!("Framework: link lost");
            self.connected = false;
        }
    }

    /// Limit the action vocabulary the backend accepts.  `None` accepts
    /// any size.
    pub fn set_action_capacity(&mut self, capacity: Option<usize>) {
        self.action_capacity = capacity;
    }

    /// Queue a raw inbound message.
    pub fn inject(&mut self, raw: &str) {
        if self.inbound.len() == INBOUND_CAPACITY {
            warn!("Framework: inbound queue full, dropping oldest");
            self.inbound.pop_front();
        }
        self.inbound.push_back(raw.to_owned());
    }

    pub fn node(&self) -> Option<&NodeDescriptor> {
        self.node.as_ref()
    }

    pub fn is_node_online(&self) -> bool {
        self.node_online
    }

    pub fn thing(&self, id: &str) -> Option<&RegisteredThing> {
        self.things.iter().find(|t| t.descriptor.id == id)
    }

    pub fn things(&self) -> &[RegisteredThing] {
        &self.things
    }

    pub fn actions(&self) -> &'static [ThingAction] {
        self.actions
    }

    /// Total accepted `publish` calls.
    pub fn published_count(&self) -> u32 {
        self.published
    }
}

impl ThingFramework for LoopbackFramework {
    fn connect(&mut self) -> bool {
        if self.reachable && !self.connected {
            info!("Framework: connected");
            self.connected = true;
        }
        self.connected
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn register_node(&mut self, node: &NodeDescriptor) -> bool {
        if !self.connected {
            return false;
        }
        let known = self.node.as_ref().is_some_and(|n| n.id == node.id);
        if !known {
            info!("Framework: node {} ({}) registered", node.id, node.label);
            self.things.clear();
        } else if self.node.as_ref() != Some(node) {
            info!("Framework: node {} updated ({})", node.id, node.label);
        } else {
            debug!("Framework: node {} already registered", node.id);
        }
        self.node = Some(node.clone());
        true
    }

    fn register_thing(&mut self, thing: &ThingDescriptor) -> bool {
        if !self.connected || self.node.is_none() {
            return false;
        }
        if self.thing(thing.id).is_none() {
            info!(
                "Framework: thing {} ({} / {}) registered",
                thing.id, thing.type_name, thing.vendor
            );
            self.things.push(RegisteredThing {
                descriptor: thing.clone(),
                online: false,
                last_value: None,
            });
        }
        true
    }

    fn register_actions(&mut self, actions: &'static [ThingAction]) -> bool {
        if !self.connected || self.node.is_none() {
            return false;
        }
        if self.action_capacity.is_some_and(|cap| actions.len() > cap) {
            warn!("Framework: {} actions exceed backend capacity", actions.len());
            return false;
        }
        if self.actions != actions {
            info!("Framework: {} actions registered", actions.len());
            self.actions = actions;
        }
        true
    }

    fn set_thing_connected(&mut self, thing_id: &str, online: bool, reason: &str) {
        match self.things.iter_mut().find(|t| t.descriptor.id == thing_id) {
            Some(t) => {
                t.online = online;
                debug!("Framework: {} online={} ({})", thing_id, online, reason);
            }
            None => warn!("Framework: set_thing_connected on unknown thing {}", thing_id),
        }
    }

    fn set_node_connected(&mut self, online: bool, reason: &str) {
        self.node_online = online;
        info!("Framework: node online={} ({})", online, reason);
    }

    fn publish(&mut self, thing_id: &str, data: ThingData) -> bool {
        if !self.connected {
            return false;
        }
        match self.things.iter_mut().find(|t| t.descriptor.id == thing_id) {
            Some(t) if t.online => {
                t.last_value = Some(data);
                self.published += 1;
                info!("Framework: {} <- {:?}", thing_id, data);
                true
            }
            _ => false,
        }
    }

    fn poll_inbound(&mut self) -> Option<String> {
        self.inbound.pop_front()
    }
}
