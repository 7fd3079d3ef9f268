//! Inbound message router.
//!
//! Raw framework messages are JSON objects addressed by `thingId` and
//! carrying either an `action` string or a `config` object:
//!
//! ```text
//! {"thingId": "AA:BB:CC:DD:EE:FF", "action": "led_on"}
//! {"thingId": "AA:BB:CC:DD:EE:FF", "config": {"reportIntervalMs": 5000}}
//! ```
//!
//! Anything that parses with printable fields goes to the matching
//! handler callback together with the raw text; everything else goes to
//! `unknown_message_received` verbatim.

use log::debug;
use serde::Deserialize;

use crate::adapters::utils::is_printable_ascii;
use crate::config::ConfigUpdate;

use super::handler::ThingHandler;

/// Where a message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Action,
    Config,
    Unknown,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    thing_id: String,
    action: Option<String>,
    config: Option<ConfigUpdate>,
}

enum Inbound {
    Action { thing_id: String, action: String },
    Config { thing_id: String, update: ConfigUpdate },
}

pub struct InboundRouter<'a> {
    handler: &'a mut dyn ThingHandler,
}

impl<'a> InboundRouter<'a> {
    pub fn new(handler: &'a mut dyn ThingHandler) -> Self {
        Self { handler }
    }

    pub fn route(&mut self, raw: &str) -> Route {
        match parse(raw) {
            Some(Inbound::Action { thing_id, action }) => {
                self.handler.action_message_received(&thing_id, &action, raw);
                Route::Action
            }
            Some(Inbound::Config { thing_id, update }) => {
                self.handler.configuration_received(&thing_id, &update, raw);
                Route::Config
            }
            None => {
                self.handler.unknown_message_received(raw);
                Route::Unknown
            }
        }
    }
}

fn parse(raw: &str) -> Option<Inbound> {
    let env: Envelope = match serde_json::from_str(raw) {
        Ok(m) => m,
        Err(e) => {
            debug!("Router: not a thing message ({})", e);
            return None;
        }
    };
    if env.thing_id.is_empty() || !is_printable_ascii(&env.thing_id) {
        debug!("Router: rejected thing id");
        return None;
    }
    match (env.action, env.config) {
        (Some(action), None) if is_printable_ascii(&action) => Some(Inbound::Action {
            thing_id: env.thing_id,
            action,
        }),
        (None, Some(update)) => Some(Inbound::Config {
            thing_id: env.thing_id,
            update,
        }),
        _ => {
            debug!("Router: need exactly one printable action or config");
            None
        }
    }
}
