//! The callback surface the thing framework drives.

use crate::config::ConfigUpdate;
use crate::scheduler::Scheduler;

/// Lifecycle and message callbacks of a device adapter.
///
/// `setup` runs once at boot.  `inventory_setup` runs every time the
/// framework link (re)connects.  The message callbacks are invoked by the
/// [`InboundRouter`](super::router::InboundRouter).
pub trait ThingHandler {
    /// Wire inputs and register the recurring tasks.  Must not block on
    /// an absent sensor.
    fn setup(&mut self, timers: &mut Scheduler);

    /// Register the node, its things and the action vocabulary.
    fn inventory_setup(&mut self);

    /// A command addressed to `thing_id`.
    fn thing_action_received(&mut self, thing_id: &str, action: &str);

    /// Anything that could not be routed.  `msg` is the original text.
    fn unknown_message_received(&mut self, msg: &str);

    /// A routed action message together with the text it arrived as.
    /// Handlers that report unknown actions should pass `raw` on.
    fn action_message_received(&mut self, thing_id: &str, action: &str, _raw: &str) {
        self.thing_action_received(thing_id, action);
    }

    /// Configuration pushed for `thing_id`.  Handlers without remote
    /// configuration treat it as unknown.
    fn configuration_received(&mut self, _thing_id: &str, _update: &ConfigUpdate, raw: &str) {
        self.unknown_message_received(raw);
    }
}
