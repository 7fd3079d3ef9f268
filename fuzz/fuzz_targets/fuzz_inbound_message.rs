//! Fuzz target: `InboundRouter::route`
//!
//! Feeds arbitrary text through the router and asserts that every
//! message is handed to exactly one handler callback and that only
//! printable fields ever reach the action callbacks.
//!
//! cargo fuzz run fuzz_inbound_message

#![no_main]

use libfuzzer_sys::fuzz_target;
use thingnode::app::handler::ThingHandler;
use thingnode::app::router::{InboundRouter, Route};
use thingnode::config::ConfigUpdate;
use thingnode::scheduler::Scheduler;

#[derive(Default)]
struct Counter {
    actions: u32,
    configs: u32,
    unknown: u32,
}

impl ThingHandler for Counter {
    fn setup(&mut self, _timers: &mut Scheduler) {}

    fn inventory_setup(&mut self) {}

    fn thing_action_received(&mut self, thing_id: &str, action: &str) {
        assert!(!thing_id.is_empty());
        assert!(thing_id.bytes().all(|b| (0x20..0x7F).contains(&b)));
        assert!(action.bytes().all(|b| (0x20..0x7F).contains(&b)));
        self.actions += 1;
    }

    fn unknown_message_received(&mut self, _msg: &str) {
        self.unknown += 1;
    }

    fn action_message_received(&mut self, thing_id: &str, action: &str, raw: &str) {
        assert!(!raw.is_empty());
        self.thing_action_received(thing_id, action);
    }

    fn configuration_received(&mut self, thing_id: &str, _update: &ConfigUpdate, _raw: &str) {
        assert!(!thing_id.is_empty());
        self.configs += 1;
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };

    let mut handler = Counter::default();
    let route = InboundRouter::new(&mut handler).route(raw);

    let counts = (handler.actions, handler.configs, handler.unknown);
    match route {
        Route::Action => assert_eq!(counts, (1, 0, 0)),
        Route::Config => assert_eq!(counts, (0, 1, 0)),
        Route::Unknown => assert_eq!(counts, (0, 0, 1)),
    }
});
