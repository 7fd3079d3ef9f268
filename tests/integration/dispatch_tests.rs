//! Integration tests for the action dispatcher and inbound routing.
//!
//! A message travels framework queue → router → `thing_action_received`
//! → local effect, all against the mock board.  Unknown messages are
//! checked through the `UnknownMessage` event payload.

use super::mock_hw::{BoardCall, TEST_NODE_ID, make_node, run};

use thingnode::app::actions::{ActionMessage, ThingAction};
use thingnode::app::events::AppEvent;
use thingnode::app::handler::ThingHandler;
use thingnode::app::inventory::ThingData;
use thingnode::app::ports::{ActuatorPort, CONFIG_NAMESPACE, REGISTRATION_NAMESPACE};

#[test]
fn unsupported_action_reports_unknown_message() {
    let (mut node, _timers) = make_node();
    let led_writes = node.hw().led_writes();

    node.thing_action_received(TEST_NODE_ID, "unsupported_cmd");

    assert_eq!(node.unknown_message_count(), 1);
    assert_eq!(
        node.sink().count(|e| matches!(e, AppEvent::UnknownMessage(_))),
        1
    );
    assert_eq!(node.hw().led_writes(), led_writes, "no actuator effect");
    assert!(node.hw().restarts().is_empty());
}

#[test]
fn queued_unknown_action_keeps_original_text() {
    let (mut node, mut timers) = make_node();
    let raw = r#"{ "thingId": "AA:BB:CC:DD:EE:FF", "action": "unsupported_cmd", "ts": 17 }"#;
    node.framework_mut().inject(raw);

    run(&mut node, &mut timers, 0, 50, 10);

    assert_eq!(node.sink().unknown_messages(), [raw]);
    assert_eq!(node.unknown_message_count(), 1);
}

#[test]
fn unparsable_message_keeps_original_text() {
    let (mut node, mut timers) = make_node();
    let raw = r#"{"thingId": "AA:BB:CC:DD:EE:FF", "action": "#;
    node.framework_mut().inject(raw);

    run(&mut node, &mut timers, 0, 50, 10);

    assert_eq!(node.sink().unknown_messages(), [raw]);
}

#[test]
fn direct_unknown_action_is_reported_as_action_message() {
    let (mut node, _timers) = make_node();
    node.thing_action_received(TEST_NODE_ID, "unsupported_cmd");

    let expected = ActionMessage::new(TEST_NODE_ID, "unsupported_cmd").to_json();
    assert_eq!(
        expected,
        r#"{"thingId":"AA:BB:CC:DD:EE:FF","action":"unsupported_cmd"}"#
    );
    assert_eq!(node.sink().unknown_messages(), [expected.as_str()]);
}

#[test]
fn mismatched_target_never_executes() {
    let (mut node, _timers) = make_node();
    let before = node.hw().calls.len();

    for action in ThingAction::ALL {
        node.thing_action_received("11:22:33:44:55:66", action.name());
    }

    assert_eq!(node.hw().calls.len(), before);
    assert_eq!(node.unknown_message_count(), 0);
    assert_eq!(
        node.sink().count(|e| *e == AppEvent::TargetMismatch),
        ThingAction::ALL.len()
    );
    assert!(node.storage().erased.is_empty());
}

#[test]
fn led_actions_drive_led_and_publish_state() {
    let (mut node, _timers) = make_node();

    node.thing_action_received(TEST_NODE_ID, "led_on");
    assert!(node.hw().is_led_on());
    assert_eq!(
        node.framework().thing("Led").and_then(|t| t.last_value),
        Some(ThingData::Integer(1))
    );

    node.thing_action_received(TEST_NODE_ID, " LED_OFF ");
    assert!(!node.hw().is_led_on());
    assert_eq!(
        node.framework().thing("Led").and_then(|t| t.last_value),
        Some(ThingData::Integer(0))
    );
    assert_eq!(node.hw().calls.last(), Some(&BoardCall::SetLed(false)));
}

#[test]
fn read_action_polls_and_publishes_immediately() {
    let (mut node, _timers) = make_node();
    node.hw_mut().reading = Ok((23.0, 51.0));

    node.thing_action_received(TEST_NODE_ID, "read");

    assert_eq!(node.latest().temperature, Some(23.0));
    assert_eq!(
        node.framework().thing("Temperature").and_then(|t| t.last_value),
        Some(ThingData::Float(23.0))
    );
    assert_eq!(
        node.framework().thing("Humidity").and_then(|t| t.last_value),
        Some(ThingData::Float(51.0))
    );
}

#[test]
fn reboot_goes_offline_then_restarts_without_erasing() {
    let (mut node, _timers) = make_node();
    node.thing_action_received(TEST_NODE_ID, "reboot");

    assert_eq!(node.hw().restarts().len(), 1);
    assert!(node.storage().erased.is_empty());
    let fw = node.framework();
    assert!(!fw.is_node_online());
    assert!(fw.things().iter().all(|t| !t.online));
    assert!(!node.is_registered());
}

#[test]
fn reset_action_erases_config_and_registration() {
    let (mut node, _timers) = make_node();
    assert!(node.storage().get(REGISTRATION_NAMESPACE, "node_id").is_some());

    node.thing_action_received(TEST_NODE_ID, "reset");

    assert_eq!(node.storage().erased, [CONFIG_NAMESPACE, REGISTRATION_NAMESPACE]);
    assert!(node.storage().get(REGISTRATION_NAMESPACE, "node_id").is_none());
    assert_eq!(node.hw().restarts().len(), 1);
    assert!(!node.framework().is_node_online());
    assert_eq!(
        node.sink().count(|e| *e == AppEvent::ActionExecuted(ThingAction::FactoryReset)),
        1
    );
}

#[test]
fn inbound_queue_is_routed_by_scheduler() {
    let (mut node, mut timers) = make_node();
    node.framework_mut()
        .inject(r#"{"thingId":"AA:BB:CC:DD:EE:FF","action":"led_on"}"#);
    node.framework_mut().inject("garbage");
    let dance = r#"{"thingId":"AA:BB:CC:DD:EE:FF","action":"dance"}"#;
    node.framework_mut().inject(dance);

    run(&mut node, &mut timers, 0, 100, 10);

    assert!(node.hw().is_led_on());
    assert_eq!(node.unknown_message_count(), 2);
    assert_eq!(node.sink().unknown_messages(), ["garbage", dance]);
}

#[test]
fn inbound_burst_is_spread_over_polls() {
    let (mut node, mut timers) = make_node();
    for _ in 0..6 {
        node.framework_mut().inject("noise");
    }

    run(&mut node, &mut timers, 0, 50, 10);
    assert_eq!(node.unknown_message_count(), 4);

    run(&mut node, &mut timers, 50, 100, 10);
    assert_eq!(node.unknown_message_count(), 6);
}
