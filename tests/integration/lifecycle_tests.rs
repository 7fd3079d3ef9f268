//! Integration tests for node setup, registration, sensor reporting and
//! link recovery.

use super::mock_hw::{
    MockBoard, MockNvs, RecordingSink, TEST_NODE_ID, make_node, make_node_with, run,
};

use thingnode::adapters::framework::LoopbackFramework;
use thingnode::app::actions::ThingAction;
use thingnode::app::events::AppEvent;
use thingnode::app::handler::ThingHandler;
use thingnode::app::inventory::ThingData;
use thingnode::app::ports::{ActuatorPort, NODE_ID_KEY, REGISTRATION_NAMESPACE, TimerTask};
use thingnode::app::service::DeviceNode;
use thingnode::config::NodeConfig;
use thingnode::error::SensorError;
use thingnode::scheduler::Scheduler;
use thingnode::sensors::Metric;

#[test]
fn setup_registers_node_things_and_actions() {
    let (node, timers) = make_node();

    let fw = node.framework();
    assert_eq!(fw.node().map(|n| n.id.as_str()), Some(TEST_NODE_ID));
    assert!(fw.is_node_online());
    let ids: Vec<_> = fw.things().iter().map(|t| t.descriptor.id).collect();
    assert_eq!(ids, ["Temperature", "Humidity", "Led", "Button"]);
    assert!(fw.things().iter().all(|t| t.online));
    assert_eq!(fw.actions(), ThingAction::ALL);

    assert!(node.is_registered());
    assert_eq!(
        node.storage().get(REGISTRATION_NAMESPACE, NODE_ID_KEY),
        Some(TEST_NODE_ID.as_bytes())
    );
    assert_eq!(
        node.sink().count(|e| *e == AppEvent::Registered { things: 4 }),
        1
    );

    assert_eq!(timers.active_count(), 5);
    assert_eq!(timers.interval_of(TimerTask::ResetCheck), Some(100));
    assert_eq!(timers.interval_of(TimerTask::SensorPoll), Some(2_000));
}

#[test]
fn setup_turns_led_off() {
    let (node, _timers) = make_node();
    assert_eq!(node.hw().led_writes(), 1);
    assert!(!node.hw().is_led_on());
}

#[test]
fn missing_sensor_degrades_gracefully() {
    let mut board = MockBoard::new();
    board.sensor_present = false;
    let (mut node, mut timers) = make_node_with(board, NodeConfig::default());

    assert!(!node.is_sensor_available());
    assert_eq!(
        node.sink().count(|e| *e == AppEvent::Started { sensor_available: false }),
        1
    );
    assert_eq!(node.read_temperature(0), Err(SensorError::Unavailable));
    assert_eq!(node.read_humidity(0), Err(SensorError::Unavailable));

    run(&mut node, &mut timers, 0, 25_000, 100);

    assert_eq!(node.hw().sensor_reads, 0);
    assert_eq!(node.framework().published_count(), 0);
    assert!(node.sink().count(|e| matches!(e, AppEvent::NoData(_))) >= 4);
    // Everything else keeps running.
    assert!(node.is_registered());
}

#[test]
fn reported_value_matches_latest_reading() {
    let (mut node, _timers) = make_node();
    node.hw_mut().reading = Ok((19.25, 63.5));

    node.poll_sensor(2_000);
    node.report();

    let latest = node.latest();
    let fw = node.framework();
    assert_eq!(
        fw.thing("Temperature").and_then(|t| t.last_value),
        latest.temperature.map(ThingData::Float)
    );
    assert_eq!(
        fw.thing("Humidity").and_then(|t| t.last_value),
        latest.humidity.map(ThingData::Float)
    );
    assert_eq!(
        node.sink().count(|e| matches!(
            e,
            AppEvent::Reported { thing_id: "Temperature", value } if *value == 19.25
        )),
        1
    );
}

#[test]
fn failed_read_keeps_previous_value() {
    let (mut node, _timers) = make_node();
    node.poll_sensor(2_000);
    node.hw_mut().reading = Err(SensorError::ChecksumMismatch);
    node.poll_sensor(4_000);

    assert_eq!(node.latest().temperature, Some(21.5));
    assert_eq!(node.latest().humidity, Some(48.0));
    assert_eq!(
        node.sink().count(|e| matches!(
            e,
            AppEvent::ReadFailed { metric: Metric::Temperature, error: SensorError::ChecksumMismatch }
        )),
        1
    );
}

#[test]
fn scheduled_polling_and_reporting() {
    let (mut node, mut timers) = make_node();

    run(&mut node, &mut timers, 0, 10_000, 10);

    // Five polls of two metrics, one report cycle.
    assert_eq!(node.hw().sensor_reads, 10);
    assert_eq!(node.framework().published_count(), 2);
}

#[test]
fn report_before_first_read_publishes_nothing() {
    let (mut node, _timers) = make_node();
    node.report();

    assert_eq!(node.framework().published_count(), 0);
    assert_eq!(node.sink().count(|e| matches!(e, AppEvent::NoData(_))), 2);
}

#[test]
fn link_loss_and_recovery_reregisters() {
    let (mut node, mut timers) = make_node();

    node.framework_mut().set_reachable(false);
    run(&mut node, &mut timers, 0, 10_000, 100);
    assert!(!node.is_registered());
    assert_eq!(node.sink().count(|e| *e == AppEvent::LinkDown), 1);

    node.framework_mut().set_reachable(true);
    run(&mut node, &mut timers, 10_000, 20_000, 100);
    assert!(node.is_registered());
    assert_eq!(node.sink().count(|e| *e == AppEvent::LinkUp), 2);
    assert_eq!(
        node.sink().count(|e| matches!(e, AppEvent::Registered { .. })),
        2
    );
    assert_eq!(node.framework().things().len(), 4);
}

#[test]
fn node_id_is_written_once_across_reconnects() {
    let (mut node, mut timers) = make_node();
    assert_eq!(node.storage().writes, 1);

    for cycle in 0..3 {
        let start = cycle * 20_000;
        node.framework_mut().set_reachable(false);
        run(&mut node, &mut timers, start, start + 10_000, 100);
        node.framework_mut().set_reachable(true);
        run(&mut node, &mut timers, start + 10_000, start + 20_000, 100);
    }

    assert!(node.is_registered());
    assert_eq!(
        node.sink().count(|e| matches!(e, AppEvent::Registered { .. })),
        4
    );
    assert_eq!(node.storage().writes, 1);
}

#[test]
fn rejected_vocabulary_is_retried() {
    let mut fw = LoopbackFramework::new();
    fw.set_action_capacity(Some(2));
    let mut node = DeviceNode::new(
        NodeConfig::default(),
        MockBoard::new(),
        fw,
        MockNvs::new(),
        RecordingSink::default(),
    );
    let mut timers = Scheduler::new();
    node.setup(&mut timers);

    assert!(!node.is_registered());
    assert!(node.framework().actions().is_empty());

    // Still rejected at the next watchdog pass.
    run(&mut node, &mut timers, 0, 10_000, 100);
    assert!(!node.is_registered());

    node.framework_mut().set_action_capacity(None);
    run(&mut node, &mut timers, 10_000, 20_000, 100);
    assert!(node.is_registered());
    assert_eq!(node.framework().actions(), ThingAction::ALL);
    assert_eq!(
        node.sink().count(|e| matches!(e, AppEvent::Registered { .. })),
        3
    );
    // Same id every pass.
    assert_eq!(node.storage().writes, 1);
}

#[test]
fn unreachable_at_boot_registers_later() {
    let mut fw = LoopbackFramework::new();
    fw.set_reachable(false);
    let mut node = DeviceNode::new(
        NodeConfig::default(),
        MockBoard::new(),
        fw,
        MockNvs::new(),
        RecordingSink::default(),
    );
    let mut timers = Scheduler::new();
    node.setup(&mut timers);

    assert!(!node.is_registered());
    assert!(node.framework().node().is_none());

    node.framework_mut().set_reachable(true);
    run(&mut node, &mut timers, 0, 10_000, 100);
    assert!(node.is_registered());
}

#[test]
fn shutdown_marks_everything_offline() {
    let (mut node, _timers) = make_node();
    node.shutdown();

    let fw = node.framework();
    assert!(!fw.is_node_online());
    assert!(fw.things().iter().all(|t| !t.online));
    assert!(!node.is_registered());
}
