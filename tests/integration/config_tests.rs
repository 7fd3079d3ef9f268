//! Integration tests for configuration pushed through the inbound queue.

use super::mock_hw::{TEST_NODE_ID, make_node, run};

use thingnode::app::events::AppEvent;
use thingnode::app::ports::{ConfigError, TimerTask};
use thingnode::config::{ConfigUpdate, NodeConfig};

fn config_message(thing_id: &str, config: &str) -> String {
    format!(r#"{{"thingId":"{thing_id}","config":{config}}}"#)
}

#[test]
fn accepted_config_is_stored_and_rescheduled() {
    let (mut node, mut timers) = make_node();
    node.framework_mut().inject(&config_message(
        TEST_NODE_ID,
        r#"{"reportIntervalMs":5000,"sensorReadIntervalMs":4000}"#,
    ));

    run(&mut node, &mut timers, 0, 50, 10);

    assert_eq!(node.config().report_interval_ms, 5_000);
    assert_eq!(node.config().sensor_read_interval_ms, 4_000);
    assert_eq!(node.storage().saved.as_ref(), Some(node.config()));
    assert_eq!(node.sink().count(|e| *e == AppEvent::ConfigApplied), 1);

    assert_eq!(timers.interval_of(TimerTask::Report), Some(5_000));
    assert_eq!(timers.interval_of(TimerTask::SensorPoll), Some(4_000));
    assert_eq!(timers.interval_of(TimerTask::ResetCheck), Some(100));
    assert_eq!(timers.active_count(), 5);

    // Polls at 4_050 and 8_050, reports at 5_050 and 10_050.
    run(&mut node, &mut timers, 50, 10_100, 10);
    assert_eq!(node.hw().sensor_reads, 4);
    assert_eq!(node.framework().published_count(), 4);
}

#[test]
fn rejected_config_changes_nothing() {
    let (mut node, mut timers) = make_node();
    // Each value is in range, but the poll must be shorter than the hold.
    node.framework_mut().inject(&config_message(
        TEST_NODE_ID,
        r#"{"resetPollIntervalMs":1000,"resetHoldMs":1000}"#,
    ));

    run(&mut node, &mut timers, 0, 100, 10);

    assert_eq!(*node.config(), NodeConfig::default());
    assert!(node.storage().saved.is_none());
    assert_eq!(
        node.sink()
            .count(|e| matches!(e, AppEvent::ConfigRejected(ConfigError::ValidationFailed(_)))),
        1
    );
    assert_eq!(node.sink().count(|e| *e == AppEvent::ConfigApplied), 0);
    assert_eq!(timers.interval_of(TimerTask::ResetCheck), Some(100));
    assert_eq!(timers.interval_of(TimerTask::Report), Some(10_000));

    // The old hold still applies.
    node.hw_mut().button_down = true;
    run(&mut node, &mut timers, 100, 2_000, 10);
    assert!(node.hw().restarts().is_empty());
}

#[test]
fn shorter_hold_takes_effect() {
    let (mut node, mut timers) = make_node();
    node.framework_mut()
        .inject(&config_message(TEST_NODE_ID, r#"{"resetHoldMs":1500}"#));
    run(&mut node, &mut timers, 0, 50, 10);
    assert_eq!(node.config().reset_hold_ms, 1_500);

    node.hw_mut().button_down = true;
    run(&mut node, &mut timers, 50, 2_000, 10);
    // Armed at 100.
    assert_eq!(node.hw().restarts(), vec![1_600]);
}

#[test]
fn config_for_another_node_is_ignored() {
    let (mut node, mut timers) = make_node();
    node.framework_mut().inject(&config_message(
        "11:22:33:44:55:66",
        r#"{"reportIntervalMs":5000}"#,
    ));

    run(&mut node, &mut timers, 0, 50, 10);

    assert_eq!(*node.config(), NodeConfig::default());
    assert_eq!(node.sink().count(|e| *e == AppEvent::TargetMismatch), 1);
    assert_eq!(timers.interval_of(TimerTask::Report), Some(10_000));
}

#[test]
fn unknown_config_field_is_an_unknown_message() {
    let (mut node, mut timers) = make_node();
    let raw = config_message(TEST_NODE_ID, r#"{"sensorKind":"Dht22"}"#);
    node.framework_mut().inject(&raw);

    run(&mut node, &mut timers, 0, 50, 10);

    assert_eq!(node.sink().unknown_messages(), [raw.as_str()]);
    assert_eq!(*node.config(), NodeConfig::default());
}

#[test]
fn label_change_reregisters_node() {
    let (mut node, mut timers) = make_node();
    let update = ConfigUpdate {
        node_label: "Greenhouse".try_into().ok(),
        ..Default::default()
    };
    assert!(node.apply_config(&update).is_ok());
    assert!(!node.is_registered());

    run(&mut node, &mut timers, 0, 10_000, 100);

    assert!(node.is_registered());
    assert_eq!(
        node.framework().node().map(|n| n.label.as_str()),
        Some("Greenhouse")
    );
}
