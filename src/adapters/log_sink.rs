//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing node events to the ESP-IDF logger
//! (UART / USB-CDC in production, stderr on the host).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { sensor_available } => {
                info!(
                    "START | sensor={}",
                    if *sensor_available { "OK" } else { "ABSENT" }
                );
            }
            AppEvent::Reading { metric, value } => {
                debug!("READ | {}={:.1}", metric.name(), value);
            }
            AppEvent::ReadFailed { metric, error } => {
                warn!("READ | {} failed: {}", metric.name(), error);
            }
            AppEvent::Reported { thing_id, value } => {
                info!("REPORT | {}={:.1}", thing_id, value);
            }
            AppEvent::NoData(metric) => {
                debug!("REPORT | {} no data", metric.name());
            }
            AppEvent::ActionExecuted(action) => {
                info!("ACTION | {}", action);
            }
            AppEvent::TargetMismatch => {
                debug!("ACTION | not addressed to this node");
            }
            AppEvent::UnknownMessage(msg) => {
                warn!("ACTION | unknown message: {}", msg);
            }
            AppEvent::ConfigApplied => {
                info!("CONFIG | applied");
            }
            AppEvent::ConfigRejected(e) => {
                warn!("CONFIG | rejected: {}", e);
            }
            AppEvent::ResetArmed { since_ms } => {
                info!("RESET | hold started at {}ms", since_ms);
            }
            AppEvent::ResetCancelled { held_ms } => {
                info!("RESET | released after {}ms", held_ms);
            }
            AppEvent::FactoryReset => {
                warn!("RESET | factory reset");
            }
            AppEvent::LinkUp => {
                info!("LINK | up");
            }
            AppEvent::LinkDown => {
                warn!("LINK | down");
            }
            AppEvent::Registered { things } => {
                info!("LINK | registered node + {} things", things);
            }
        }
    }
}
