//! Remote actions the node understands.
//!
//! The vocabulary is closed and fixed at build time.  Anything else that
//! arrives is routed to `unknown_message_received`.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Actions a remote operator can send to this thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingAction {
    /// Erase stored settings and restart (same as the reset gesture).
    FactoryReset,
    /// Restart without erasing anything.
    Reboot,
    /// Switch the status LED on.
    LedOn,
    /// Switch the status LED off.
    LedOff,
    /// Poll the sensor now and publish the result.
    ReadNow,
}

impl ThingAction {
    /// The full vocabulary, in registration order.
    pub const ALL: &'static [ThingAction] = &[
        Self::FactoryReset,
        Self::Reboot,
        Self::LedOn,
        Self::LedOff,
        Self::ReadNow,
    ];

    /// Wire name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FactoryReset => "reset",
            Self::Reboot => "reboot",
            Self::LedOn => "led_on",
            Self::LedOff => "led_off",
            Self::ReadNow => "read",
        }
    }
}

impl fmt::Display for ThingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The action text did not name a known action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAction;

impl FromStr for ThingAction {
    type Err = UnknownAction;

    /// Exact match after trimming, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownAction)
    }
}

/// A command addressed to one thing.  Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMessage {
    pub thing_id: String,
    pub action: String,
}

impl ActionMessage {
    pub fn new(thing_id: &str, action: &str) -> Self {
        Self {
            thing_id: thing_id.to_owned(),
            action: action.to_owned(),
        }
    }

    /// JSON form, as the framework would deliver it.
    pub fn to_json(&self) -> String {
        // Two plain string fields cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
