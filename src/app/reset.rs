//! Hold-to-reset gesture detector.
//!
//! ```text
//!            asserted                 held >= hold_ms
//!  IDLE ──────────────▶ COUNTING ─────────────────────▶ TRIGGERED
//!    ▲                     │                                │
//!    │      released       │                 reset_on_final │
//!    ├─────────────────────┘                                ▼
//!    │                   released                        LATCHED
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! `check` is the cheap periodic sample (every `reset_poll_interval_ms`).
//! It only reports a trigger; the expensive reset effect runs once from
//! `reset_on_final`, after which the detector stays latched until the
//! button is released, so one hold session can never reset twice.

/// Detector state.  `Counting` carries the hold start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    Idle,
    Counting { since_ms: u32 },
    /// Threshold reached; waiting for the final effect to run.
    Triggered,
    /// Effect done; waiting for the button to be released.
    Latched,
}

/// Outcome of one [`ResetGesture::check`] sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCheck {
    /// Nothing changed.
    Quiet,
    /// A hold started at this sample.
    Armed,
    /// The button was released before the threshold.
    Cancelled { held_ms: u32 },
    /// Hold threshold reached: run the reset effect.
    Trigger,
    /// The button was released after a completed reset.
    Released,
}

pub struct ResetGesture {
    hold_ms: u32,
    state: ResetState,
}

impl ResetGesture {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            state: ResetState::Idle,
        }
    }

    pub fn hold_ms(&self) -> u32 {
        self.hold_ms
    }

    /// Change the threshold.  A hold in progress is measured against the
    /// new value from the next sample on.
    pub fn set_hold_ms(&mut self, hold_ms: u32) {
        self.hold_ms = hold_ms;
    }

    pub fn state(&self) -> ResetState {
        self.state
    }

    /// When the current hold began, or `None` when not counting.
    pub fn reset_state_time(&self) -> Option<u32> {
        match self.state {
            ResetState::Counting { since_ms } => Some(since_ms),
            _ => None,
        }
    }

    /// Sample the button.  `now_ms` is monotonic milliseconds.
    pub fn check(&mut self, asserted: bool, now_ms: u32) -> ResetCheck {
        match self.state {
            ResetState::Idle => {
                if asserted {
                    self.state = ResetState::Counting { since_ms: now_ms };
                    ResetCheck::Armed
                } else {
                    ResetCheck::Quiet
                }
            }

            ResetState::Counting { since_ms } => {
                let held_ms = now_ms.wrapping_sub(since_ms);
                if !asserted {
                    self.state = ResetState::Idle;
                    ResetCheck::Cancelled { held_ms }
                } else if held_ms >= self.hold_ms {
                    self.state = ResetState::Triggered;
                    ResetCheck::Trigger
                } else {
                    ResetCheck::Quiet
                }
            }

            // Not re-entrant: the pending trigger is consumed by `complete`.
            ResetState::Triggered => ResetCheck::Quiet,

            ResetState::Latched => {
                if asserted {
                    ResetCheck::Quiet
                } else {
                    self.state = ResetState::Idle;
                    ResetCheck::Released
                }
            }
        }
    }

    /// Claim the pending trigger.  Returns `true` exactly once per trigger;
    /// the caller runs the reset effect only when it does.
    pub fn complete(&mut self) -> bool {
        if self.state == ResetState::Triggered {
            self.state = ResetState::Latched;
            true
        } else {
            false
        }
    }
}
