//! Cooperative timer engine.
//!
//! The node registers its recurring jobs here during `setup`; the main
//! loop calls [`Scheduler::tick`] with the current millisecond clock and
//! the scheduler notifies a [`SchedulerDelegate`] for every task that is
//! due.  Everything runs on the caller's thread.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │   main loop ── tick(now_ms) ──▶ Scheduler                 │
//! │                                   │                       │
//! │      ┌──────────┬──────────┬──────┴─────┬──────────┐      │
//! │      ▼          ▼          ▼            ▼          ▼      │
//! │  SensorPoll ResetCheck  Report   LinkWatchdog  Inbound    │
//! │      └──────────┴──────────┴─────┬──────┴──────────┘      │
//! │                                  ▼                        │
//! │                SchedulerDelegate::on_task_due             │
//! │                        (DeviceNode)                       │
//! └──────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::{SchedulerDelegate, TimerTask};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════
//  Schedule types
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent tasks (stack-allocated).
pub const MAX_TASKS: usize = 6;

/// Internal bookkeeping for a live periodic task.
#[derive(Debug, Clone, Copy)]
struct TaskEntry {
    task: TimerTask,
    interval_ms: u32,
    /// Reference point for the next deadline.
    last_ms: u32,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The scheduler engine.
///
/// Decoupled from the node: when a task is due it invokes the
/// [`SchedulerDelegate`] callback, so the engine is testable with a
/// recording delegate.  The delegate gets the scheduler back and may
/// reschedule from inside the callback.
pub struct Scheduler {
    slots: [Option<TaskEntry>; MAX_TASKS],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TASKS],
        }
    }

    /// Register `task` to fire every `interval_ms`, first time one interval
    /// after `now_ms`.  Re-adding a task replaces its schedule in place.
    ///
    /// Returns the slot index, or `None` if all slots are taken.
    pub fn add(&mut self, task: TimerTask, interval_ms: u32, now_ms: u32) -> Option<usize> {
        let entry = TaskEntry {
            task,
            interval_ms,
            last_ms: now_ms,
        };

        if let Some(i) = self.slot_of(task) {
            self.slots[i] = Some(entry);
            info!("Scheduler: rescheduled {:?} every {}ms", task, interval_ms);
            return Some(i);
        }

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!("Scheduler: added {:?} at slot {} every {}ms", task, i, interval_ms);
                *slot = Some(entry);
                return Some(i);
            }
        }
        warn!("Scheduler: no free slot for {:?}", task);
        None
    }

    /// Interval of a registered task.
    pub fn interval_of(&self, task: TimerTask) -> Option<u32> {
        self.slot_of(task)
            .and_then(|i| self.slots[i])
            .map(|e| e.interval_ms)
    }

    /// Number of registered tasks.
    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Fire every due task, in slot order.
    ///
    /// `now_ms` is the wrapping millisecond clock.  A task that fell behind
    /// by several periods fires once, not once per missed period.
    pub fn tick(&mut self, now_ms: u32, delegate: &mut dyn SchedulerDelegate) {
        for i in 0..MAX_TASKS {
            let Some(entry) = self.slots[i].as_mut() else {
                continue;
            };
            if now_ms.wrapping_sub(entry.last_ms) < entry.interval_ms {
                continue;
            }
            entry.last_ms = now_ms;
            let task = entry.task;
            delegate.on_task_due(task, now_ms, self);
        }
    }

    fn slot_of(&self, task: TimerTask) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_some_and(|e| e.task == task))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
