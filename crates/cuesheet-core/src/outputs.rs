//! Per-tick outputs from the scheduler.
//!
//! A tick reports lifecycle events and an idle flag; hosts use `idle` to
//! stop their frame loop until new work is scheduled.

use serde::{Deserialize, Serialize};

use crate::ids::TaskId;

/// Discrete lifecycle signals emitted during a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TaskEvent {
    /// The task's body ran to completion and its bookkeeping was removed.
    Finished {
        task: TaskId,
        label: Option<String>,
    },
    /// The task was removed by an explicit cancellation, an ancestor's
    /// cascade, or failure cleanup.
    Cancelled {
        task: TaskId,
        label: Option<String>,
    },
}

/// Outputs of one `Scheduler::tick` call.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TickReport {
    #[serde(default)]
    pub events: Vec<TaskEvent>,
    /// Number of body advancements performed across all rounds.
    pub stepped: u32,
    /// True when no task remains active; the host may stop ticking until
    /// something is scheduled again.
    pub idle: bool,
}

impl TickReport {
    #[inline]
    pub fn push_event(&mut self, event: TaskEvent) {
        self.events.push(event);
    }

    pub fn finished(&self, task: TaskId) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TaskEvent::Finished { task: t, .. } if *t == task))
    }

    pub fn cancelled(&self, task: TaskId) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TaskEvent::Cancelled { task: t, .. } if *t == task))
    }
}
