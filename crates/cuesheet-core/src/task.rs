//! The task model: resumable bodies, the step protocol, and the execution
//! context handed to a body while it is being advanced.

use serde::{Deserialize, Serialize};

use crate::error::BodyError;
use crate::ids::{IdAllocator, TaskId};

/// What one advancement of a task body yields back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Suspend; resume on the next scheduling round.
    Yield,
    /// Suspend behind an implicit timer of the scheduler's default duration.
    Wait,
    /// Suspend behind an implicit timer of the given duration in seconds.
    WaitFor(f32),
    /// The body has run to completion.
    Done,
}

/// Task lifecycle states. `Pending` covers the window between scheduling
/// and the next round boundary; `Standby` means the task is parked waiting
/// for its children. The terminal states are reported through tick events
/// as the record is dropped.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Active,
    Standby,
    Done,
    Cancelled,
}

/// A resumable unit of work. Between suspension points a step is atomic
/// from the scheduler's point of view; bodies must not assume they are
/// stepped at any particular rate.
///
/// Implemented for any `FnMut(&mut StepCtx) -> Result<Step, BodyError>`
/// closure; multi-stage scripts are typically a closure over a small
/// stage counter, or a dedicated type like [`crate::Timer`] or
/// [`crate::Tween`].
pub trait TaskBody {
    fn step(&mut self, ctx: &mut StepCtx<'_>) -> Result<Step, BodyError>;
}

impl<F> TaskBody for F
where
    F: FnMut(&mut StepCtx<'_>) -> Result<Step, BodyError>,
{
    fn step(&mut self, ctx: &mut StepCtx<'_>) -> Result<Step, BodyError> {
        self(ctx)
    }
}

pub(crate) struct PendingSpawn {
    pub id: TaskId,
    pub label: Option<String>,
    pub body: Box<dyn TaskBody>,
}

/// Execution context for exactly one body step.
///
/// This is the explicit stand-in for an ambient "current task": children
/// spawned through it are parented to the stepping task, and cancellations
/// are queued for the scheduler to process at the next round boundary.
pub struct StepCtx<'a> {
    pub(crate) now: f32,
    pub(crate) pause_debt: f32,
    pub(crate) default_duration: f32,
    pub(crate) ids: &'a mut IdAllocator,
    pub(crate) spawns: &'a mut Vec<PendingSpawn>,
    pub(crate) cancels: &'a mut Vec<TaskId>,
}

impl StepCtx<'_> {
    /// Timestamp of the current tick, in the host's timebase (seconds).
    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Seconds the scheduler spent paused since this body's previous step.
    /// Timed sessions add this to their start timestamp so that paused
    /// intervals do not count toward elapsed time. Non-zero only on the
    /// first stepping round after a resume.
    #[inline]
    pub fn pause_debt(&self) -> f32 {
        self.pause_debt
    }

    /// The scheduler's default duration for tweens and implicit waits.
    #[inline]
    pub fn default_duration(&self) -> f32 {
        self.default_duration
    }

    /// Spawn a child task. The stepping task becomes the child's parent and
    /// is moved to standby once this step returns; it resumes when all of
    /// its children have finished.
    pub fn spawn(&mut self, body: impl TaskBody + 'static) -> TaskId {
        self.push_spawn(None, Box::new(body))
    }

    /// Like [`StepCtx::spawn`], with a label used in errors and events.
    pub fn spawn_named(&mut self, label: impl Into<String>, body: impl TaskBody + 'static) -> TaskId {
        self.push_spawn(Some(label.into()), Box::new(body))
    }

    /// Queue a cancellation. Processed at the next round boundary; ids that
    /// finished in the meantime are skipped.
    pub fn cancel(&mut self, task: TaskId) {
        self.cancels.push(task);
    }

    fn push_spawn(&mut self, label: Option<String>, body: Box<dyn TaskBody>) -> TaskId {
        let id = self.ids.alloc_task();
        self.spawns.push(PendingSpawn { id, label, body });
        id
    }
}

/// Arena record for one live task.
pub(crate) struct Task {
    pub label: Option<String>,
    pub state: TaskState,
    /// Set when the body returned `Done` in the same step that spawned
    /// children; the task finalizes when the children finish, without the
    /// body being stepped again.
    pub exhausted: bool,
    pub body: Box<dyn TaskBody>,
}
