//! Error types for the scheduling core.
//!
//! Usage errors (unknown handles, unknown preset names) fail fast at the
//! call site. Body errors surface out of `Scheduler::tick` wrapped with the
//! failing task's identity; the scheduler has already cleaned up the task
//! and its descendants by the time the error is returned.

use thiserror::Error;

use crate::ids::TaskId;

/// Error type produced by task bodies. Bodies are user code; the core does
/// not constrain what they fail with beyond boxing.
pub type BodyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown task handle {0:?}")]
    UnknownTask(TaskId),

    #[error("unknown easing preset '{0}'")]
    UnknownEasing(String),

    #[error("task {task:?} ('{label}') failed while stepping")]
    TaskFailed {
        task: TaskId,
        label: String,
        #[source]
        source: BodyError,
    },
}
