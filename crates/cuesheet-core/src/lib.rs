//! Cuesheet core: a cooperative, tick-driven animation-scripting engine.
//!
//! Callers express multi-step, possibly-parallel animation sequences as
//! resumable task bodies. The scheduler advances every active task one
//! step per round, parks parents while their children run, and cascades
//! cancellation through the suspension forest. Value interpolation is
//! driven through caller-supplied `get`/`set` closures, so the core stays
//! agnostic of whatever object model the host animates.
//!
//! Everything is single-threaded: the host's frame loop calls
//! [`Scheduler::tick`] with a monotonic timestamp, and stops calling it
//! when a tick reports idle.

pub mod config;
pub mod ease;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod scheduler;
pub mod suspend;
pub mod task;
pub mod timer;
pub mod tween;

// Re-exports for consumers (hosts and effect layers)
pub use config::Config;
pub use ease::{cubic, linear, mirror, oscillate, Ease, EasePreset};
pub use error::{BodyError, CoreError};
pub use ids::TaskId;
pub use outputs::{TaskEvent, TickReport};
pub use scheduler::Scheduler;
pub use suspend::{Parent, SuspensionTree};
pub use task::{Step, StepCtx, TaskBody, TaskState};
pub use timer::Timer;
pub use tween::{
    ColorRgba, SetSequence, SetValue, Tween, TweenOptions, Tweenable,
};
