//! The timer primitive: a task body that counts pause-adjusted elapsed
//! time. Used directly as a wait, and spawned implicitly whenever a
//! running task requests a delay.

use crate::error::BodyError;
use crate::task::{Step, StepCtx, TaskBody};

type TickCallback = Box<dyn FnMut(f32)>;

/// Counts elapsed time against a duration. The start timestamp is taken on
/// the first step; every later step folds in any pause debt before
/// comparing, so the logical duration is unaffected by global pauses.
pub struct Timer {
    duration: f32,
    started: Option<f32>,
    on_tick: Option<TickCallback>,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            started: None,
            on_tick: None,
        }
    }

    /// Timer that invokes `on_tick(elapsed)` on every step while running.
    /// The callback is not invoked on the completing step.
    pub fn with_callback(duration: f32, on_tick: impl FnMut(f32) + 'static) -> Self {
        Self {
            duration,
            started: None,
            on_tick: Some(Box::new(on_tick)),
        }
    }
}

impl TaskBody for Timer {
    fn step(&mut self, ctx: &mut StepCtx<'_>) -> Result<Step, BodyError> {
        let started = match self.started {
            None => {
                self.started = Some(ctx.now());
                ctx.now()
            }
            Some(t0) => {
                let t0 = if ctx.pause_debt() > 0.0 {
                    t0 + ctx.pause_debt()
                } else {
                    t0
                };
                self.started = Some(t0);
                t0
            }
        };
        let elapsed = ctx.now() - started;
        // Zero and negative durations complete on the first step.
        if elapsed >= self.duration {
            return Ok(Step::Done);
        }
        if let Some(cb) = self.on_tick.as_mut() {
            cb(elapsed);
        }
        Ok(Step::Yield)
    }
}
