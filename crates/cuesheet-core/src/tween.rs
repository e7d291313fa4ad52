//! Value interpolation ("tweens") over caller-supplied accessors.
//!
//! The core never touches host objects: callers hand in `get`/`set`
//! closures over their own attribute model and the tween slides the value
//! from a start to an end over a duration, through an easing function.
//! Composite values interpolate component-wise; colors are 4-component
//! tuples (channels + alpha) on the same machinery.

use crate::ease::Ease;
use crate::error::BodyError;
use crate::task::{Step, StepCtx, TaskBody};

/// RGBA color as interpolated by the tween machinery.
pub type ColorRgba = [f32; 4];

/// Values a tween can slide. `delta` defaults to subtraction and `compose`
/// to `start + fraction * delta`, component-wise for composite values;
/// both are overridable per tween through [`TweenOptions`]. Equality is
/// used to detect already-satisfied tweens, which complete on their first
/// step.
pub trait Tweenable: Clone + PartialEq {
    fn delta(start: &Self, end: &Self) -> Self;
    fn compose(start: &Self, fraction: f32, delta: &Self) -> Self;
}

impl Tweenable for f32 {
    #[inline]
    fn delta(start: &Self, end: &Self) -> Self {
        end - start
    }

    #[inline]
    fn compose(start: &Self, fraction: f32, delta: &Self) -> Self {
        start + fraction * delta
    }
}

macro_rules! tweenable_array {
    ($($n:literal),*) => {$(
        impl Tweenable for [f32; $n] {
            fn delta(start: &Self, end: &Self) -> Self {
                let mut out = [0.0; $n];
                for i in 0..$n {
                    out[i] = end[i] - start[i];
                }
                out
            }

            fn compose(start: &Self, fraction: f32, delta: &Self) -> Self {
                let mut out = [0.0; $n];
                for i in 0..$n {
                    out[i] = start[i] + fraction * delta[i];
                }
                out
            }
        }
    )*};
}

tweenable_array!(2, 3, 4);

/// Variable-length numeric vectors; start and end must have equal length.
impl Tweenable for Vec<f32> {
    fn delta(start: &Self, end: &Self) -> Self {
        start.iter().zip(end).map(|(s, e)| e - s).collect()
    }

    fn compose(start: &Self, fraction: f32, delta: &Self) -> Self {
        start
            .iter()
            .zip(delta)
            .map(|(s, d)| s + fraction * d)
            .collect()
    }
}

pub type DeltaFn<T> = Box<dyn Fn(&T, &T) -> T>;
pub type ComposeFn<T> = Box<dyn Fn(&T, f32, &T) -> T>;
pub type MapFn<T> = Box<dyn Fn(T) -> T>;
pub type SideEffectFn = Box<dyn FnMut()>;

/// Per-tween overrides; every field is independently optional.
pub struct TweenOptions<T> {
    /// Animation start value; defaults to the current value via `get`.
    pub start_value: Option<T>,
    /// Seconds from start to end; defaults to the scheduler's default.
    pub duration: Option<f32>,
    /// Progress shaping; defaults to linear.
    pub ease: Ease,
    /// Replaces the start-to-end range computation.
    pub delta: Option<DeltaFn<T>>,
    /// Given start value, progress fraction and delta, produces the current
    /// value. Replace for exotic value spaces.
    pub compose: Option<ComposeFn<T>>,
    /// Translates the composed value before it is applied.
    pub map: Option<MapFn<T>>,
    /// Called after every applied value.
    pub side_effect: Option<SideEffectFn>,
}

impl<T> Default for TweenOptions<T> {
    fn default() -> Self {
        Self {
            start_value: None,
            duration: None,
            ease: Ease::default(),
            delta: None,
            compose: None,
            map: None,
            side_effect: None,
        }
    }
}

struct Session<T> {
    start: T,
    delta: T,
    started: f32,
    duration: f32,
}

/// Task body sliding one value from start to end.
///
/// The session (start value, delta, start timestamp) initializes on the
/// first step and dies with the task. The final step runs at fraction
/// `ease(1)` even when timing overshoots; with default delta/compose and a
/// terminal easing this applies the exact mapped end value rather than a
/// float approximation. Degenerate inputs (zero or negative duration,
/// equal endpoints) apply exactly one step.
pub struct Tween<T: Tweenable> {
    get: Box<dyn FnMut() -> T>,
    set: Box<dyn FnMut(T)>,
    end: T,
    opts: TweenOptions<T>,
    session: Option<Session<T>>,
}

impl<T: Tweenable> Tween<T> {
    pub fn new(
        get: impl FnMut() -> T + 'static,
        set: impl FnMut(T) + 'static,
        end_value: T,
        opts: TweenOptions<T>,
    ) -> Self {
        Self {
            get: Box::new(get),
            set: Box::new(set),
            end: end_value,
            opts,
            session: None,
        }
    }
}

impl<T: Tweenable> TaskBody for Tween<T> {
    fn step(&mut self, ctx: &mut StepCtx<'_>) -> Result<Step, BodyError> {
        let now = ctx.now();
        if self.session.is_none() {
            let start = match self.opts.start_value.take() {
                Some(v) => v,
                None => (self.get)(),
            };
            let delta = match self.opts.delta.as_ref() {
                Some(f) => f(&start, &self.end),
                None => T::delta(&start, &self.end),
            };
            let duration = self.opts.duration.unwrap_or(ctx.default_duration());
            self.session = Some(Session {
                start,
                delta,
                started: now,
                duration,
            });
        } else if ctx.pause_debt() > 0.0 {
            if let Some(s) = self.session.as_mut() {
                s.started += ctx.pause_debt();
            }
        }
        let (start, delta, started, duration) = {
            let s = self.session.as_ref().ok_or("tween session missing")?;
            (s.start.clone(), s.delta.clone(), s.started, s.duration)
        };

        let elapsed = now - started;
        // Degenerate inputs (no duration, nothing to move) apply exactly
        // one step instead of idling through the full duration.
        let finishing = duration <= 0.0 || elapsed >= duration || start == self.end;
        let fraction = if finishing {
            self.opts.ease.apply(1.0)
        } else {
            self.opts.ease.apply(elapsed / duration)
        };

        // On the default path the completing step substitutes the exact end
        // value; custom delta/compose keep their own arithmetic, as do
        // easings that do not terminate at 1 (oscillate ends at its start).
        let value = if finishing
            && fraction == 1.0
            && self.opts.delta.is_none()
            && self.opts.compose.is_none()
        {
            self.end.clone()
        } else {
            match self.opts.compose.as_ref() {
                Some(f) => f(&start, fraction, &delta),
                None => T::compose(&start, fraction, &delta),
            }
        };
        let value = match self.opts.map.as_ref() {
            Some(f) => f(value),
            None => value,
        };
        (self.set)(value);
        if let Some(side) = self.opts.side_effect.as_mut() {
            side();
        }

        Ok(if finishing { Step::Done } else { Step::Yield })
    }
}

/// Applies a value once, then completes.
pub struct SetValue<T> {
    set: Box<dyn FnMut(T)>,
    value: Option<T>,
}

impl<T> SetValue<T> {
    pub fn new(set: impl FnMut(T) + 'static, value: T) -> Self {
        Self {
            set: Box::new(set),
            value: Some(value),
        }
    }
}

impl<T> TaskBody for SetValue<T> {
    fn step(&mut self, _ctx: &mut StepCtx<'_>) -> Result<Step, BodyError> {
        if let Some(v) = self.value.take() {
            (self.set)(v);
        }
        Ok(Step::Done)
    }
}

/// Applies one iterator item per step; completes when the iterator does.
pub struct SetSequence<T, I> {
    set: Box<dyn FnMut(T)>,
    iter: I,
}

impl<T, I: Iterator<Item = T>> SetSequence<T, I> {
    pub fn new(set: impl FnMut(T) + 'static, iter: I) -> Self {
        Self {
            set: Box::new(set),
            iter,
        }
    }
}

impl<T, I: Iterator<Item = T>> TaskBody for SetSequence<T, I> {
    fn step(&mut self, _ctx: &mut StepCtx<'_>) -> Result<Step, BodyError> {
        match self.iter.next() {
            Some(v) => {
                (self.set)(v);
                Ok(Step::Yield)
            }
            None => Ok(Step::Done),
        }
    }
}
